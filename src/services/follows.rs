use crate::entities::follow;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, Set,
};

fn edge(user_id: i32, author_id: i32) -> Condition {
    Condition::all()
        .add(follow::Column::UserId.eq(user_id))
        .add(follow::Column::AuthorId.eq(author_id))
}

/// Subscribes `user_id` to `author_id`. Returns `false` when nothing was
/// created: following yourself, or an edge that already exists.
pub async fn follow<C: ConnectionTrait>(db: &C, user_id: i32, author_id: i32) -> Result<bool, DbErr> {
    if user_id == author_id {
        return Ok(false);
    }

    let existing = follow::Entity::find()
        .filter(edge(user_id, author_id))
        .one(db)
        .await?;
    if existing.is_some() {
        return Ok(false);
    }

    let new_follow = follow::ActiveModel {
        user_id: Set(user_id),
        author_id: Set(author_id),
        ..Default::default()
    };
    match new_follow.insert(db).await {
        Ok(_) => Ok(true),
        Err(err) => {
            let raced = follow::Entity::find()
                .filter(edge(user_id, author_id))
                .one(db)
                .await?;
            match raced {
                Some(_) => Ok(false),
                None => Err(err),
            }
        }
    }
}

/// Removes the subscription if present. Returns whether one was removed.
pub async fn unfollow<C: ConnectionTrait>(db: &C, user_id: i32, author_id: i32) -> Result<bool, DbErr> {
    let result = follow::Entity::delete_many()
        .filter(edge(user_id, author_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

pub async fn is_following<C: ConnectionTrait>(
    db: &C,
    user_id: Option<i32>,
    author_id: i32,
) -> Result<bool, DbErr> {
    let Some(user_id) = user_id else {
        return Ok(false);
    };
    let count = follow::Entity::find()
        .filter(edge(user_id, author_id))
        .count(db)
        .await?;
    Ok(count > 0)
}

pub async fn follower_count<C: ConnectionTrait>(db: &C, author_id: i32) -> Result<u64, DbErr> {
    follow::Entity::find()
        .filter(follow::Column::AuthorId.eq(author_id))
        .count(db)
        .await
}

pub async fn following_count<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<u64, DbErr> {
    follow::Entity::find()
        .filter(follow::Column::UserId.eq(user_id))
        .count(db)
        .await
}
