//! Likes on any likeable record.

use crate::entities::{comment, like, post, user};
use chrono::Utc;
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

/// A record that users can like.
pub trait Likeable {
    /// Stable name of the record type, stored in `likes.content_type`.
    const CONTENT_TYPE: &'static str;

    fn object_id(&self) -> i32;
}

impl Likeable for post::Model {
    const CONTENT_TYPE: &'static str = "posts.post";

    fn object_id(&self) -> i32 {
        self.id
    }
}

impl Likeable for comment::Model {
    const CONTENT_TYPE: &'static str = "posts.comment";

    fn object_id(&self) -> i32 {
        self.id
    }
}

fn target<L: Likeable>(obj: &L) -> Condition {
    Condition::all()
        .add(like::Column::ContentType.eq(L::CONTENT_TYPE))
        .add(like::Column::ObjectId.eq(obj.object_id()))
}

async fn find_like<L, C>(db: &C, obj: &L, user_id: i32) -> Result<Option<like::Model>, DbErr>
where
    L: Likeable,
    C: ConnectionTrait,
{
    like::Entity::find()
        .filter(target(obj).add(like::Column::UserId.eq(user_id)))
        .one(db)
        .await
}

/// Likes `obj` on behalf of the user. Liking twice returns the existing like.
pub async fn add_like<L, C>(db: &C, obj: &L, user_id: i32) -> Result<like::Model, DbErr>
where
    L: Likeable,
    C: ConnectionTrait,
{
    if let Some(existing) = find_like(db, obj, user_id).await? {
        return Ok(existing);
    }

    let new_like = like::ActiveModel {
        user_id: Set(user_id),
        content_type: Set(L::CONTENT_TYPE.to_string()),
        object_id: Set(obj.object_id()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    match new_like.insert(db).await {
        Ok(like) => Ok(like),
        // Lost a race against the unique index: the row is there now.
        Err(err) => find_like(db, obj, user_id).await?.ok_or(err),
    }
}

/// Removes the user's like from `obj`, if any.
pub async fn remove_like<L, C>(db: &C, obj: &L, user_id: i32) -> Result<(), DbErr>
where
    L: Likeable,
    C: ConnectionTrait,
{
    like::Entity::delete_many()
        .filter(target(obj).add(like::Column::UserId.eq(user_id)))
        .exec(db)
        .await?;
    Ok(())
}

/// Whether the viewer liked `obj`. Anonymous viewers never have.
pub async fn is_liked<L, C>(db: &C, obj: &L, user_id: Option<i32>) -> Result<bool, DbErr>
where
    L: Likeable,
    C: ConnectionTrait,
{
    let Some(user_id) = user_id else {
        return Ok(false);
    };
    Ok(find_like(db, obj, user_id).await?.is_some())
}

/// Users who liked `obj`, by username.
pub async fn get_likes<L, C>(db: &C, obj: &L) -> Result<Vec<user::Model>, DbErr>
where
    L: Likeable,
    C: ConnectionTrait,
{
    let likers = Query::select()
        .column(like::Column::UserId)
        .from(like::Entity)
        .cond_where(target(obj))
        .to_owned();

    user::Entity::find()
        .filter(user::Column::Id.in_subquery(likers))
        .order_by_asc(user::Column::Username)
        .all(db)
        .await
}

pub async fn count_likes<L, C>(db: &C, obj: &L) -> Result<u64, DbErr>
where
    L: Likeable,
    C: ConnectionTrait,
{
    like::Entity::find().filter(target(obj)).count(db).await
}

/// Drops every like pointing at `obj`; the generic reference has no
/// foreign key to cascade for us.
pub async fn clear_likes<L, C>(db: &C, obj: &L) -> Result<u64, DbErr>
where
    L: Likeable,
    C: ConnectionTrait,
{
    let result = like::Entity::delete_many()
        .filter(target(obj))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
