//! Post queries and mutations used by the feed and post pages.

use super::likes::{self, Likeable};
use crate::entities::{comment, follow, group, like, post, user};
use crate::models::{CommentView, PostView};
use chrono::Utc;
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Select, Set, TransactionTrait,
};
use std::collections::{HashMap, HashSet};

/// Validated post fields ready to be stored.
#[derive(Debug, Clone)]
pub struct PostData {
    pub text: String,
    pub group_id: Option<i32>,
    pub image: Option<String>,
}

/// Every post, newest first.
pub fn all_posts() -> Select<post::Entity> {
    post::Entity::find()
        .order_by_desc(post::Column::PubDate)
        .order_by_desc(post::Column::Id)
}

pub fn group_posts(group_id: i32) -> Select<post::Entity> {
    all_posts().filter(post::Column::GroupId.eq(group_id))
}

pub fn author_posts(author_id: i32) -> Select<post::Entity> {
    all_posts().filter(post::Column::AuthorId.eq(author_id))
}

/// Posts by the authors `user_id` follows.
pub fn followed_posts(user_id: i32) -> Select<post::Entity> {
    let authors = Query::select()
        .column(follow::Column::AuthorId)
        .from(follow::Entity)
        .and_where(follow::Column::UserId.eq(user_id))
        .to_owned();
    all_posts().filter(post::Column::AuthorId.in_subquery(authors))
}

/// Posts `user_id` has liked.
pub fn liked_posts(user_id: i32) -> Select<post::Entity> {
    let liked = Query::select()
        .column(like::Column::ObjectId)
        .from(like::Entity)
        .and_where(like::Column::UserId.eq(user_id))
        .and_where(like::Column::ContentType.eq(<post::Model as Likeable>::CONTENT_TYPE))
        .to_owned();
    all_posts().filter(post::Column::Id.in_subquery(liked))
}

pub async fn find_post<C: ConnectionTrait>(db: &C, post_id: i32) -> Result<Option<post::Model>, DbErr> {
    post::Entity::find_by_id(post_id).one(db).await
}

pub async fn find_group_by_slug<C: ConnectionTrait>(
    db: &C,
    slug: &str,
) -> Result<Option<group::Model>, DbErr> {
    group::Entity::find()
        .filter(group::Column::Slug.eq(slug))
        .one(db)
        .await
}

pub async fn all_groups<C: ConnectionTrait>(db: &C) -> Result<Vec<group::Model>, DbErr> {
    group::Entity::find()
        .order_by_asc(group::Column::Title)
        .all(db)
        .await
}

pub async fn create_group<C: ConnectionTrait>(
    db: &C,
    title: &str,
    slug: &str,
    description: &str,
) -> Result<group::Model, DbErr> {
    group::ActiveModel {
        title: Set(title.to_string()),
        slug: Set(slug.to_string()),
        description: Set(description.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn count_author_posts<C: ConnectionTrait>(db: &C, author_id: i32) -> Result<u64, DbErr> {
    post::Entity::find()
        .filter(post::Column::AuthorId.eq(author_id))
        .count(db)
        .await
}

pub async fn create_post<C: ConnectionTrait>(
    db: &C,
    author_id: i32,
    data: PostData,
) -> Result<post::Model, DbErr> {
    let post = post::ActiveModel {
        text: Set(data.text),
        pub_date: Set(Utc::now()),
        author_id: Set(author_id),
        group_id: Set(data.group_id),
        image: Set(data.image),
        ..Default::default()
    }
    .insert(db)
    .await?;

    log::info!("Post {} created by user {}", post.id, author_id);
    Ok(post)
}

/// Applies edited fields. `pub_date` and the author never change, and an
/// edit without a new upload keeps the current image.
pub async fn update_post<C: ConnectionTrait>(
    db: &C,
    post: post::Model,
    data: PostData,
) -> Result<post::Model, DbErr> {
    let post_id = post.id;
    let mut active: post::ActiveModel = post.into();
    active.text = Set(data.text);
    active.group_id = Set(data.group_id);
    if data.image.is_some() {
        active.image = Set(data.image);
    }
    let updated = active.update(db).await?;

    log::info!("Post {} updated", post_id);
    Ok(updated)
}

/// Deletes a post together with its comments and likes.
pub async fn delete_post<C>(db: &C, post: &post::Model) -> Result<(), DbErr>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    likes::clear_likes(&txn, post).await?;
    comment::Entity::delete_many()
        .filter(comment::Column::PostId.eq(post.id))
        .exec(&txn)
        .await?;
    post::Entity::delete_by_id(post.id).exec(&txn).await?;
    txn.commit().await?;

    log::info!("Post {} deleted", post.id);
    Ok(())
}

pub async fn add_comment<C: ConnectionTrait>(
    db: &C,
    post_id: i32,
    author_id: i32,
    text: String,
) -> Result<comment::Model, DbErr> {
    comment::ActiveModel {
        post_id: Set(post_id),
        author_id: Set(author_id),
        text: Set(text),
        created: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Comments of a post in the order they were written.
pub async fn comments_for<C: ConnectionTrait>(db: &C, post_id: i32) -> Result<Vec<CommentView>, DbErr> {
    let rows = comment::Entity::find()
        .filter(comment::Column::PostId.eq(post_id))
        .order_by_asc(comment::Column::Created)
        .order_by_asc(comment::Column::Id)
        .find_also_related(user::Entity)
        .all(db)
        .await?;

    Ok(rows
        .iter()
        .map(|(comment, author)| CommentView::new(comment, author.as_ref()))
        .collect())
}

/// Resolves authors and groups for a batch of posts with two queries.
pub async fn hydrate<C: ConnectionTrait>(db: &C, posts: &[post::Model]) -> Result<Vec<PostView>, DbErr> {
    let author_ids: HashSet<i32> = posts.iter().map(|p| p.author_id).collect();
    let group_ids: HashSet<i32> = posts.iter().filter_map(|p| p.group_id).collect();

    let authors: HashMap<i32, user::Model> = if author_ids.is_empty() {
        HashMap::new()
    } else {
        user::Entity::find()
            .filter(user::Column::Id.is_in(author_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect()
    };

    let groups: HashMap<i32, group::Model> = if group_ids.is_empty() {
        HashMap::new()
    } else {
        group::Entity::find()
            .filter(group::Column::Id.is_in(group_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|g| (g.id, g))
            .collect()
    };

    Ok(posts
        .iter()
        .map(|p| {
            PostView::new(
                p,
                authors.get(&p.author_id),
                p.group_id.and_then(|id| groups.get(&id)),
            )
        })
        .collect())
}
