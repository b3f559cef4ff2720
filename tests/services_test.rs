// Integration tests for the service layer against in-memory SQLite.
// Run with: cargo test --test services_test

use yatube::config::{CacheConfig, Config, DatabaseConfig, JwtConfig, MediaConfig, ServerConfig};
use yatube::db::{create_pool, DbPool};
use yatube::entities::{comment, group, like, post, user};
use yatube::pagination::paginate;
use yatube::services::{accounts, follows, likes, posts};

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

async fn test_db() -> DbPool {
    let config = Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        jwt: JwtConfig {
            secret: "test-secret".to_string(),
            expiration_hours: 1,
            bcrypt_cost: 4,
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        cache: CacheConfig { index_seconds: 20 },
        media: MediaConfig {
            root: std::env::temp_dir().join("yatube-test-media"),
        },
    };
    create_pool(&config)
        .await
        .expect("Failed to create test database")
}

async fn make_user(db: &DbPool, username: &str) -> user::Model {
    accounts::create_user(db, username, &format!("{}@example.com", username), "password123", 4)
        .await
        .expect("Failed to create user")
}

async fn make_post(db: &DbPool, author: &user::Model, text: &str) -> post::Model {
    posts::create_post(
        db,
        author.id,
        posts::PostData {
            text: text.to_string(),
            group_id: None,
            image: None,
        },
    )
    .await
    .expect("Failed to create post")
}

#[actix_rt::test]
async fn test_add_like_is_idempotent() {
    let db = test_db().await;
    let author = make_user(&db, "leo").await;
    let fan = make_user(&db, "mia").await;
    let post = make_post(&db, &author, "hello").await;

    let first = likes::add_like(&db, &post, fan.id).await.unwrap();
    let second = likes::add_like(&db, &post, fan.id).await.unwrap();
    assert_eq!(first.id, second.id, "Second like should return the first row");
    assert_eq!(like::Entity::find().count(&db).await.unwrap(), 1);

    assert!(likes::is_liked(&db, &post, Some(fan.id)).await.unwrap());
    assert!(!likes::is_liked(&db, &post, Some(author.id)).await.unwrap());
    assert!(!likes::is_liked(&db, &post, None).await.unwrap());

    let likers = likes::get_likes(&db, &post).await.unwrap();
    assert_eq!(likers.len(), 1);
    assert_eq!(likers[0].username, "mia");
}

#[actix_rt::test]
async fn test_remove_like_without_like_is_noop() {
    let db = test_db().await;
    let author = make_user(&db, "leo").await;
    let post = make_post(&db, &author, "hello").await;

    likes::remove_like(&db, &post, author.id).await.unwrap();
    assert_eq!(likes::count_likes(&db, &post).await.unwrap(), 0);

    likes::add_like(&db, &post, author.id).await.unwrap();
    likes::remove_like(&db, &post, author.id).await.unwrap();
    assert_eq!(likes::count_likes(&db, &post).await.unwrap(), 0);
}

#[actix_rt::test]
async fn test_likes_on_posts_and_comments_are_separate() {
    let db = test_db().await;
    let author = make_user(&db, "leo").await;
    let post = make_post(&db, &author, "hello").await;
    // Same numeric id on purpose: the content type keeps the targets apart.
    let comment = posts::add_comment(&db, post.id, author.id, "first".to_string())
        .await
        .unwrap();
    assert_eq!(comment.id, post.id);

    likes::add_like(&db, &comment, author.id).await.unwrap();
    assert_eq!(likes::count_likes(&db, &comment).await.unwrap(), 1);
    assert_eq!(likes::count_likes(&db, &post).await.unwrap(), 0);
    assert!(!likes::is_liked(&db, &post, Some(author.id)).await.unwrap());
}

#[actix_rt::test]
async fn test_delete_post_removes_comments_and_likes() {
    let db = test_db().await;
    let author = make_user(&db, "leo").await;
    let post = make_post(&db, &author, "short lived").await;
    let keep = make_post(&db, &author, "stays").await;
    posts::add_comment(&db, post.id, author.id, "bye".to_string())
        .await
        .unwrap();
    likes::add_like(&db, &post, author.id).await.unwrap();
    likes::add_like(&db, &keep, author.id).await.unwrap();

    posts::delete_post(&db, &post).await.unwrap();

    assert!(posts::find_post(&db, post.id).await.unwrap().is_none());
    assert_eq!(comment::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(like::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(likes::count_likes(&db, &keep).await.unwrap(), 1);
}

#[actix_rt::test]
async fn test_deleting_group_keeps_posts_ungrouped() {
    let db = test_db().await;
    let author = make_user(&db, "leo").await;
    let cats = posts::create_group(&db, "Cats", "cats", "").await.unwrap();
    let grouped = posts::create_post(
        &db,
        author.id,
        posts::PostData {
            text: "in a group".to_string(),
            group_id: Some(cats.id),
            image: None,
        },
    )
    .await
    .unwrap();

    group::Entity::delete_by_id(cats.id).exec(&db).await.unwrap();

    let stored = posts::find_post(&db, grouped.id)
        .await
        .unwrap()
        .expect("Post should outlive its group");
    assert_eq!(stored.group_id, None);
    assert_eq!(stored.text, "in a group");
    let orphans = post::Entity::find()
        .filter(post::Column::GroupId.eq(cats.id))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(orphans, 0);
}

#[actix_rt::test]
async fn test_follow_rules() {
    let db = test_db().await;
    let author = make_user(&db, "leo").await;
    let reader = make_user(&db, "mia").await;

    assert!(follows::follow(&db, reader.id, author.id).await.unwrap());
    assert!(!follows::follow(&db, reader.id, author.id).await.unwrap());
    assert!(!follows::follow(&db, author.id, author.id).await.unwrap());

    assert!(follows::is_following(&db, Some(reader.id), author.id).await.unwrap());
    assert!(!follows::is_following(&db, None, author.id).await.unwrap());
    assert_eq!(follows::follower_count(&db, author.id).await.unwrap(), 1);
    assert_eq!(follows::following_count(&db, reader.id).await.unwrap(), 1);

    assert!(follows::unfollow(&db, reader.id, author.id).await.unwrap());
    assert!(!follows::unfollow(&db, reader.id, author.id).await.unwrap());
    assert_eq!(follows::follower_count(&db, author.id).await.unwrap(), 0);
}

#[actix_rt::test]
async fn test_feeds_pick_followed_and_liked_posts() {
    let db = test_db().await;
    let author = make_user(&db, "leo").await;
    let other = make_user(&db, "sam").await;
    let reader = make_user(&db, "mia").await;
    let followed = make_post(&db, &author, "from leo").await;
    let liked = make_post(&db, &other, "from sam").await;

    follows::follow(&db, reader.id, author.id).await.unwrap();
    likes::add_like(&db, &liked, reader.id).await.unwrap();

    let page = paginate(&db, posts::followed_posts(reader.id), None).await.unwrap();
    let ids: Vec<i32> = page.object_list.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![followed.id]);

    let page = paginate(&db, posts::liked_posts(reader.id), None).await.unwrap();
    let ids: Vec<i32> = page.object_list.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![liked.id]);
}

#[actix_rt::test]
async fn test_paginate_splits_thirteen_posts() {
    let db = test_db().await;
    let author = make_user(&db, "leo").await;
    for i in 0..13 {
        make_post(&db, &author, &format!("post {}", i)).await;
    }

    let first = paginate(&db, posts::all_posts(), None).await.unwrap();
    assert_eq!(first.number, 1);
    assert_eq!(first.num_pages, 2);
    assert_eq!(first.count, 13);
    assert_eq!(first.len(), 10);
    assert!(first.has_next());

    let second = paginate(&db, posts::all_posts(), Some("2")).await.unwrap();
    assert_eq!(second.len(), 3);
    assert!(!second.has_next());
    assert!(second.has_previous());

    let junk = paginate(&db, posts::all_posts(), Some("abc")).await.unwrap();
    assert_eq!(junk.number, 1);

    let empty = paginate(&db, posts::author_posts(9999), Some("5")).await.unwrap();
    assert_eq!(empty.number, 1);
    assert_eq!(empty.num_pages, 1);
    assert!(empty.is_empty());
}

#[actix_rt::test]
async fn test_authenticate_checks_password() {
    let db = test_db().await;
    make_user(&db, "leo").await;

    let ok = accounts::authenticate(&db, "leo", "password123").await.unwrap();
    assert!(ok.is_some());
    let bad = accounts::authenticate(&db, "leo", "nope").await.unwrap();
    assert!(bad.is_none());
    let missing = accounts::authenticate(&db, "ghost", "password123").await.unwrap();
    assert!(missing.is_none());
}
