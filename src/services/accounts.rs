use crate::auth::{hash_password, verify_password};
use crate::entities::user;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set};

pub async fn find_by_username<C: ConnectionTrait>(
    db: &C,
    username: &str,
) -> Result<Option<user::Model>, DbErr> {
    user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await
}

pub async fn create_user<C: ConnectionTrait>(
    db: &C,
    username: &str,
    email: &str,
    password: &str,
    bcrypt_cost: u32,
) -> Result<user::Model, anyhow::Error> {
    let password_hash = hash_password(password, bcrypt_cost)?;

    let user = user::ActiveModel {
        username: Set(username.to_string()),
        email: Set(email.to_string()),
        password_hash: Set(password_hash),
        date_joined: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    log::info!("User {} registered", user.username);
    Ok(user)
}

/// Returns the user when the password matches.
pub async fn authenticate<C: ConnectionTrait>(
    db: &C,
    username: &str,
    password: &str,
) -> Result<Option<user::Model>, anyhow::Error> {
    let Some(user) = find_by_username(db, username).await? else {
        return Ok(None);
    };
    if verify_password(password, &user.password_hash)? {
        Ok(Some(user))
    } else {
        Ok(None)
    }
}
