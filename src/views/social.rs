use crate::auth::AuthenticatedUser;
use crate::csrf;
use crate::db::DbPool;
use crate::errors::{AppError, AppResult};
use crate::forms::TokenForm;
use crate::services::{accounts, follows, likes, posts};
use crate::urls;
use actix_web::http::Method;
use actix_web::{web, HttpRequest, HttpResponse};

use super::redirect;

/// Toggles are plain links; a POST must carry the page's CSRF token.
fn check_post_token(req: &HttpRequest, form: Option<web::Form<TokenForm>>) -> AppResult<()> {
    if req.method() != Method::POST {
        return Ok(());
    }
    let submitted = form.map(|f| f.into_inner().csrf_token).unwrap_or_default();
    csrf::verify(req, &submitted)
}

#[utoipa::path(
    post,
    path = "/profile/{username}/follow/",
    request_body(content = TokenForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 403, description = "CSRF check failed"),
        (status = 302, description = "Redirect to the profile"),
        (status = 404, description = "Unknown user")
    ),
    security(("session_cookie" = [])),
    tag = "social"
)]
pub async fn profile_follow(
    user: AuthenticatedUser,
    path: web::Path<String>,
    req: HttpRequest,
    pool: web::Data<DbPool>,
    form: Option<web::Form<TokenForm>>,
) -> AppResult<HttpResponse> {
    check_post_token(&req, form)?;
    let username = path.into_inner();
    let author = accounts::find_by_username(pool.get_ref(), &username)
        .await?
        .ok_or(AppError::NotFound)?;

    if follows::follow(pool.get_ref(), user.user_id, author.id).await? {
        log::info!("{} follows {}", user.username, author.username);
    }

    Ok(redirect(&urls::profile(&author.username)))
}

#[utoipa::path(
    post,
    path = "/profile/{username}/unfollow/",
    request_body(content = TokenForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 403, description = "CSRF check failed"),
        (status = 302, description = "Redirect to the profile"),
        (status = 404, description = "Unknown user")
    ),
    security(("session_cookie" = [])),
    tag = "social"
)]
pub async fn profile_unfollow(
    user: AuthenticatedUser,
    path: web::Path<String>,
    req: HttpRequest,
    pool: web::Data<DbPool>,
    form: Option<web::Form<TokenForm>>,
) -> AppResult<HttpResponse> {
    check_post_token(&req, form)?;
    let username = path.into_inner();
    let author = accounts::find_by_username(pool.get_ref(), &username)
        .await?
        .ok_or(AppError::NotFound)?;

    if follows::unfollow(pool.get_ref(), user.user_id, author.id).await? {
        log::info!("{} unfollowed {}", user.username, author.username);
    }

    Ok(redirect(&urls::profile(&author.username)))
}

#[utoipa::path(
    post,
    path = "/posts/{post_id}/like/",
    request_body(content = TokenForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 403, description = "CSRF check failed"),
        (status = 302, description = "Redirect to the post"),
        (status = 404, description = "Unknown post")
    ),
    security(("session_cookie" = [])),
    tag = "social"
)]
pub async fn like(
    user: AuthenticatedUser,
    path: web::Path<i32>,
    req: HttpRequest,
    pool: web::Data<DbPool>,
    form: Option<web::Form<TokenForm>>,
) -> AppResult<HttpResponse> {
    check_post_token(&req, form)?;
    let post = posts::find_post(pool.get_ref(), path.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;

    likes::add_like(pool.get_ref(), &post, user.user_id).await?;

    Ok(redirect(&urls::post_detail(post.id)))
}

#[utoipa::path(
    post,
    path = "/posts/{post_id}/unlike/",
    request_body(content = TokenForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 403, description = "CSRF check failed"),
        (status = 302, description = "Redirect to the post"),
        (status = 404, description = "Unknown post")
    ),
    security(("session_cookie" = [])),
    tag = "social"
)]
pub async fn unlike(
    user: AuthenticatedUser,
    path: web::Path<i32>,
    req: HttpRequest,
    pool: web::Data<DbPool>,
    form: Option<web::Form<TokenForm>>,
) -> AppResult<HttpResponse> {
    check_post_token(&req, form)?;
    let post = posts::find_post(pool.get_ref(), path.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;

    likes::remove_like(pool.get_ref(), &post, user.user_id).await?;

    Ok(redirect(&urls::post_detail(post.id)))
}
