pub mod accounts;
pub mod pages;
pub mod posts;
pub mod social;

use actix_multipart::form::text::TextConfig;
use actix_web::http::header::{self, ContentType};
use actix_web::{web, HttpResponse};
use askama::Template;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::auth::AUTH_COOKIE;
use crate::csrf::CsrfToken;
use crate::errors::{AppError, AppResult};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Feed pages
        posts::index,
        posts::group_posts,
        posts::profile,
        posts::post_detail,
        posts::follow_index,
        posts::likes_index,
        // Authoring
        posts::post_create_form,
        posts::post_create,
        posts::post_edit_form,
        posts::post_edit,
        posts::add_comment,
        // Social toggles
        social::profile_follow,
        social::profile_unfollow,
        social::like,
        social::unlike,
        // Accounts
        accounts::signup_form,
        accounts::signup,
        accounts::login_form,
        accounts::login,
        accounts::logout,
    ),
    components(schemas(
        crate::forms::CommentForm,
        crate::forms::TokenForm,
        crate::forms::SignupForm,
        crate::forms::LoginForm,
    )),
    tags(
        (name = "posts", description = "Feeds and post pages"),
        (name = "social", description = "Follow and like toggles"),
        (name = "accounts", description = "Sign up, log in, log out"),
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(AUTH_COOKIE))),
            )
        }
    }
}

/// Registers every page route. The 404 fallback is installed by the caller
/// with `default_service`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Browsers send plain form fields of a multipart body without a content type.
    cfg.app_data(TextConfig::default().validate_content_type(false));
    // `/posts/abc/` is an unknown page, not a bad request.
    cfg.app_data(web::PathConfig::default().error_handler(|_, _| AppError::NotFound.into()));

    cfg.route("/", web::get().to(posts::index))
        .route("/group/{slug}/", web::get().to(posts::group_posts))
        .route("/profile/{username}/", web::get().to(posts::profile))
        .route(
            "/profile/{username}/follow/",
            web::get().to(social::profile_follow),
        )
        .route(
            "/profile/{username}/follow/",
            web::post().to(social::profile_follow),
        )
        .route(
            "/profile/{username}/unfollow/",
            web::get().to(social::profile_unfollow),
        )
        .route(
            "/profile/{username}/unfollow/",
            web::post().to(social::profile_unfollow),
        )
        .route("/posts/{post_id}/", web::get().to(posts::post_detail))
        .route("/posts/{post_id}/edit/", web::get().to(posts::post_edit_form))
        .route("/posts/{post_id}/edit/", web::post().to(posts::post_edit))
        .route("/posts/{post_id}/comment/", web::post().to(posts::add_comment))
        .route("/posts/{post_id}/like/", web::get().to(social::like))
        .route("/posts/{post_id}/like/", web::post().to(social::like))
        .route("/posts/{post_id}/unlike/", web::get().to(social::unlike))
        .route("/posts/{post_id}/unlike/", web::post().to(social::unlike))
        .route("/create/", web::get().to(posts::post_create_form))
        .route("/create/", web::post().to(posts::post_create))
        .route("/follow/", web::get().to(posts::follow_index))
        .route("/likes/", web::get().to(posts::likes_index))
        .service(
            web::scope("/auth")
                .route("/signup/", web::get().to(accounts::signup_form))
                .route("/signup/", web::post().to(accounts::signup))
                .route("/login/", web::get().to(accounts::login_form))
                .route("/login/", web::post().to(accounts::login))
                .route("/logout/", web::get().to(accounts::logout))
                .route("/logout/", web::post().to(accounts::logout)),
        )
        .service(
            web::scope("/about")
                .route("/author/", web::get().to(pages::about_author))
                .route("/tech/", web::get().to(pages::about_tech)),
        );
}

pub(crate) fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body)
}

/// Renders a page that carries a form, issuing the CSRF cookie if needed.
pub(crate) fn render_form<T: Template>(csrf: &CsrfToken, template: &T) -> AppResult<HttpResponse> {
    let body = template.render()?;
    let mut builder = HttpResponse::Ok();
    csrf.set_cookie(&mut builder);
    Ok(builder.content_type(ContentType::html()).body(body))
}

pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .append_header((header::LOCATION, location.to_string()))
        .finish()
}
