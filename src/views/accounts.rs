use crate::auth::{create_token, AuthenticatedUser, Claims, AUTH_COOKIE};
use crate::config::Config;
use crate::csrf::{self, CsrfToken};
use crate::db::DbPool;
use crate::entities::user;
use crate::errors::AppResult;
use crate::forms::{LoginForm, SignupErrors, SignupForm};
use crate::services::accounts;
use crate::templates::{LoggedOutTemplate, LoginTemplate, Nav, SignupTemplate};
use crate::urls;
use actix_web::cookie::{time, Cookie, SameSite};
use actix_web::http::header::{self, ContentType};
use actix_web::{web, HttpRequest, HttpResponse};
use askama::Template;
use serde::Deserialize;
use utoipa::IntoParams;

use super::render_form;

const BAD_CREDENTIALS: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";
const USERNAME_TAKEN: &str = "A user with that username already exists.";

#[derive(Debug, Deserialize, IntoParams)]
pub struct NextQuery {
    /// Local path to return to after logging in.
    pub next: Option<String>,
}

fn session_cookie(config: &Config, user: &user::Model) -> AppResult<Cookie<'static>> {
    let claims = Claims::new(user.id, user.username.clone(), config.jwt.expiration_hours);
    let token = create_token(&claims, &config.jwt.secret)?;

    Ok(Cookie::build(AUTH_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::hours(config.jwt.expiration_hours))
        .finish())
}

fn signed_in(config: &Config, user: &user::Model, location: &str) -> AppResult<HttpResponse> {
    let cookie = session_cookie(config, user)?;
    Ok(HttpResponse::Found()
        .cookie(cookie)
        .append_header((header::LOCATION, location.to_string()))
        .finish())
}

#[utoipa::path(
    get,
    path = "/auth/signup/",
    responses((status = 200, description = "Sign up form")),
    tag = "accounts"
)]
pub async fn signup_form(user: Option<AuthenticatedUser>, csrf: CsrfToken) -> AppResult<HttpResponse> {
    let template = SignupTemplate {
        nav: Nav::for_user(user.as_ref()),
        form: SignupForm::default(),
        errors: SignupErrors::default(),
        csrf_token: csrf.value().to_string(),
    };
    render_form(&csrf, &template)
}

#[utoipa::path(
    post,
    path = "/auth/signup/",
    request_body(content = SignupForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Account created and signed in"),
        (status = 200, description = "Form re-rendered with errors"),
        (status = 403, description = "CSRF check failed")
    ),
    tag = "accounts"
)]
pub async fn signup(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    csrf: CsrfToken,
    form: web::Form<SignupForm>,
) -> AppResult<HttpResponse> {
    csrf::verify(&req, &form.csrf_token)?;
    let db = pool.get_ref();

    let mut errors = form.validate();
    let username = form.username.trim();
    if errors.username.is_empty() && accounts::find_by_username(db, username).await?.is_some() {
        errors.username.push(USERNAME_TAKEN.to_string());
    }

    if !errors.is_empty() {
        let mut bound = form.into_inner();
        bound.password.clear();
        let template = SignupTemplate {
            nav: Nav::anonymous(),
            form: bound,
            errors,
            csrf_token: csrf.value().to_string(),
        };
        return render_form(&csrf, &template);
    }

    let user = accounts::create_user(
        db,
        username,
        form.email.trim(),
        &form.password,
        config.jwt.bcrypt_cost,
    )
    .await?;

    signed_in(&config, &user, urls::INDEX_URL)
}

#[utoipa::path(
    get,
    path = "/auth/login/",
    params(NextQuery),
    responses((status = 200, description = "Login form")),
    tag = "accounts"
)]
pub async fn login_form(
    user: Option<AuthenticatedUser>,
    csrf: CsrfToken,
    query: web::Query<NextQuery>,
) -> AppResult<HttpResponse> {
    let template = LoginTemplate {
        nav: Nav::for_user(user.as_ref()),
        form: LoginForm::default(),
        next: query.next.clone().unwrap_or_default(),
        error: None,
        csrf_token: csrf.value().to_string(),
    };
    render_form(&csrf, &template)
}

#[utoipa::path(
    post,
    path = "/auth/login/",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Signed in, redirect to `next` or the index"),
        (status = 200, description = "Form re-rendered with an error"),
        (status = 403, description = "CSRF check failed")
    ),
    tag = "accounts"
)]
pub async fn login(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    csrf: CsrfToken,
    form: web::Form<LoginForm>,
) -> AppResult<HttpResponse> {
    csrf::verify(&req, &form.csrf_token)?;

    match accounts::authenticate(pool.get_ref(), form.username.trim(), &form.password).await? {
        Some(user) => {
            log::info!("User {} logged in", user.username);
            let target = urls::safe_next(form.next.as_deref().filter(|n| !n.is_empty()));
            signed_in(&config, &user, &target)
        }
        None => {
            let mut bound = form.into_inner();
            bound.password.clear();
            let template = LoginTemplate {
                nav: Nav::anonymous(),
                next: bound.next.clone().unwrap_or_default(),
                form: bound,
                error: Some(BAD_CREDENTIALS.to_string()),
                csrf_token: csrf.value().to_string(),
            };
            render_form(&csrf, &template)
        }
    }
}

#[utoipa::path(
    post,
    path = "/auth/logout/",
    responses((status = 200, description = "Session cookie cleared")),
    tag = "accounts"
)]
pub async fn logout() -> AppResult<HttpResponse> {
    let mut removal = Cookie::build(AUTH_COOKIE, "").path("/").finish();
    removal.make_removal();

    let body = LoggedOutTemplate {
        nav: Nav::anonymous(),
    }
    .render()?;
    Ok(HttpResponse::Ok()
        .cookie(removal)
        .content_type(ContentType::html())
        .body(body))
}
