//! Static pages and the catch-all 404.

use crate::auth::AuthenticatedUser;
use crate::errors::{render_status, AppResult};
use crate::templates::{AboutAuthorTemplate, AboutTechTemplate, Nav, NotFoundTemplate};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse};
use askama::Template;

use super::html;

pub async fn about_author(user: Option<AuthenticatedUser>) -> AppResult<HttpResponse> {
    let body = AboutAuthorTemplate {
        nav: Nav::for_user(user.as_ref()),
    }
    .render()?;
    Ok(html(body))
}

pub async fn about_tech(user: Option<AuthenticatedUser>) -> AppResult<HttpResponse> {
    let body = AboutTechTemplate {
        nav: Nav::for_user(user.as_ref()),
    }
    .render()?;
    Ok(html(body))
}

/// Fallback for unmatched routes.
pub async fn page_not_found(req: HttpRequest, user: Option<AuthenticatedUser>) -> HttpResponse {
    log::debug!("No route for {}", req.path());
    render_status(
        StatusCode::NOT_FOUND,
        &NotFoundTemplate {
            nav: Nav::for_user(user.as_ref()),
            path: Some(req.path().to_string()),
        },
    )
}
