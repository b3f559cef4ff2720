use crate::templates::{CsrfFailureTemplate, Nav, NotFoundTemplate, ServerErrorTemplate};
use crate::urls;
use actix_web::http::header::{self, ContentType};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use askama::Template;
use sea_orm::DbErr;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("object not found")]
    NotFound,
    #[error("login required to access {next}")]
    LoginRequired { next: String },
    #[error("CSRF verification failed")]
    CsrfFailure,
    #[error("database error: {0}")]
    Database(#[from] DbErr),
    #[error("template error: {0}")]
    Template(#[from] askama::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Renders an error page, falling back to a bare status line if the template
/// itself fails.
pub fn render_status<T: Template>(status: StatusCode, template: &T) -> HttpResponse {
    match template.render() {
        Ok(body) => HttpResponse::build(status)
            .content_type(ContentType::html())
            .body(body),
        Err(e) => {
            log::error!("Failed to render error page: {:?}", e);
            HttpResponse::build(status).body(status.to_string())
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::LoginRequired { .. } => StatusCode::FOUND,
            AppError::CsrfFailure => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound => render_status(
                StatusCode::NOT_FOUND,
                &NotFoundTemplate {
                    nav: Nav::anonymous(),
                    path: None,
                },
            ),
            AppError::LoginRequired { next } => HttpResponse::Found()
                .append_header((header::LOCATION, urls::login_with_next(next)))
                .finish(),
            AppError::CsrfFailure => {
                log::warn!("Rejected form submission with a bad CSRF token");
                render_status(
                    StatusCode::FORBIDDEN,
                    &CsrfFailureTemplate {
                        nav: Nav::anonymous(),
                    },
                )
            }
            other => {
                log::error!("Request failed: {:?}", other);
                render_status(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &ServerErrorTemplate {
                        nav: Nav::anonymous(),
                    },
                )
            }
        }
    }
}
