use crate::auth::verify_token;
use crate::config::Config;
use crate::errors::AppError;
use actix_web::{web, FromRequest, HttpRequest};
use std::future::{ready, Ready};

/// Cookie carrying the session JWT.
pub const AUTH_COOKIE: &str = "auth_token";

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub username: String,
}

fn request_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(AUTH_COOKIE) {
        return Some(cookie.value().to_string());
    }
    req.headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Path and query of the request, used as the `next` target after login.
pub fn full_path(req: &HttpRequest) -> String {
    req.uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.path().to_string())
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let config = req.app_data::<web::Data<Config>>();

        if let (Some(token), Some(config)) = (request_token(req), config) {
            match verify_token(&token, &config.jwt.secret) {
                Ok(claims) => {
                    if let Ok(user_id) = claims.sub.parse::<i32>() {
                        return ready(Ok(AuthenticatedUser {
                            user_id,
                            username: claims.username,
                        }));
                    }
                }
                Err(e) => {
                    log::debug!("Rejected session token: {:?}", e);
                }
            }
        }

        ready(Err(AppError::LoginRequired {
            next: full_path(req),
        }))
    }
}
