//! Double-submit CSRF tokens for HTML forms.
//!
//! A page with a form makes sure the browser holds a `csrftoken` cookie and
//! embeds the same value in a hidden `csrf_token` field. A submission is
//! accepted only when both agree.

use crate::errors::AppError;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{FromRequest, HttpRequest, HttpResponseBuilder};
use std::convert::Infallible;
use std::future::{ready, Ready};
use uuid::Uuid;

pub const CSRF_COOKIE: &str = "csrftoken";

#[derive(Debug, Clone)]
pub struct CsrfToken {
    value: String,
    fresh: bool,
}

impl CsrfToken {
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Issues the cookie on the response when the browser did not send one.
    pub fn set_cookie(&self, builder: &mut HttpResponseBuilder) {
        if self.fresh {
            builder.cookie(
                Cookie::build(CSRF_COOKIE, self.value.clone())
                    .path("/")
                    .same_site(SameSite::Lax)
                    .finish(),
            );
        }
    }
}

impl FromRequest for CsrfToken {
    type Error = Infallible;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let token = match req.cookie(CSRF_COOKIE) {
            Some(cookie) if !cookie.value().is_empty() => CsrfToken {
                value: cookie.value().to_string(),
                fresh: false,
            },
            _ => CsrfToken {
                value: Uuid::new_v4().simple().to_string(),
                fresh: true,
            },
        };
        ready(Ok(token))
    }
}

fn tokens_match(expected: &str, submitted: &str) -> bool {
    if expected.is_empty() || expected.len() != submitted.len() {
        return false;
    }
    expected
        .bytes()
        .zip(submitted.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

/// Checks a submitted form token against the request cookie.
pub fn verify(req: &HttpRequest, submitted: &str) -> Result<(), AppError> {
    let cookie = req.cookie(CSRF_COOKIE);
    match cookie {
        Some(cookie) if tokens_match(cookie.value(), submitted) => Ok(()),
        _ => Err(AppError::CsrfFailure),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn matching_token_passes() {
        let req = TestRequest::default()
            .cookie(Cookie::new(CSRF_COOKIE, "abc123"))
            .to_http_request();
        assert!(verify(&req, "abc123").is_ok());
    }

    #[test]
    fn missing_cookie_or_mismatch_fails() {
        let req = TestRequest::default().to_http_request();
        assert!(matches!(verify(&req, "abc123"), Err(AppError::CsrfFailure)));

        let req = TestRequest::default()
            .cookie(Cookie::new(CSRF_COOKIE, "abc123"))
            .to_http_request();
        assert!(verify(&req, "abc124").is_err());
        assert!(verify(&req, "").is_err());
    }
}
