//! Reverse routing for the handful of pages handlers redirect to.

pub const INDEX_URL: &str = "/";
pub const LOGIN_URL: &str = "/auth/login/";

pub fn profile(username: &str) -> String {
    format!("/profile/{}/", username)
}

pub fn post_detail(post_id: i32) -> String {
    format!("/posts/{}/", post_id)
}

pub fn group_posts(slug: &str) -> String {
    format!("/group/{}/", slug)
}

pub fn media(path: &str) -> String {
    format!("/media/{}", path)
}

/// Login URL that returns to `next` afterwards.
pub fn login_with_next(next: &str) -> String {
    match serde_urlencoded::to_string([("next", next)]) {
        Ok(query) => format!("{}?{}", LOGIN_URL, query),
        Err(_) => LOGIN_URL.to_string(),
    }
}

/// Only same-site absolute paths are accepted as a post-login target.
pub fn safe_next(next: Option<&str>) -> String {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path.to_string()
        }
        _ => INDEX_URL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_url_encodes_next() {
        assert_eq!(
            login_with_next("/posts/3/edit/?page=2"),
            "/auth/login/?next=%2Fposts%2F3%2Fedit%2F%3Fpage%3D2"
        );
    }

    #[test]
    fn safe_next_rejects_foreign_targets() {
        assert_eq!(safe_next(Some("/create/")), "/create/");
        assert_eq!(safe_next(Some("//evil.example/")), "/");
        assert_eq!(safe_next(Some("https://evil.example/")), "/");
        assert_eq!(safe_next(None), "/");
    }
}
