use crate::entities::user;
use crate::urls;

/// Header block of a profile page.
#[derive(Debug, Clone)]
pub struct ProfileView {
    pub username: String,
    pub post_count: u64,
    pub follower_count: u64,
    pub following_count: u64,
}

impl ProfileView {
    pub fn new(author: &user::Model, post_count: u64, follower_count: u64, following_count: u64) -> Self {
        ProfileView {
            username: author.username.clone(),
            post_count,
            follower_count,
            following_count,
        }
    }

    pub fn follow_url(&self) -> String {
        format!("{}follow/", urls::profile(&self.username))
    }

    pub fn unfollow_url(&self) -> String {
        format!("{}unfollow/", urls::profile(&self.username))
    }
}
