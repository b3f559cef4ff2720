//! askama templates. Every page extends `base.html`, which reads `nav`.

use crate::auth::AuthenticatedUser;
use crate::entities::group;
use crate::forms::{LoginForm, PostFormView, SignupErrors, SignupForm};
use crate::models::{CommentView, GroupOption, PostView, ProfileView};
use crate::pagination::Page;
use askama::Template;

/// Who is looking at the page, for the site header.
#[derive(Debug, Clone, Default)]
pub struct Nav {
    pub username: Option<String>,
}

impl Nav {
    pub fn anonymous() -> Self {
        Nav { username: None }
    }

    pub fn for_user(user: Option<&AuthenticatedUser>) -> Self {
        Nav {
            username: user.map(|u| u.username.clone()),
        }
    }
}

#[derive(Template)]
#[template(path = "posts/index.html")]
pub struct IndexTemplate {
    pub nav: Nav,
    pub page: Page<PostView>,
}

#[derive(Template)]
#[template(path = "posts/group_list.html")]
pub struct GroupListTemplate {
    pub nav: Nav,
    pub group: group::Model,
    pub page: Page<PostView>,
}

#[derive(Template)]
#[template(path = "posts/profile.html")]
pub struct ProfileTemplate {
    pub nav: Nav,
    pub author: ProfileView,
    pub following: bool,
    pub can_follow: bool,
    pub page: Page<PostView>,
}

#[derive(Template)]
#[template(path = "posts/post_detail.html")]
pub struct PostDetailTemplate {
    pub nav: Nav,
    pub title: String,
    pub post: PostView,
    pub author_post_count: u64,
    pub can_edit: bool,
    pub comments: Vec<CommentView>,
    pub csrf_token: String,
    pub post_is_liked: bool,
    pub like_count: u64,
    pub liked_by: Vec<String>,
}

#[derive(Template)]
#[template(path = "posts/create_post.html")]
pub struct PostFormTemplate {
    pub nav: Nav,
    pub form: PostFormView,
    pub groups: Vec<GroupOption>,
    pub is_edit: bool,
    pub post_id: i32,
    pub csrf_token: String,
}

#[derive(Template)]
#[template(path = "posts/follow.html")]
pub struct FollowIndexTemplate {
    pub nav: Nav,
    pub page: Page<PostView>,
}

#[derive(Template)]
#[template(path = "posts/like.html")]
pub struct LikesIndexTemplate {
    pub nav: Nav,
    pub page: Page<PostView>,
}

#[derive(Template)]
#[template(path = "users/signup.html")]
pub struct SignupTemplate {
    pub nav: Nav,
    pub form: SignupForm,
    pub errors: SignupErrors,
    pub csrf_token: String,
}

#[derive(Template)]
#[template(path = "users/login.html")]
pub struct LoginTemplate {
    pub nav: Nav,
    pub form: LoginForm,
    pub next: String,
    pub error: Option<String>,
    pub csrf_token: String,
}

#[derive(Template)]
#[template(path = "users/logged_out.html")]
pub struct LoggedOutTemplate {
    pub nav: Nav,
}

#[derive(Template)]
#[template(path = "about/author.html")]
pub struct AboutAuthorTemplate {
    pub nav: Nav,
}

#[derive(Template)]
#[template(path = "about/tech.html")]
pub struct AboutTechTemplate {
    pub nav: Nav,
}

#[derive(Template)]
#[template(path = "core/404.html")]
pub struct NotFoundTemplate {
    pub nav: Nav,
    pub path: Option<String>,
}

#[derive(Template)]
#[template(path = "core/403csrf.html")]
pub struct CsrfFailureTemplate {
    pub nav: Nav,
}

#[derive(Template)]
#[template(path = "core/500.html")]
pub struct ServerErrorTemplate {
    pub nav: Nav,
}
