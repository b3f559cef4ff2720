use crate::entities::{comment, group, post, user};
use crate::urls;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupLink {
    pub title: String,
    pub slug: String,
}

impl GroupLink {
    pub fn url(&self) -> String {
        urls::group_posts(&self.slug)
    }
}

impl From<&group::Model> for GroupLink {
    fn from(group: &group::Model) -> Self {
        GroupLink {
            title: group.title.clone(),
            slug: group.slug.clone(),
        }
    }
}

/// A post as listed on feed pages, with author and group resolved.
#[derive(Debug, Clone)]
pub struct PostView {
    pub id: i32,
    pub text: String,
    pub pub_date: String,
    pub author: String,
    pub group: Option<GroupLink>,
    pub image_url: Option<String>,
}

impl PostView {
    pub fn new(post: &post::Model, author: Option<&user::Model>, group: Option<&group::Model>) -> Self {
        PostView {
            id: post.id,
            text: post.text.clone(),
            pub_date: post.pub_date.format("%d %b %Y %H:%M").to_string(),
            author: author.map(|a| a.username.clone()).unwrap_or_default(),
            group: group.map(GroupLink::from),
            image_url: post.image.as_deref().map(urls::media),
        }
    }

    pub fn url(&self) -> String {
        urls::post_detail(self.id)
    }

    pub fn author_url(&self) -> String {
        urls::profile(&self.author)
    }
}

#[derive(Debug, Clone)]
pub struct CommentView {
    pub author: String,
    pub text: String,
    pub created: String,
}

impl CommentView {
    pub fn new(comment: &comment::Model, author: Option<&user::Model>) -> Self {
        CommentView {
            author: author.map(|a| a.username.clone()).unwrap_or_default(),
            text: comment.text.clone(),
            created: comment.created.format("%d %b %Y %H:%M").to_string(),
        }
    }

    pub fn author_url(&self) -> String {
        urls::profile(&self.author)
    }
}

/// One entry of the group `<select>` on the post form.
#[derive(Debug, Clone)]
pub struct GroupOption {
    pub id: i32,
    pub title: String,
    pub selected: bool,
}

impl GroupOption {
    pub fn list(groups: &[group::Model], selected: Option<i32>) -> Vec<GroupOption> {
        groups
            .iter()
            .map(|g| GroupOption {
                id: g.id,
                title: g.title.clone(),
                selected: selected == Some(g.id),
            })
            .collect()
    }
}
