use crate::auth::{full_path, AuthenticatedUser};
use crate::cache::PageCache;
use crate::config::Config;
use crate::csrf::{self, CsrfToken};
use crate::db::DbPool;
use crate::entities::post;
use crate::errors::{AppError, AppResult};
use crate::forms::{CommentForm, ImageUpload, PostForm, PostFormView};
use crate::media;
use crate::models::{GroupOption, ProfileView};
use crate::pagination::{paginate, PageQuery};
use crate::services::{accounts, follows, likes, posts};
use crate::templates::{
    FollowIndexTemplate, GroupListTemplate, IndexTemplate, LikesIndexTemplate, Nav,
    PostDetailTemplate, PostFormTemplate, ProfileTemplate,
};
use crate::urls;
use actix_multipart::form::tempfile::TempFile;
use actix_multipart::form::text::Text;
use actix_multipart::form::MultipartForm;
use actix_web::{web, HttpRequest, HttpResponse};
use askama::Template;

use super::{html, redirect, render_form};

/// Multipart body of the post create/edit form.
#[derive(MultipartForm)]
pub struct PostUpload {
    pub text: Option<Text<String>>,
    pub group: Option<Text<String>>,
    pub image: Option<TempFile>,
    pub csrf_token: Option<Text<String>>,
}

impl PostUpload {
    fn csrf_token(&self) -> &str {
        self.csrf_token.as_ref().map(|t| t.0.as_str()).unwrap_or_default()
    }

    /// Browsers submit an empty part for an untouched file input.
    fn image_file(&self) -> Option<&TempFile> {
        self.image.as_ref().filter(|file| file.size > 0)
    }

    fn to_form(&self) -> PostForm {
        PostForm {
            text: self.text.as_ref().map(|t| t.0.clone()).unwrap_or_default(),
            group: self.group.as_ref().map(|g| g.0.clone()),
            image: self.image_file().map(|file| ImageUpload {
                file_name: file.file_name.clone().unwrap_or_default(),
                content_type: file
                    .content_type
                    .as_ref()
                    .map(|mime| mime.essence_str().to_string()),
                size: file.size,
            }),
        }
    }
}

async fn get_post(pool: &DbPool, post_id: i32) -> AppResult<post::Model> {
    posts::find_post(pool, post_id)
        .await?
        .ok_or(AppError::NotFound)
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Latest posts, cached for a short time")
    ),
    tag = "posts"
)]
pub async fn index(
    req: HttpRequest,
    user: Option<AuthenticatedUser>,
    pool: web::Data<DbPool>,
    cache: web::Data<PageCache>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    // The header differs per viewer, so the viewer is part of the key.
    let viewer = user.as_ref().map(|u| u.username.as_str()).unwrap_or_default();
    let key = format!("{}|{}", full_path(&req), viewer);
    if let Some(body) = cache.get(&key) {
        return Ok(html(body));
    }

    let page = paginate(pool.get_ref(), posts::all_posts(), query.page.as_deref()).await?;
    let views = posts::hydrate(pool.get_ref(), &page.object_list).await?;

    let body = IndexTemplate {
        nav: Nav::for_user(user.as_ref()),
        page: page.with_items(views),
    }
    .render()?;
    cache.insert(key, body.clone());

    Ok(html(body))
}

#[utoipa::path(
    get,
    path = "/group/{slug}/",
    responses(
        (status = 200, description = "Posts of the group"),
        (status = 404, description = "Unknown group")
    ),
    tag = "posts"
)]
pub async fn group_posts(
    path: web::Path<String>,
    user: Option<AuthenticatedUser>,
    pool: web::Data<DbPool>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let group = posts::find_group_by_slug(pool.get_ref(), &slug)
        .await?
        .ok_or(AppError::NotFound)?;

    let page = paginate(
        pool.get_ref(),
        posts::group_posts(group.id),
        query.page.as_deref(),
    )
    .await?;
    let views = posts::hydrate(pool.get_ref(), &page.object_list).await?;

    let body = GroupListTemplate {
        nav: Nav::for_user(user.as_ref()),
        group,
        page: page.with_items(views),
    }
    .render()?;
    Ok(html(body))
}

#[utoipa::path(
    get,
    path = "/profile/{username}/",
    responses(
        (status = 200, description = "Posts of the author"),
        (status = 404, description = "Unknown user")
    ),
    tag = "posts"
)]
pub async fn profile(
    path: web::Path<String>,
    user: Option<AuthenticatedUser>,
    pool: web::Data<DbPool>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let username = path.into_inner();
    let db = pool.get_ref();
    let author = accounts::find_by_username(db, &username)
        .await?
        .ok_or(AppError::NotFound)?;

    let page = paginate(db, posts::author_posts(author.id), query.page.as_deref()).await?;
    let views = posts::hydrate(db, &page.object_list).await?;

    let viewer_id = user.as_ref().map(|u| u.user_id);
    let following = follows::is_following(db, viewer_id, author.id).await?;
    let profile = ProfileView::new(
        &author,
        page.count,
        follows::follower_count(db, author.id).await?,
        follows::following_count(db, author.id).await?,
    );

    let body = ProfileTemplate {
        nav: Nav::for_user(user.as_ref()),
        author: profile,
        following,
        can_follow: viewer_id.is_some_and(|id| id != author.id),
        page: page.with_items(views),
    }
    .render()?;
    Ok(html(body))
}

#[utoipa::path(
    get,
    path = "/posts/{post_id}/",
    responses(
        (status = 200, description = "Post with its comments and likes"),
        (status = 404, description = "Unknown post")
    ),
    tag = "posts"
)]
pub async fn post_detail(
    path: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    pool: web::Data<DbPool>,
    csrf: CsrfToken,
) -> AppResult<HttpResponse> {
    let db = pool.get_ref();
    let post = get_post(db, path.into_inner()).await?;
    let viewer_id = user.as_ref().map(|u| u.user_id);

    let view = posts::hydrate(db, std::slice::from_ref(&post))
        .await?
        .pop()
        .ok_or(AppError::NotFound)?;
    let liked_by = likes::get_likes(db, &post)
        .await?
        .into_iter()
        .map(|u| u.username)
        .collect();

    let template = PostDetailTemplate {
        nav: Nav::for_user(user.as_ref()),
        title: post.to_string(),
        post: view,
        author_post_count: posts::count_author_posts(db, post.author_id).await?,
        can_edit: viewer_id == Some(post.author_id),
        comments: posts::comments_for(db, post.id).await?,
        csrf_token: csrf.value().to_string(),
        post_is_liked: likes::is_liked(db, &post, viewer_id).await?,
        like_count: likes::count_likes(db, &post).await?,
        liked_by,
    };
    render_form(&csrf, &template)
}

#[utoipa::path(
    get,
    path = "/create/",
    responses(
        (status = 200, description = "Empty post form"),
        (status = 302, description = "Redirect to login")
    ),
    security(("session_cookie" = [])),
    tag = "posts"
)]
pub async fn post_create_form(
    user: AuthenticatedUser,
    pool: web::Data<DbPool>,
    csrf: CsrfToken,
) -> AppResult<HttpResponse> {
    let groups = posts::all_groups(pool.get_ref()).await?;
    let template = PostFormTemplate {
        nav: Nav::for_user(Some(&user)),
        form: PostFormView::default(),
        groups: GroupOption::list(&groups, None),
        is_edit: false,
        post_id: 0,
        csrf_token: csrf.value().to_string(),
    };
    render_form(&csrf, &template)
}

#[utoipa::path(
    post,
    path = "/create/",
    responses(
        (status = 302, description = "Post created, redirect to the author's profile"),
        (status = 200, description = "Form re-rendered with errors"),
        (status = 403, description = "CSRF check failed")
    ),
    security(("session_cookie" = [])),
    tag = "posts"
)]
pub async fn post_create(
    user: AuthenticatedUser,
    req: HttpRequest,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    csrf: CsrfToken,
    upload: MultipartForm<PostUpload>,
) -> AppResult<HttpResponse> {
    csrf::verify(&req, upload.csrf_token())?;
    let db = pool.get_ref();
    let groups = posts::all_groups(db).await?;
    let form = upload.to_form();

    let cleaned = match form.validate(&groups) {
        Ok(cleaned) => cleaned,
        Err(errors) => {
            let selected = form.group.as_deref().and_then(|g| g.parse().ok());
            let template = PostFormTemplate {
                nav: Nav::for_user(Some(&user)),
                form: PostFormView::bound(&form, errors),
                groups: GroupOption::list(&groups, selected),
                is_edit: false,
                post_id: 0,
                csrf_token: csrf.value().to_string(),
            };
            return render_form(&csrf, &template);
        }
    };

    let image = match upload.image_file() {
        Some(file) if cleaned.has_image => {
            Some(media::store_post_image(&config.media.root, file).await?)
        }
        _ => None,
    };

    posts::create_post(
        db,
        user.user_id,
        posts::PostData {
            text: cleaned.text,
            group_id: cleaned.group_id,
            image,
        },
    )
    .await?;

    Ok(redirect(&urls::profile(&user.username)))
}

#[utoipa::path(
    get,
    path = "/posts/{post_id}/edit/",
    responses(
        (status = 200, description = "Post form filled with the current values"),
        (status = 302, description = "Not the author: redirect to the post"),
        (status = 404, description = "Unknown post")
    ),
    security(("session_cookie" = [])),
    tag = "posts"
)]
pub async fn post_edit_form(
    user: AuthenticatedUser,
    path: web::Path<i32>,
    pool: web::Data<DbPool>,
    csrf: CsrfToken,
) -> AppResult<HttpResponse> {
    let db = pool.get_ref();
    let post = get_post(db, path.into_inner()).await?;
    if post.author_id != user.user_id {
        return Ok(redirect(&urls::post_detail(post.id)));
    }

    let groups = posts::all_groups(db).await?;
    let template = PostFormTemplate {
        nav: Nav::for_user(Some(&user)),
        form: PostFormView::initial(&post.text),
        groups: GroupOption::list(&groups, post.group_id),
        is_edit: true,
        post_id: post.id,
        csrf_token: csrf.value().to_string(),
    };
    render_form(&csrf, &template)
}

#[utoipa::path(
    post,
    path = "/posts/{post_id}/edit/",
    responses(
        (status = 302, description = "Saved, or not the author: redirect to the post"),
        (status = 200, description = "Form re-rendered with errors"),
        (status = 404, description = "Unknown post")
    ),
    security(("session_cookie" = [])),
    tag = "posts"
)]
pub async fn post_edit(
    user: AuthenticatedUser,
    path: web::Path<i32>,
    req: HttpRequest,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    csrf: CsrfToken,
    upload: MultipartForm<PostUpload>,
) -> AppResult<HttpResponse> {
    let db = pool.get_ref();
    let post = get_post(db, path.into_inner()).await?;
    if post.author_id != user.user_id {
        return Ok(redirect(&urls::post_detail(post.id)));
    }
    csrf::verify(&req, upload.csrf_token())?;

    let groups = posts::all_groups(db).await?;
    let form = upload.to_form();
    let cleaned = match form.validate(&groups) {
        Ok(cleaned) => cleaned,
        Err(errors) => {
            let selected = form.group.as_deref().and_then(|g| g.parse().ok());
            let template = PostFormTemplate {
                nav: Nav::for_user(Some(&user)),
                form: PostFormView::bound(&form, errors),
                groups: GroupOption::list(&groups, selected),
                is_edit: true,
                post_id: post.id,
                csrf_token: csrf.value().to_string(),
            };
            return render_form(&csrf, &template);
        }
    };

    let image = match upload.image_file() {
        Some(file) if cleaned.has_image => {
            Some(media::store_post_image(&config.media.root, file).await?)
        }
        _ => None,
    };

    let updated = posts::update_post(
        db,
        post,
        posts::PostData {
            text: cleaned.text,
            group_id: cleaned.group_id,
            image,
        },
    )
    .await?;

    Ok(redirect(&urls::post_detail(updated.id)))
}

#[utoipa::path(
    post,
    path = "/posts/{post_id}/comment/",
    request_body(content = CommentForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Redirect to the post"),
        (status = 403, description = "CSRF check failed"),
        (status = 404, description = "Unknown post")
    ),
    security(("session_cookie" = [])),
    tag = "posts"
)]
pub async fn add_comment(
    user: AuthenticatedUser,
    path: web::Path<i32>,
    req: HttpRequest,
    pool: web::Data<DbPool>,
    form: web::Form<CommentForm>,
) -> AppResult<HttpResponse> {
    csrf::verify(&req, &form.csrf_token)?;
    let db = pool.get_ref();
    let post = get_post(db, path.into_inner()).await?;

    if let Ok(text) = form.validate() {
        posts::add_comment(db, post.id, user.user_id, text).await?;
    }

    Ok(redirect(&urls::post_detail(post.id)))
}

#[utoipa::path(
    get,
    path = "/follow/",
    responses(
        (status = 200, description = "Posts of followed authors"),
        (status = 302, description = "Redirect to login")
    ),
    security(("session_cookie" = [])),
    tag = "posts"
)]
pub async fn follow_index(
    user: AuthenticatedUser,
    pool: web::Data<DbPool>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = paginate(
        pool.get_ref(),
        posts::followed_posts(user.user_id),
        query.page.as_deref(),
    )
    .await?;
    let views = posts::hydrate(pool.get_ref(), &page.object_list).await?;

    let body = FollowIndexTemplate {
        nav: Nav::for_user(Some(&user)),
        page: page.with_items(views),
    }
    .render()?;
    Ok(html(body))
}

#[utoipa::path(
    get,
    path = "/likes/",
    responses(
        (status = 200, description = "Posts the user liked"),
        (status = 302, description = "Redirect to login")
    ),
    security(("session_cookie" = [])),
    tag = "posts"
)]
pub async fn likes_index(
    user: AuthenticatedUser,
    pool: web::Data<DbPool>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = paginate(
        pool.get_ref(),
        posts::liked_posts(user.user_id),
        query.page.as_deref(),
    )
    .await?;
    let views = posts::hydrate(pool.get_ref(), &page.object_list).await?;

    let body = LikesIndexTemplate {
        nav: Nav::for_user(Some(&user)),
        page: page.with_items(views),
    }
    .render()?;
    Ok(html(body))
}
