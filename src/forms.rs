//! Input validation for the HTML forms.
//!
//! Each form validates into a cleaned value or a set of per-field errors
//! that the view re-renders next to the bound input.

use crate::entities::group;
use crate::media;
use serde::Deserialize;
use utoipa::ToSchema;

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_CHOICE: &str = "Select a valid choice.";
pub const INVALID_IMAGE: &str = "Upload a valid image.";

pub const USERNAME_MAX_LEN: usize = 150;
pub const PASSWORD_MIN_LEN: usize = 8;

/// Metadata of an uploaded file, detached from the temp file holding it.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub size: usize,
}

/// Raw input of the post create/edit form.
#[derive(Debug, Clone, Default)]
pub struct PostForm {
    pub text: String,
    pub group: Option<String>,
    pub image: Option<ImageUpload>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedPost {
    pub text: String,
    pub group_id: Option<i32>,
    pub has_image: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFormErrors {
    pub text: Vec<String>,
    pub group: Vec<String>,
    pub image: Vec<String>,
}

impl PostFormErrors {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.group.is_empty() && self.image.is_empty()
    }
}

impl PostForm {
    pub fn validate(&self, groups: &[group::Model]) -> Result<CleanedPost, PostFormErrors> {
        let mut errors = PostFormErrors::default();

        if self.text.trim().is_empty() {
            errors.text.push(REQUIRED.to_string());
        }

        let group_id = match self.group.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match raw.parse::<i32>() {
                Ok(id) if groups.iter().any(|g| g.id == id) => Some(id),
                _ => {
                    errors.group.push(INVALID_CHOICE.to_string());
                    None
                }
            },
        };

        let has_image = match &self.image {
            None => false,
            Some(image) => {
                // The declared type must agree with the one guessed from the name.
                let is_image = media::image_extension(&image.file_name).is_some()
                    && image
                        .content_type
                        .as_deref()
                        .is_some_and(|ct| ct.starts_with("image/"));
                if !is_image {
                    errors.image.push(INVALID_IMAGE.to_string());
                }
                is_image
            }
        };

        if errors.is_empty() {
            Ok(CleanedPost {
                text: self.text.trim().to_string(),
                group_id,
                has_image,
            })
        } else {
            Err(errors)
        }
    }
}

/// Bound state of the post form as shown by the template.
#[derive(Debug, Clone, Default)]
pub struct PostFormView {
    pub text: String,
    pub errors: PostFormErrors,
}

impl PostFormView {
    pub fn bound(form: &PostForm, errors: PostFormErrors) -> Self {
        PostFormView {
            text: form.text.clone(),
            errors,
        }
    }

    pub fn initial(text: &str) -> Self {
        PostFormView {
            text: text.to_string(),
            errors: PostFormErrors::default(),
        }
    }
}

/// Body of a toggle submitted by POST: only the CSRF field.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct TokenForm {
    #[serde(default)]
    pub csrf_token: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CommentForm {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub csrf_token: String,
}

impl CommentForm {
    pub fn validate(&self) -> Result<String, Vec<String>> {
        let text = self.text.trim();
        if text.is_empty() {
            Err(vec![REQUIRED.to_string()])
        } else {
            Ok(text.to_string())
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub csrf_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupErrors {
    pub username: Vec<String>,
    pub email: Vec<String>,
    pub password: Vec<String>,
}

impl SignupErrors {
    pub fn is_empty(&self) -> bool {
        self.username.is_empty() && self.email.is_empty() && self.password.is_empty()
    }
}

fn valid_username(username: &str) -> bool {
    !username.is_empty()
        && username.chars().count() <= USERNAME_MAX_LEN
        && username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

impl SignupForm {
    /// Field-level checks only; uniqueness is checked against the database.
    pub fn validate(&self) -> SignupErrors {
        let mut errors = SignupErrors::default();
        let username = self.username.trim();

        if username.is_empty() {
            errors.username.push(REQUIRED.to_string());
        } else if !valid_username(username) {
            errors.username.push(
                "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
                    .to_string(),
            );
        }

        let email = self.email.trim();
        if email.is_empty() {
            errors.email.push(REQUIRED.to_string());
        } else if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
            errors.email.push("Enter a valid email address.".to_string());
        }

        if self.password.chars().count() < PASSWORD_MIN_LEN {
            errors.password.push(format!(
                "This password is too short. It must contain at least {} characters.",
                PASSWORD_MIN_LEN
            ));
        }

        errors
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub next: Option<String>,
    #[serde(default)]
    pub csrf_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups() -> Vec<group::Model> {
        vec![group::Model {
            id: 4,
            title: "Cats".to_string(),
            slug: "cats".to_string(),
            description: String::new(),
        }]
    }

    #[test]
    fn post_form_requires_text() {
        let form = PostForm {
            text: "   ".to_string(),
            ..Default::default()
        };
        let errors = form.validate(&groups()).unwrap_err();
        assert_eq!(errors.text, vec![REQUIRED.to_string()]);
        assert!(errors.group.is_empty());
    }

    #[test]
    fn post_form_accepts_known_group_or_none() {
        let form = PostForm {
            text: "hello".to_string(),
            group: Some("4".to_string()),
            image: None,
        };
        assert_eq!(form.validate(&groups()).unwrap().group_id, Some(4));

        let form = PostForm {
            text: "hello".to_string(),
            group: Some(String::new()),
            image: None,
        };
        assert_eq!(form.validate(&groups()).unwrap().group_id, None);
    }

    #[test]
    fn post_form_rejects_unknown_group() {
        let form = PostForm {
            text: "hello".to_string(),
            group: Some("99".to_string()),
            image: None,
        };
        assert_eq!(
            form.validate(&groups()).unwrap_err().group,
            vec![INVALID_CHOICE.to_string()]
        );
    }

    #[test]
    fn post_form_rejects_non_image_upload() {
        let form = PostForm {
            text: "hello".to_string(),
            group: None,
            image: Some(ImageUpload {
                file_name: "notes.txt".to_string(),
                content_type: Some("text/plain".to_string()),
                size: 12,
            }),
        };
        assert_eq!(
            form.validate(&groups()).unwrap_err().image,
            vec![INVALID_IMAGE.to_string()]
        );
    }

    #[test]
    fn post_form_rejects_markup_labelled_as_image() {
        let form = PostForm {
            text: "hello".to_string(),
            group: None,
            image: Some(ImageUpload {
                file_name: "evil.html".to_string(),
                content_type: Some("image/png".to_string()),
                size: 40,
            }),
        };
        assert_eq!(
            form.validate(&groups()).unwrap_err().image,
            vec![INVALID_IMAGE.to_string()]
        );

        let form = PostForm {
            image: Some(ImageUpload {
                file_name: "cat.png".to_string(),
                content_type: Some("image/png".to_string()),
                size: 40,
            }),
            ..form
        };
        assert!(form.validate(&groups()).unwrap().has_image);
    }

    #[test]
    fn post_and_comment_text_is_trimmed() {
        let form = PostForm {
            text: "  spaced out \n".to_string(),
            ..Default::default()
        };
        assert_eq!(form.validate(&groups()).unwrap().text, "spaced out");

        let form = CommentForm {
            text: "\t nice  ".to_string(),
            csrf_token: String::new(),
        };
        assert_eq!(form.validate().unwrap(), "nice");
    }

    #[test]
    fn comment_form_requires_text() {
        let form = CommentForm::default();
        assert!(form.validate().is_err());
        let form = CommentForm {
            text: "nice".to_string(),
            csrf_token: String::new(),
        };
        assert_eq!(form.validate().unwrap(), "nice");
    }

    #[test]
    fn signup_form_checks_fields() {
        let form = SignupForm {
            username: "bad name".to_string(),
            email: "nope".to_string(),
            password: "short".to_string(),
            csrf_token: String::new(),
        };
        let errors = form.validate();
        assert_eq!(errors.username.len(), 1);
        assert_eq!(errors.email.len(), 1);
        assert_eq!(errors.password.len(), 1);

        let form = SignupForm {
            username: "leo.t".to_string(),
            email: "leo@example.com".to_string(),
            password: "long enough".to_string(),
            csrf_token: String::new(),
        };
        assert!(form.validate().is_empty());
    }
}
