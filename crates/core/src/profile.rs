//! Profile edits made by a user on their own account.

use serde::Deserialize;
use validator::ValidateEmail;

use crate::error::CoreError;
use crate::validation::{check_optional_url, check_text, Violations};

pub const NAME_MAX_CHARS: usize = 50;
pub const BIO_MAX_CHARS: usize = 500;

/// Profile fields a user may change. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
    pub bio: Option<String>,
}

/// Validate the fields present in `update`, returning a trimmed copy.
pub fn validate_profile_update(update: &ProfileUpdate) -> Result<ProfileUpdate, CoreError> {
    let mut v = Violations::new();

    let email = update
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(|e| {
            if !e.to_owned().validate_email() {
                v.push("email", "email", "email must be a valid email address");
            }
            e.to_string()
        });
    let first_name = update
        .first_name
        .as_deref()
        .and_then(|n| check_text(&mut v, "first_name", Some(n), 1, NAME_MAX_CHARS));
    let last_name = update
        .last_name
        .as_deref()
        .and_then(|n| check_text(&mut v, "last_name", Some(n), 1, NAME_MAX_CHARS));
    let image_url = check_optional_url(&mut v, "image_url", update.image_url.as_deref());
    let bio = update.bio.as_deref().map(|b| {
        let b = b.trim();
        if b.chars().count() > BIO_MAX_CHARS {
            v.push(
                "bio",
                "max_length",
                format!("bio must be at most {BIO_MAX_CHARS} characters"),
            );
        }
        b.to_string()
    });

    v.finish(ProfileUpdate {
        email,
        first_name,
        last_name,
        image_url,
        bio,
    })
}
