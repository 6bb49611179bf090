//! Page keys: ids and slugs that double as file names and URL segments

use crate::{CommonError, CommonResult};

/// Longest accepted key
pub const MAX_KEY_LEN: usize = 128;

/// Accept `[A-Za-z0-9_-]+`, not starting with `-`, up to [`MAX_KEY_LEN`] chars
pub fn validate_key(key: &str) -> CommonResult<()> {
    if key.is_empty() {
        return Err(CommonError::Generic("key is empty".to_string()));
    }
    if key.len() > MAX_KEY_LEN {
        return Err(CommonError::Generic(format!(
            "key is longer than {} characters",
            MAX_KEY_LEN
        )));
    }
    if key.starts_with('-') {
        return Err(CommonError::Generic(format!("key {:?} starts with '-'", key)));
    }
    match key
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        Some(c) => Err(CommonError::Generic(format!(
            "key {:?} contains invalid character {:?}",
            key, c
        ))),
        None => Ok(()),
    }
}

/// Lowercase, dash-separated form of `title` ("My Work!" -> "my-work")
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug.truncate(MAX_KEY_LEN);
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("home").is_ok());
        assert!(validate_key("about_me-2").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("-home").is_err());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("a b").is_err());
        assert!(validate_key(&"x".repeat(MAX_KEY_LEN + 1)).is_err());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("My Work!"), "my-work");
        assert_eq!(slugify("  Hello,   World  "), "hello-world");
        assert_eq!(slugify("Über 2024"), "ber-2024");
        assert_eq!(slugify("!!!"), "");
    }
}
