//! User entity - a registered account

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::{format_count, placeholder_image, short_date, Snowflake};

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 20;
pub const DISPLAY_NAME_MAX_LEN: usize = 30;
pub const BIO_MAX_LEN: usize = 200;
pub const DEFAULT_BIO: &str = "New Redditor";
pub const DEFAULT_BANNER_COLOR: &str = "linear-gradient(135deg, #667eea 0%, #764ba2 100%)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub bio: String,
    pub banner_color: String,
    pub banner_url: String,
    pub karma: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new account. `username` must already be normalized.
    pub fn new(id: Snowflake, username: String, email: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            display_name: username.clone(),
            username,
            email,
            avatar: None,
            bio: DEFAULT_BIO.to_string(),
            banner_color: DEFAULT_BANNER_COLOR.to_string(),
            banner_url: String::new(),
            karma: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// Trim, lowercase, and check a username against the allowed shape
    pub fn normalize_username(raw: &str) -> Result<String, DomainError> {
        let name = raw.trim().to_lowercase();
        let len = name.chars().count();
        if len < USERNAME_MIN_LEN {
            return Err(DomainError::InvalidUsername(format!(
                "must be at least {USERNAME_MIN_LEN} characters"
            )));
        }
        if len > USERNAME_MAX_LEN {
            return Err(DomainError::InvalidUsername(format!(
                "must be at most {USERNAME_MAX_LEN} characters"
            )));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(DomainError::InvalidUsername(
                "can only contain lowercase letters, numbers, and underscores".to_string(),
            ));
        }
        Ok(name)
    }

    pub fn avatar_url(&self) -> String {
        match &self.avatar {
            Some(url) if !url.is_empty() => url.clone(),
            _ => placeholder_image(&self.username, 'U'),
        }
    }

    pub fn formatted_karma(&self) -> String {
        format_count(self.karma)
    }

    pub fn cake_day(&self) -> String {
        short_date(self.created_at)
    }

    /// Set the display name; blank falls back to the username
    pub fn set_display_name(&mut self, display_name: &str) -> Result<(), DomainError> {
        let trimmed = display_name.trim();
        if trimmed.chars().count() > DISPLAY_NAME_MAX_LEN {
            return Err(DomainError::ValidationError(format!(
                "Display name must be at most {DISPLAY_NAME_MAX_LEN} characters"
            )));
        }
        self.display_name = if trimmed.is_empty() {
            self.username.clone()
        } else {
            trimmed.to_string()
        };
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn set_bio(&mut self, bio: &str) -> Result<(), DomainError> {
        let trimmed = bio.trim();
        if trimmed.chars().count() > BIO_MAX_LEN {
            return Err(DomainError::ContentTooLong { max: BIO_MAX_LEN });
        }
        self.bio = trimmed.to_string();
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new(Snowflake::new(1), "ferris".into(), "ferris@example.com".into())
    }

    #[test]
    fn test_new_user_defaults() {
        let u = user();
        assert_eq!(u.display_name, "ferris");
        assert_eq!(u.bio, DEFAULT_BIO);
        assert_eq!(u.karma, 1);
        assert_eq!(u.avatar_url(), "https://placehold.co/100/ff4500/white?text=F");
    }

    #[test]
    fn test_normalize_username() {
        assert_eq!(User::normalize_username("  Ferris_01 ").unwrap(), "ferris_01");
        assert!(User::normalize_username("ab").is_err());
        assert!(User::normalize_username("a".repeat(21).as_str()).is_err());
        assert!(User::normalize_username("has space").is_err());
        assert!(User::normalize_username("dash-name").is_err());
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        let mut u = user();
        u.set_display_name("  Crab King ").unwrap();
        assert_eq!(u.display_name, "Crab King");
        u.set_display_name("   ").unwrap();
        assert_eq!(u.display_name, "ferris");
        assert!(u.set_display_name(&"x".repeat(31)).is_err());
    }

    #[test]
    fn test_formatted_karma() {
        let mut u = user();
        u.karma = 12_345;
        assert_eq!(u.formatted_karma(), "12.3k");
    }
}
