//! Community entity - a named topic space that posts belong to

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::{placeholder_image, Snowflake};

pub const NAME_MIN_LEN: usize = 3;
pub const NAME_MAX_LEN: usize = 21;
pub const TITLE_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 500;
pub const DEFAULT_CATEGORY: &str = "General";
pub const DEFAULT_BANNER_URL: &str = "https://placehold.co/1000x150/ff4500/white?text=Community";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Community {
    pub id: Snowflake,
    pub name: String,
    pub display_name: String,
    pub title: String,
    pub description: String,
    pub icon_url: Option<String>,
    pub banner_url: Option<String>,
    pub creator_id: Snowflake,
    pub creator_username: String,
    /// Starts at 1: the creator joins on creation
    pub member_count: i32,
    pub category: String,
    pub rules: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Community {
    pub fn new(
        id: Snowflake,
        name: String,
        title: String,
        creator_id: Snowflake,
        creator_username: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            display_name: name.clone(),
            name,
            title,
            description: String::new(),
            icon_url: None,
            banner_url: None,
            creator_id,
            creator_username,
            member_count: 1,
            category: DEFAULT_CATEGORY.to_string(),
            rules: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Lowercase and validate a community name
    pub fn normalize_name(raw: &str) -> Result<String, DomainError> {
        let name = raw.trim().to_lowercase();
        let len = name.chars().count();
        if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) {
            return Err(DomainError::InvalidCommunityName(format!(
                "must be {NAME_MIN_LEN}-{NAME_MAX_LEN} characters"
            )));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(DomainError::InvalidCommunityName(
                "can only contain letters, numbers, and underscores".to_string(),
            ));
        }
        Ok(name)
    }

    pub fn is_creator(&self, user_id: Snowflake) -> bool {
        self.creator_id == user_id
    }

    pub fn icon(&self) -> String {
        match &self.icon_url {
            Some(url) if !url.is_empty() => url.clone(),
            _ => placeholder_image(&self.name, 'C'),
        }
    }

    pub fn banner(&self) -> String {
        self.banner_url
            .clone()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BANNER_URL.to_string())
    }

    /// Rough "online now" estimate shown on community pages
    pub fn online_estimate(&self) -> i64 {
        (i64::from(self.member_count) * 3 / 1000).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn community(members: i32) -> Community {
        let mut c = Community::new(
            Snowflake::new(1),
            "rust".into(),
            "The Rust Programming Language".into(),
            Snowflake::new(2),
            "ferris".into(),
        );
        c.member_count = members;
        c
    }

    #[test]
    fn test_new_community_defaults() {
        let c = community(1);
        assert_eq!(c.display_name, "rust");
        assert_eq!(c.category, DEFAULT_CATEGORY);
        assert_eq!(c.icon(), "https://placehold.co/100/ff4500/white?text=R");
        assert_eq!(c.banner(), DEFAULT_BANNER_URL);
        assert!(c.is_creator(Snowflake::new(2)));
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(Community::normalize_name(" RustLang ").unwrap(), "rustlang");
        assert!(Community::normalize_name("rs").is_err());
        assert!(Community::normalize_name(&"a".repeat(22)).is_err());
        assert!(Community::normalize_name("rust lang").is_err());
    }

    #[test]
    fn test_online_estimate() {
        assert_eq!(community(1).online_estimate(), 1);
        assert_eq!(community(10_000).online_estimate(), 30);
    }
}
