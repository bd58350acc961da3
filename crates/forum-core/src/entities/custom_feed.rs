//! Custom feed entity - a user-curated set of communities

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

pub const NAME_MAX_LEN: usize = 50;
pub const DESCRIPTION_MAX_LEN: usize = 500;
pub const DEFAULT_ICON_COLOR: &str = "#FFD700";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomFeed {
    pub id: Snowflake,
    pub name: String,
    pub description: String,
    pub creator_id: Snowflake,
    pub creator_username: String,
    pub community_ids: Vec<Snowflake>,
    pub is_private: bool,
    pub show_on_profile: bool,
    pub is_favorite: bool,
    pub icon_color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CustomFeed {
    pub fn new(
        id: Snowflake,
        name: String,
        creator_id: Snowflake,
        creator_username: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            description: String::new(),
            creator_id,
            creator_username,
            community_ids: Vec::new(),
            is_private: false,
            show_on_profile: true,
            is_favorite: false,
            icon_color: DEFAULT_ICON_COLOR.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Snowflake) -> bool {
        self.creator_id == user_id
    }

    /// Private feeds are only visible to their creator
    pub fn ensure_visible_to(&self, user_id: Snowflake) -> Result<(), DomainError> {
        if self.is_private && !self.is_owned_by(user_id) {
            return Err(DomainError::PrivateFeed);
        }
        Ok(())
    }

    pub fn ensure_owner(&self, user_id: Snowflake) -> Result<(), DomainError> {
        if self.is_owned_by(user_id) {
            Ok(())
        } else {
            Err(DomainError::NotFeedOwner)
        }
    }

    pub fn contains(&self, community_id: Snowflake) -> bool {
        self.community_ids.contains(&community_id)
    }

    pub fn is_public_on_profile(&self) -> bool {
        !self.is_private && self.show_on_profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed() -> CustomFeed {
        CustomFeed::new(Snowflake::new(1), "Morning".into(), Snowflake::new(2), "ferris".into())
    }

    #[test]
    fn test_defaults() {
        let f = feed();
        assert!(!f.is_private);
        assert!(f.show_on_profile);
        assert!(!f.is_favorite);
        assert_eq!(f.icon_color, DEFAULT_ICON_COLOR);
        assert!(f.is_public_on_profile());
    }

    #[test]
    fn test_private_visibility() {
        let mut f = feed();
        f.is_private = true;
        assert!(f.ensure_visible_to(Snowflake::new(2)).is_ok());
        assert!(matches!(
            f.ensure_visible_to(Snowflake::new(3)),
            Err(DomainError::PrivateFeed)
        ));
        assert!(!f.is_public_on_profile());
    }

    #[test]
    fn test_owner_check() {
        let f = feed();
        assert!(f.ensure_owner(Snowflake::new(2)).is_ok());
        assert!(matches!(f.ensure_owner(Snowflake::new(9)), Err(DomainError::NotFeedOwner)));
    }
}
