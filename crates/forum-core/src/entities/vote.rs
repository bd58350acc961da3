//! Vote entity - one user's standing vote on one target

use chrono::{DateTime, Utc};

use crate::value_objects::{Snowflake, TargetType, VoteDirection};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    pub user_id: Snowflake,
    pub target_id: Snowflake,
    pub target_type: TargetType,
    pub direction: VoteDirection,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vote {
    pub fn new(
        user_id: Snowflake,
        target_id: Snowflake,
        target_type: TargetType,
        direction: VoteDirection,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            target_id,
            target_type,
            direction,
            created_at: now,
            updated_at: now,
        }
    }
}
