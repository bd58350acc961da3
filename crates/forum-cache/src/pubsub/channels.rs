//! Pub/Sub channel naming

use forum_core::Snowflake;

/// Events about one post and its comments
pub const POST_CHANNEL_PREFIX: &str = "post:";
pub const COMMUNITY_CHANNEL_PREFIX: &str = "community:";
pub const USER_CHANNEL_PREFIX: &str = "user:";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PubSubChannel {
    Post(Snowflake),
    Community(Snowflake),
    User(Snowflake),
    Custom(String),
}

impl PubSubChannel {
    #[must_use]
    pub fn post(post_id: Snowflake) -> Self {
        Self::Post(post_id)
    }

    #[must_use]
    pub fn community(community_id: Snowflake) -> Self {
        Self::Community(community_id)
    }

    #[must_use]
    pub fn user(user_id: Snowflake) -> Self {
        Self::User(user_id)
    }

    /// Redis channel name
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Post(id) => format!("{POST_CHANNEL_PREFIX}{id}"),
            Self::Community(id) => format!("{COMMUNITY_CHANNEL_PREFIX}{id}"),
            Self::User(id) => format!("{USER_CHANNEL_PREFIX}{id}"),
            Self::Custom(name) => name.clone(),
        }
    }

    /// Inverse of [`name`](Self::name); unknown shapes become `Custom`
    #[must_use]
    pub fn parse(name: &str) -> Self {
        let prefixed = [
            (POST_CHANNEL_PREFIX, Self::Post as fn(Snowflake) -> Self),
            (COMMUNITY_CHANNEL_PREFIX, Self::Community),
            (USER_CHANNEL_PREFIX, Self::User),
        ];

        for (prefix, build) in prefixed {
            if let Some(id) = name
                .strip_prefix(prefix)
                .and_then(|raw| Snowflake::parse(raw).ok())
            {
                return build(id);
            }
        }

        Self::Custom(name.to_string())
    }
}

impl std::fmt::Display for PubSubChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_names() {
        assert_eq!(PubSubChannel::post(Snowflake::new(12345)).name(), "post:12345");
        assert_eq!(
            PubSubChannel::community(Snowflake::new(6789)).name(),
            "community:6789"
        );
        assert_eq!(PubSubChannel::user(Snowflake::new(1)).to_string(), "user:1");
    }

    #[test]
    fn test_channel_parse() {
        assert_eq!(
            PubSubChannel::parse("post:12345"),
            PubSubChannel::Post(Snowflake::new(12345))
        );
        assert_eq!(
            PubSubChannel::parse("community:3"),
            PubSubChannel::Community(Snowflake::new(3))
        );
        assert_eq!(
            PubSubChannel::parse("post:abc"),
            PubSubChannel::Custom("post:abc".to_string())
        );
    }
}
