//! Value objects - immutable types that represent domain concepts

mod formatting;
mod snowflake;
mod vote;

pub use formatting::{format_count, placeholder_image, short_date, time_ago, truncate_with_ellipsis};
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
pub use vote::{
    CounterDelta, TargetType, VoteDirection, VoteOutcome, VoteTally, VoteTransition,
};
