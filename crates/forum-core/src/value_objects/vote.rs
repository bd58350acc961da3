//! Voting rules.
//!
//! A user holds at most one vote per target. Casting a direction resolves
//! into one of three transitions against whatever vote already exists, and
//! each transition maps to a fixed change of the target's counters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// What a vote is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    Post,
    Comment,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Comment => "comment",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "post" => Ok(Self::Post),
            "comment" => Ok(Self::Comment),
            other => Err(DomainError::InvalidTargetType(other.to_string())),
        }
    }
}

/// Direction of a single vote. Stored as `+1` / `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    /// Ledger value (`vote_type` column)
    pub fn value(self) -> i16 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }

    pub fn from_value(value: i16) -> Option<Self> {
        match value {
            1 => Some(Self::Up),
            -1 => Some(Self::Down),
            _ => None,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl fmt::Display for VoteDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteDirection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            other => Err(DomainError::InvalidVoteDirection(other.to_string())),
        }
    }
}

/// Change to apply to a target's `upvotes` / `downvotes`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterDelta {
    pub upvotes: i32,
    pub downvotes: i32,
}

impl CounterDelta {
    fn bump(direction: VoteDirection, by: i32) -> Self {
        match direction {
            VoteDirection::Up => Self { upvotes: by, downvotes: 0 },
            VoteDirection::Down => Self { upvotes: 0, downvotes: by },
        }
    }

    /// Change of the displayed score; also the author's karma change.
    pub fn net(&self) -> i32 {
        self.upvotes - self.downvotes
    }
}

/// The three ways a cast can land
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteTransition {
    /// No previous vote: record it
    Create(VoteDirection),
    /// Same direction again: withdraw the vote
    Remove(VoteDirection),
    /// Opposite direction: flip the stored vote
    Flip { from: VoteDirection, to: VoteDirection },
}

impl VoteTransition {
    pub fn resolve(existing: Option<VoteDirection>, requested: VoteDirection) -> Self {
        match existing {
            None => Self::Create(requested),
            Some(current) if current == requested => Self::Remove(requested),
            Some(current) => Self::Flip { from: current, to: requested },
        }
    }

    pub fn delta(&self) -> CounterDelta {
        match *self {
            Self::Create(d) => CounterDelta::bump(d, 1),
            Self::Remove(d) => CounterDelta::bump(d, -1),
            Self::Flip { from, to } => {
                let old = CounterDelta::bump(from, -1);
                let new = CounterDelta::bump(to, 1);
                CounterDelta {
                    upvotes: old.upvotes + new.upvotes,
                    downvotes: old.downvotes + new.downvotes,
                }
            }
        }
    }

    /// The caller's vote once the transition is applied
    pub fn resulting_vote(&self) -> Option<VoteDirection> {
        match *self {
            Self::Create(d) => Some(d),
            Self::Remove(_) => None,
            Self::Flip { to, .. } => Some(to),
        }
    }

    pub fn is_fresh_upvote(&self) -> bool {
        matches!(self, Self::Create(VoteDirection::Up))
    }
}

/// Counter pair of a post or comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteTally {
    pub upvotes: i32,
    pub downvotes: i32,
}

impl VoteTally {
    /// New content starts with its creator's implicit upvote
    pub const INITIAL: Self = Self { upvotes: 1, downvotes: 0 };

    pub fn new(upvotes: i32, downvotes: i32) -> Self {
        Self { upvotes, downvotes }
    }

    pub fn score(&self) -> i32 {
        self.upvotes - self.downvotes
    }

    pub fn apply(self, delta: CounterDelta) -> Self {
        Self {
            upvotes: self.upvotes + delta.upvotes,
            downvotes: self.downvotes + delta.downvotes,
        }
    }
}

impl Default for VoteTally {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// Result of an applied cast, as committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteOutcome {
    pub target_id: Snowflake,
    pub target_type: TargetType,
    /// Author of the target, who receives the karma change
    pub author_id: Snowflake,
    pub transition: VoteTransition,
    pub tally: VoteTally,
}

impl VoteOutcome {
    pub fn vote_count(&self) -> i32 {
        self.tally.score()
    }

    pub fn user_vote(&self) -> Option<VoteDirection> {
        self.transition.resulting_vote()
    }
}
