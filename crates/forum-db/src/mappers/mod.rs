//! Entity to model mappers
//!
//! `From<Model> for Entity` turns rows into domain objects. Enum columns are
//! stored as text (or a small integer for vote direction) and parsed here.

mod chat;
mod comment;
mod community;
mod custom_feed;
mod notification;
mod post;
mod user;
mod vote;

pub use post::parse_post_type;
pub use vote::{parse_target_type, parse_vote_type};
