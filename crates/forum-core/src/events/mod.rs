//! Domain events

mod domain_event;

pub use domain_event::{
    ChatMessageSentEvent, CommentCreatedEvent, DomainEvent, PostCreatedEvent, PostDeletedEvent, UserUpdatedEvent,
    VoteUpdatedEvent,
};
