//! # Real-Time Module
//!
//! Live fan-out of accepted submissions to connected observers.
//!
//! ## Architecture
//!
//! - **Registry**: per-form set of observer handles behind one mutex
//! - **Messages**: wire frames sent to observers
//!
//! Delivery is best-effort: no acknowledgement, no replay, and a slow or
//! vanished observer is evicted rather than waited on.

pub mod errors;
pub mod message;
pub mod subscription;

pub use errors::{RealtimeError, RealtimeResult};
pub use message::ServerMessage;
pub use subscription::{
    MessageReceiver, PublishResult, Subscription, SubscriptionHandle, SubscriptionRegistry,
    DEFAULT_SUBSCRIBER_BUFFER,
};
