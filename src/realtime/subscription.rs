//! # Subscription Management
//!
//! Registry of live observers keyed by form ID.
//!
//! Every observer owns a bounded channel. `publish` makes exactly one
//! non-blocking write attempt per observer; an observer whose channel is
//! closed or full is evicted and delivery continues with the rest.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc::{self, error::TrySendError};
use uuid::Uuid;

use super::errors::{RealtimeError, RealtimeResult};
use super::message::ServerMessage;
use crate::observability::{log_event_with_fields, Event};
use crate::submission::Submission;

/// Default per-observer buffer (messages)
pub const DEFAULT_SUBSCRIBER_BUFFER: usize = 256;

/// Message sender for an observer
type MessageSender = mpsc::Sender<Arc<ServerMessage>>;

/// Message receiver for an observer
pub type MessageReceiver = mpsc::Receiver<Arc<ServerMessage>>;

/// Identifies one observer of one form
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle {
    id: Uuid,
    form_id: String,
}

impl SubscriptionHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn form_id(&self) -> &str {
        &self.form_id
    }
}

/// A live subscription: the handle plus the stream of frames
#[derive(Debug)]
pub struct Subscription {
    pub handle: SubscriptionHandle,
    pub receiver: MessageReceiver,
}

/// Result of publishing one submission
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PublishResult {
    /// Observers registered for the form at publish time
    pub matched: usize,
    /// Frames handed to an observer's buffer
    pub delivered: usize,
    /// Observers dropped because delivery failed
    pub evicted: usize,
}

/// Registry of active observers
#[derive(Debug)]
pub struct SubscriptionRegistry {
    /// form ID -> observer ID -> sender
    forms: Mutex<HashMap<String, HashMap<Uuid, MessageSender>>>,

    /// Channel capacity per observer
    buffer: usize,
}

impl Default for SubscriptionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SubscriptionRegistry {
    /// Create a new registry
    pub fn new() -> Self {
        Self::with_buffer(DEFAULT_SUBSCRIBER_BUFFER)
    }

    /// Create a registry with a custom per-observer buffer
    pub fn with_buffer(buffer: usize) -> Self {
        Self {
            forms: Mutex::new(HashMap::new()),
            buffer: buffer.max(1),
        }
    }

    /// Every mutation leaves the map consistent, so a poisoned lock is still usable
    fn lock(&self) -> MutexGuard<'_, HashMap<String, HashMap<Uuid, MessageSender>>> {
        self.forms.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new observer for `form_id`
    pub fn subscribe(&self, form_id: &str) -> Subscription {
        let (tx, rx) = mpsc::channel(self.buffer);
        let handle = SubscriptionHandle {
            id: Uuid::new_v4(),
            form_id: form_id.to_string(),
        };

        let total = {
            let mut forms = self.lock();
            let set = forms.entry(form_id.to_string()).or_default();
            set.insert(handle.id, tx);
            set.len()
        };

        log_event_with_fields(
            Event::SubscriberConnected,
            &[
                ("form_id", form_id),
                ("subscriber", &handle.id.to_string()),
                ("total", &total.to_string()),
            ],
        );

        Subscription {
            handle,
            receiver: rx,
        }
    }

    /// Remove an observer. Returns whether it was still registered.
    ///
    /// Idempotent: removing twice, or after eviction, is a no-op.
    pub fn unsubscribe(&self, handle: &SubscriptionHandle) -> bool {
        let mut forms = self.lock();
        let Some(set) = forms.get_mut(&handle.form_id) else {
            return false;
        };
        let removed = set.remove(&handle.id).is_some();
        if set.is_empty() {
            forms.remove(&handle.form_id);
        }
        removed
    }

    /// Deliver a `response_created` frame to every observer of `form_id`.
    ///
    /// Never blocks and never fails; see [`PublishResult`] for the outcome.
    pub fn publish(&self, form_id: &str, submission: &Submission) -> PublishResult {
        // Snapshot so delivery happens outside the lock
        let targets: Vec<(Uuid, MessageSender)> = self
            .lock()
            .get(form_id)
            .map(|set| set.iter().map(|(id, tx)| (*id, tx.clone())).collect())
            .unwrap_or_default();

        let mut result = PublishResult {
            matched: targets.len(),
            ..Default::default()
        };
        if targets.is_empty() {
            return result;
        }

        let message = Arc::new(ServerMessage::ResponseCreated(submission.clone()));
        let mut failed = Vec::new();

        for (id, tx) in targets {
            match deliver(id, &tx, &message) {
                Ok(()) => result.delivered += 1,
                Err(e) => {
                    log_event_with_fields(
                        Event::SubscriberEvicted,
                        &[("form_id", form_id), ("reason", &e.to_string())],
                    );
                    failed.push(id);
                }
            }
        }

        if !failed.is_empty() {
            let mut forms = self.lock();
            if let Some(set) = forms.get_mut(form_id) {
                for id in &failed {
                    if set.remove(id).is_some() {
                        result.evicted += 1;
                    }
                }
                if set.is_empty() {
                    forms.remove(form_id);
                }
            }
        }

        log_event_with_fields(
            Event::BroadcastPublished,
            &[
                ("form_id", form_id),
                ("submission_id", &submission.id),
                ("delivered", &result.delivered.to_string()),
                ("evicted", &result.evicted.to_string()),
            ],
        );
        result
    }

    /// Number of observers of one form
    pub fn subscriber_count(&self, form_id: &str) -> usize {
        self.lock().get(form_id).map_or(0, HashMap::len)
    }

    /// Observer count per form, sorted by form ID
    pub fn stats(&self) -> Vec<(String, usize)> {
        let mut stats: Vec<(String, usize)> = self
            .lock()
            .iter()
            .map(|(form_id, set)| (form_id.clone(), set.len()))
            .collect();
        stats.sort();
        stats
    }

    /// Total observers across all forms
    pub fn len(&self) -> usize {
        self.lock().values().map(HashMap::len).sum()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One bounded write attempt
fn deliver(id: Uuid, tx: &MessageSender, message: &Arc<ServerMessage>) -> RealtimeResult<()> {
    tx.try_send(Arc::clone(message)).map_err(|e| match e {
        TrySendError::Full(_) => RealtimeError::SubscriberLagging(id),
        TrySendError::Closed(_) => RealtimeError::SubscriberGone(id),
    })
}
