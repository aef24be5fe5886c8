//! Fan-out Invariant Tests
//!
//! - Publishing to a form with no observers never errors or blocks
//! - Every observer of a form receives the identical frame
//! - Observers of other forms receive nothing
//! - Dead or saturated observers are evicted without affecting others
//! - Subscribe/unsubscribe/publish are safe under concurrency

use std::sync::Arc;
use std::time::Duration;

use formflow::core::FormService;
use formflow::realtime::{ServerMessage, SubscriptionRegistry};
use formflow::schema::{FieldSchema, Form};
use formflow::store::{FormStore, MemFormStore};
use formflow::submission::{Answers, Submission};
use serde_json::json;

// =============================================================================
// Helper Functions
// =============================================================================

fn published_form() -> Form {
    Form::new("Poll", vec![FieldSchema::text("q", "Question text").required()]).published()
}

fn service_with(form: &Form, registry: Arc<SubscriptionRegistry>) -> FormService {
    let store = Arc::new(MemFormStore::new());
    store.save_form(form).unwrap();
    FormService::with_registry(store, registry)
}

fn answer(text: &str) -> Answers {
    serde_json::from_value(json!({ "q": text })).unwrap()
}

// =============================================================================
// Delivery
// =============================================================================

#[test]
fn test_publish_without_observers_is_noop() {
    let registry = SubscriptionRegistry::new();
    for _ in 0..1000 {
        let result = registry.publish("form", &Submission::new("form", Answers::new()));
        assert_eq!(result.matched, 0);
    }
}

#[tokio::test]
async fn test_submit_without_observers_succeeds() {
    let form = published_form();
    let service = service_with(&form, Arc::new(SubscriptionRegistry::new()));

    let submitted = tokio::time::timeout(Duration::from_secs(1), async {
        service.submit(&form.id, answer("hi"))
    })
    .await
    .expect("submit must not block");
    assert!(submitted.is_ok());
}

#[tokio::test]
async fn test_observers_receive_identical_frames() {
    let form = published_form();
    let other = published_form();
    let registry = Arc::new(SubscriptionRegistry::new());
    let service = service_with(&form, registry.clone());

    let mut first = registry.subscribe(&form.id);
    let mut second = registry.subscribe(&form.id);
    let mut elsewhere = registry.subscribe(&other.id);

    let accepted = service.submit(&form.id, answer("hi")).unwrap();

    let a = first.receiver.recv().await.unwrap();
    let b = second.receiver.recv().await.unwrap();
    assert_eq!(*a, ServerMessage::ResponseCreated(accepted));
    assert_eq!(a.to_json().unwrap(), b.to_json().unwrap());

    assert!(elsewhere.receiver.try_recv().is_err());
}

#[tokio::test]
async fn test_frames_arrive_in_submission_order() {
    let form = published_form();
    let registry = Arc::new(SubscriptionRegistry::new());
    let service = service_with(&form, registry.clone());
    let mut sub = registry.subscribe(&form.id);

    let ids: Vec<String> = (0..5)
        .map(|i| service.submit(&form.id, answer(&i.to_string())).unwrap().id)
        .collect();

    for id in ids {
        let message = sub.receiver.recv().await.unwrap();
        let ServerMessage::ResponseCreated(received) = message.as_ref();
        assert_eq!(received.id, id);
    }
}

// =============================================================================
// Eviction
// =============================================================================

#[tokio::test]
async fn test_dropped_observer_does_not_affect_others() {
    let form = published_form();
    let registry = Arc::new(SubscriptionRegistry::new());
    let service = service_with(&form, registry.clone());

    let gone = registry.subscribe(&form.id);
    let mut alive = registry.subscribe(&form.id);
    drop(gone);

    service.submit(&form.id, answer("hi")).unwrap();

    assert!(alive.receiver.recv().await.is_some());
    assert_eq!(registry.subscriber_count(&form.id), 1);
}

#[tokio::test]
async fn test_slow_observer_is_evicted_not_awaited() {
    let form = published_form();
    let registry = Arc::new(SubscriptionRegistry::with_buffer(2));
    let service = service_with(&form, registry.clone());

    // Never reads
    let mut slow = registry.subscribe(&form.id);
    let mut fast = registry.subscribe(&form.id);

    for i in 0..5 {
        service.submit(&form.id, answer(&i.to_string())).unwrap();
        assert!(fast.receiver.recv().await.is_some());
    }

    assert_eq!(registry.subscriber_count(&form.id), 1);

    // The evicted observer drains what it buffered, then sees the end
    assert!(slow.receiver.recv().await.is_some());
    assert!(slow.receiver.recv().await.is_some());
    assert!(slow.receiver.recv().await.is_none());
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_subscribe_and_publish() {
    let registry = Arc::new(SubscriptionRegistry::new());
    let mut tasks = Vec::new();

    for i in 0..16 {
        let registry = registry.clone();
        tasks.push(tokio::spawn(async move {
            let form_id = format!("form-{}", i % 4);
            let sub = registry.subscribe(&form_id);
            registry.publish(&form_id, &Submission::new(&form_id, Answers::new()));
            registry.unsubscribe(&sub.handle)
        }));
    }

    for task in tasks {
        assert!(task.await.unwrap());
    }
    assert!(registry.is_empty());
}
