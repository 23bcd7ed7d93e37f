//! Minimal publish/subscribe for editor notifications.
//!
//! Delivery is synchronous, in subscription order, to the subscribers of the
//! emitted topic only.

use std::fmt;

use tracing::trace;

/// Closed set of topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// The edited tree changed
    Update,
}

/// What triggered an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeCause {
    RenderComplete,
    ConditionAdded,
    SubConditionAdded,
    NodeRemoved,
    KindChanged,
    FieldChanged,
    OperatorChanged,
    ValueChanged,
    ValueSourceChanged,
}

/// Notification passed to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorEvent {
    pub topic: Topic,
    pub cause: ChangeCause,
}

impl EditorEvent {
    pub fn update(cause: ChangeCause) -> Self {
        Self {
            topic: Topic::Update,
            cause,
        }
    }
}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Handler = Box<dyn FnMut(&EditorEvent)>;

struct Subscription {
    id: SubscriptionId,
    topic: Topic,
    handler: Handler,
}

/// Per-editor subscriber registry.
#[derive(Default)]
pub struct EventBus {
    subscriptions: Vec<Subscription>,
    next_id: u64,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriptions.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, topic: Topic, handler: impl FnMut(&EditorEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            topic,
            handler: Box::new(handler),
        });
        id
    }

    /// Remove a subscription; unknown ids are ignored.
    pub fn unsubscribe(&mut self, topic: Topic, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions
            .retain(|s| !(s.id == id && s.topic == topic));
        before != self.subscriptions.len()
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.subscriptions.iter().filter(|s| s.topic == topic).count()
    }

    pub fn emit(&mut self, event: &EditorEvent) {
        trace!(?event, "emitting");
        for subscription in self.subscriptions.iter_mut().filter(|s| s.topic == event.topic) {
            (subscription.handler)(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_emit_in_subscription_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        for n in 0..3 {
            let seen = Rc::clone(&seen);
            bus.subscribe(Topic::Update, move |_| seen.borrow_mut().push(n));
        }

        bus.emit(&EditorEvent::update(ChangeCause::ValueChanged));

        assert_eq!(*seen.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_unsubscribe_unknown_is_noop() {
        let mut bus = EventBus::new();
        let id = bus.subscribe(Topic::Update, |_| {});
        assert!(bus.unsubscribe(Topic::Update, id));
        assert!(!bus.unsubscribe(Topic::Update, id));
        assert_eq!(bus.subscriber_count(Topic::Update), 0);
    }
}
