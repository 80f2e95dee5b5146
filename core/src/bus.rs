//! Publish/subscribe channel carrying [`Event`] values to application-owned sinks.

use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    fmt,
    rc::{Rc, Weak},
};

use crate::Event;

/// Receiver of published events.
pub trait EventSink {
    /// Handles a single published event.
    fn on_event(&mut self, event: &Event);
}

/// Handle identifying a subscription so it can be cancelled later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionToken(u64);

struct Subscription {
    token: SubscriptionToken,
    sink: Weak<RefCell<dyn EventSink>>,
}

/// Cloneable handle onto a shared subscriber list.
///
/// The bus never owns its sinks: it keeps weak references to sinks owned by
/// the composing application and silently drops subscriptions whose sink was
/// released. Every clone of the handle addresses the same subscriber list.
#[derive(Clone, Default)]
pub struct EventBus {
    subscriptions: Rc<RefCell<Vec<Subscription>>>,
    next_token: Rc<Cell<u64>>,
    pending: Rc<RefCell<VecDeque<Event>>>,
    dispatching: Rc<Cell<bool>>,
}

impl EventBus {
    /// Creates a bus without subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a sink. Subscribing the same sink twice returns the
    /// original token.
    pub fn subscribe<S>(&self, sink: &Rc<RefCell<S>>) -> SubscriptionToken
    where
        S: EventSink + 'static,
    {
        let weak = Rc::downgrade(sink);
        let weak: Weak<RefCell<dyn EventSink>> = weak;
        let mut subscriptions = self.subscriptions.borrow_mut();
        if let Some(existing) = subscriptions
            .iter()
            .find(|subscription| Weak::ptr_eq(&subscription.sink, &weak))
        {
            return existing.token;
        }

        let token = SubscriptionToken(self.next_token.get());
        self.next_token.set(self.next_token.get().wrapping_add(1));
        subscriptions.push(Subscription { token, sink: weak });
        token
    }

    /// Cancels a subscription, reporting whether it existed.
    pub fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        let mut subscriptions = self.subscriptions.borrow_mut();
        let before = subscriptions.len();
        subscriptions.retain(|subscription| subscription.token != token);
        subscriptions.len() != before
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscriptions
            .borrow()
            .iter()
            .filter(|subscription| subscription.sink.strong_count() > 0)
            .count()
    }

    /// Delivers `event` to every sink subscribed when its delivery starts.
    ///
    /// The subscriber list is copied before dispatch, so sinks may subscribe
    /// or unsubscribe (themselves included) from within `on_event`. Events
    /// published from within `on_event` are queued and delivered once the
    /// current event has reached every sink.
    pub fn publish(&self, event: &Event) {
        self.pending.borrow_mut().push_back(event.clone());
        if self.dispatching.replace(true) {
            return;
        }

        loop {
            let next = self.pending.borrow_mut().pop_front();
            let Some(event) = next else {
                break;
            };
            self.deliver(&event);
        }
        self.dispatching.set(false);
    }

    fn deliver(&self, event: &Event) {
        let snapshot: Vec<Weak<RefCell<dyn EventSink>>> = self
            .subscriptions
            .borrow()
            .iter()
            .map(|subscription| subscription.sink.clone())
            .collect();

        let mut saw_dropped = false;
        for weak in snapshot {
            match weak.upgrade() {
                Some(sink) => sink.borrow_mut().on_event(event),
                None => saw_dropped = true,
            }
        }

        if saw_dropped {
            self.subscriptions
                .borrow_mut()
                .retain(|subscription| subscription.sink.strong_count() > 0);
        }
    }

    /// Publishes every event in order, leaving `events` empty.
    pub fn publish_all(&self, events: &mut Vec<Event>) {
        for event in events.drain(..) {
            self.publish(&event);
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Sink that records every event it receives.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded so far, in delivery order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Removes and returns every recorded event.
    pub fn take(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

impl EventSink for EventLog {
    fn on_event(&mut self, event: &Event) {
        self.events.push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::{EventBus, EventLog, EventSink, SubscriptionToken};
    use crate::{EntityId, Event};

    fn tick() -> Event {
        Event::Ticked {
            entity: EntityId::new(1),
        }
    }

    #[derive(Default)]
    struct Counter {
        received: usize,
    }

    impl EventSink for Counter {
        fn on_event(&mut self, _event: &Event) {
            self.received += 1;
        }
    }

    struct SelfDetaching {
        bus: EventBus,
        token: Option<SubscriptionToken>,
        received: usize,
    }

    impl EventSink for SelfDetaching {
        fn on_event(&mut self, _event: &Event) {
            self.received += 1;
            if let Some(token) = self.token.take() {
                let _ = self.bus.unsubscribe(token);
            }
        }
    }

    struct Echo {
        bus: EventBus,
        received: usize,
    }

    impl EventSink for Echo {
        fn on_event(&mut self, event: &Event) {
            self.received += 1;
            if matches!(event, Event::Ticked { .. }) {
                self.bus.publish(&Event::FearEnded);
            }
        }
    }

    #[test]
    fn concrete_sinks_coerce_on_subscribe() {
        let bus = EventBus::new();
        let counter: Rc<RefCell<Counter>> = Rc::new(RefCell::new(Counter::default()));
        let _ = bus.subscribe(&counter);
        bus.publish(&tick());
        assert_eq!(counter.borrow().received, 1);
    }

    #[test]
    fn events_published_during_dispatch_are_queued() {
        let bus = EventBus::new();
        let echo = Rc::new(RefCell::new(Echo {
            bus: bus.clone(),
            received: 0,
        }));
        let log = Rc::new(RefCell::new(EventLog::new()));
        let _ = bus.subscribe(&echo);
        let _ = bus.subscribe(&log);

        bus.publish(&tick());

        assert_eq!(echo.borrow().received, 2);
        assert_eq!(log.borrow().events(), &[tick(), Event::FearEnded]);
    }

    #[test]
    fn duplicate_subscriptions_are_ignored_and_unsubscribe_removes() {
        let bus = EventBus::new();
        let first = Rc::new(RefCell::new(Counter::default()));
        let second = Rc::new(RefCell::new(Counter::default()));

        let token = bus.subscribe(&first);
        assert_eq!(bus.subscribe(&first), token);
        let _ = bus.subscribe(&second);

        bus.publish(&tick());
        assert_eq!(first.borrow().received, 1);
        assert_eq!(second.borrow().received, 1);

        assert!(bus.unsubscribe(token));
        assert!(!bus.unsubscribe(token));
        bus.publish(&tick());
        assert_eq!(first.borrow().received, 1);
        assert_eq!(second.borrow().received, 2);
    }

    #[test]
    fn detaching_during_publish_keeps_iteration_intact() {
        let bus = EventBus::new();
        let detaching = Rc::new(RefCell::new(SelfDetaching {
            bus: bus.clone(),
            token: None,
            received: 0,
        }));
        let counter = Rc::new(RefCell::new(Counter::default()));

        let token = bus.subscribe(&detaching);
        detaching.borrow_mut().token = Some(token);
        let _ = bus.subscribe(&counter);

        bus.publish(&tick());
        assert_eq!(detaching.borrow().received, 1);
        assert_eq!(counter.borrow().received, 1);

        bus.publish(&tick());
        assert_eq!(detaching.borrow().received, 1);
        assert_eq!(counter.borrow().received, 2);
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[test]
    fn dropped_sinks_are_pruned() {
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(EventLog::new()));
        let _ = bus.subscribe(&log);
        assert_eq!(bus.subscriber_count(), 1);

        drop(log);
        bus.publish(&tick());
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn publish_all_preserves_order() {
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(EventLog::new()));
        let _ = bus.subscribe(&log);

        let mut pending = vec![tick(), Event::FearEnded];
        bus.publish_all(&mut pending);

        assert!(pending.is_empty());
        assert_eq!(log.borrow().events(), &[tick(), Event::FearEnded]);
    }
}
