//! Publish/subscribe fan-out of simulation events.
//!
//! Delivery is synchronous and in registration order. A handler may
//! unsubscribe itself or another subscriber through its [`Dispatch`]
//! context; removals take effect once the event being delivered has
//! reached every subscriber.

use shoal_core::events::SimEvent;

pub type SubscriptionId = u64;

type Handler = Box<dyn FnMut(&SimEvent, &mut Dispatch) + Send>;

/// Per-delivery context handed to a handler.
#[derive(Debug, Default)]
pub struct Dispatch {
    current: SubscriptionId,
    removals: Vec<SubscriptionId>,
}

impl Dispatch {
    /// Id of the subscriber being called.
    pub fn subscription(&self) -> SubscriptionId {
        self.current
    }

    /// Remove `id` after the current delivery completes.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.removals.push(id);
    }

    pub fn unsubscribe_self(&mut self) {
        self.removals.push(self.current);
    }
}

#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<(SubscriptionId, Handler)>,
    next_id: SubscriptionId,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&SimEvent, &mut Dispatch) + Send + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.push((id, Box::new(handler)));
        id
    }

    /// Returns whether `id` was subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Deliver each event to every subscriber, one event at a time.
    pub fn publish(&mut self, events: &[SimEvent]) {
        let mut dispatch = Dispatch::default();
        for event in events {
            for (id, handler) in self.subscribers.iter_mut() {
                dispatch.current = *id;
                handler(event, &mut dispatch);
            }
            if !dispatch.removals.is_empty() {
                let removals = std::mem::take(&mut dispatch.removals);
                self.subscribers.retain(|(id, _)| !removals.contains(id));
            }
        }
    }
}
