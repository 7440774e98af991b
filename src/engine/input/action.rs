// Input events and the subscription hub that fans them out to latches

use glam::Vec2;
use std::sync::Arc;

use super::latch::InputLatch;

/// Already-debounced input signals delivered by the host's event pump
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Movement axis changed (started, performed or canceled)
    Move(Vec2),
    /// Jump button pressed (`true`) or released (`false`)
    Jump(bool),
}

/// Handle returned by [`InputSource::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Source of input callbacks a character subscribes to on activation
pub trait InputSource {
    fn subscribe(&mut self, latch: Arc<InputLatch>) -> SubscriptionId;

    /// Returns false if the id was not subscribed
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;
}

/// In-process input source: the host pushes events, every subscribed latch
/// receives them.
#[derive(Debug, Default)]
pub struct InputHub {
    subscribers: Vec<(SubscriptionId, Arc<InputLatch>)>,
    next_id: u64,
}

impl InputHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver an event to all subscribers
    pub fn dispatch(&self, event: InputEvent) {
        for (_, latch) in &self.subscribers {
            match event {
                InputEvent::Move(axis) => latch.write_move(axis),
                InputEvent::Jump(held) => latch.write_jump(held),
            }
        }
    }

    pub fn push_move(&self, axis: Vec2) {
        self.dispatch(InputEvent::Move(axis));
    }

    pub fn push_jump(&self, held: bool) {
        self.dispatch(InputEvent::Jump(held));
    }

    /// Get the number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl InputSource for InputHub {
    fn subscribe(&mut self, latch: Arc<InputLatch>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, latch));
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }
}
