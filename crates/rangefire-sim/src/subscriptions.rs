//! Per-tick update registrations.
//!
//! An entity that wants to be advanced every tick holds a [`Subscription`].
//! The handle is neither `Clone` nor `Copy`: cancelling consumes it, so an
//! entity cannot cancel twice or keep ticking after it gave the handle back.

use std::collections::BTreeSet;

/// Proof of a live tick registration.
#[derive(Debug, PartialEq, Eq)]
pub struct Subscription(u64);

/// Component slot holding an entity's registration, if it still has one.
#[derive(Debug, Default)]
pub struct Ticking {
    pub subscription: Option<Subscription>,
}

/// Registry of live tick subscriptions.
#[derive(Debug, Default)]
pub struct TickSubscriptions {
    next_id: u64,
    live: BTreeSet<u64>,
}

impl Subscription {
    /// Registry id, unique for the lifetime of the registry.
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl Ticking {
    pub fn new(subscription: Subscription) -> Self {
        Self {
            subscription: Some(subscription),
        }
    }
}

impl TickSubscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new per-tick callback slot.
    pub fn subscribe(&mut self) -> Subscription {
        let id = self.next_id;
        self.next_id += 1;
        self.live.insert(id);
        Subscription(id)
    }

    /// Remove a registration. Returns whether it was still live.
    pub fn cancel(&mut self, subscription: Subscription) -> bool {
        self.live.remove(&subscription.0)
    }

    /// Take the registration out of `ticking` and cancel it.
    /// A slot that is already empty is left alone.
    pub fn release(&mut self, ticking: &mut Ticking) -> bool {
        match ticking.subscription.take() {
            Some(subscription) => self.cancel(subscription),
            None => false,
        }
    }

    /// Whether `subscription` has not been cancelled.
    pub fn is_live(&self, subscription: &Subscription) -> bool {
        self.live.contains(&subscription.0)
    }

    /// Number of live registrations.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// No live registrations remain.
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Drop every registration (session teardown).
    pub fn clear(&mut self) {
        self.live.clear();
    }
}
