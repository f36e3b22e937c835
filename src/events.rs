//! Observer registration and dispatch for body events.
//!
//! Listeners are boxed closures owned by the hub. Dispatch is synchronous
//! and in registration order, from inside the body step that produced the
//! event. The body is mutably borrowed for the whole step, so listeners
//! record what happened and the host applies any body changes after the
//! step returns.

use crate::collision::HitInfo;

/// Handle returned by subscription calls, used to unsubscribe.
pub type SubscriptionId = u64;

/// Listener for the grounded-state transition events.
pub type GroundListener = Box<dyn FnMut()>;

/// Listener for per-contact sweep events.
pub type HitListener = Box<dyn FnMut(&HitInfo)>;

/// Per-event subscriber lists for one body.
#[derive(Default)]
pub struct EventHub {
    next_id: SubscriptionId,
    started_touching_ground: Vec<(SubscriptionId, GroundListener)>,
    stopped_touching_ground: Vec<(SubscriptionId, GroundListener)>,
    hit_collider: Vec<(SubscriptionId, HitListener)>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> SubscriptionId {
        self.next_id += 1;
        self.next_id
    }

    pub fn on_started_touching_ground(&mut self, listener: GroundListener) -> SubscriptionId {
        let id = self.allocate_id();
        self.started_touching_ground.push((id, listener));
        id
    }

    pub fn on_stopped_touching_ground(&mut self, listener: GroundListener) -> SubscriptionId {
        let id = self.allocate_id();
        self.stopped_touching_ground.push((id, listener));
        id
    }

    pub fn on_hit_collider(&mut self, listener: HitListener) -> SubscriptionId {
        let id = self.allocate_id();
        self.hit_collider.push((id, listener));
        id
    }

    /// Drop the listener behind `id`. Returns whether one was removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.started_touching_ground.len()
            + self.stopped_touching_ground.len()
            + self.hit_collider.len();

        self.started_touching_ground.retain(|(entry, _)| *entry != id);
        self.stopped_touching_ground.retain(|(entry, _)| *entry != id);
        self.hit_collider.retain(|(entry, _)| *entry != id);

        let after = self.started_touching_ground.len()
            + self.stopped_touching_ground.len()
            + self.hit_collider.len();
        after != before
    }

    pub(crate) fn emit_started_touching_ground(&mut self) {
        for (_, listener) in &mut self.started_touching_ground {
            listener();
        }
    }

    pub(crate) fn emit_stopped_touching_ground(&mut self) {
        for (_, listener) in &mut self.stopped_touching_ground {
            listener();
        }
    }

    pub(crate) fn emit_hit_collider(&mut self, hit: &HitInfo) {
        for (_, listener) in &mut self.hit_collider {
            listener(hit);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::math::Vec3;

    #[test]
    fn dispatch_follows_registration_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut hub = EventHub::new();

        let first = Rc::clone(&order);
        hub.on_started_touching_ground(Box::new(move || first.borrow_mut().push(1)));
        let second = Rc::clone(&order);
        hub.on_started_touching_ground(Box::new(move || second.borrow_mut().push(2)));

        hub.emit_started_touching_ground();

        assert_eq!(*order.borrow(), vec![1, 2]);
    }

    #[test]
    fn ids_are_unique_across_event_kinds() {
        let mut hub = EventHub::new();
        let a = hub.on_started_touching_ground(Box::new(|| {}));
        let b = hub.on_stopped_touching_ground(Box::new(|| {}));
        let c = hub.on_hit_collider(Box::new(|_| {}));

        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn unsubscribe_removes_only_the_target() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut hub = EventHub::new();

        let keep = Rc::clone(&calls);
        hub.on_stopped_touching_ground(Box::new(move || keep.borrow_mut().push("keep")));
        let drop_me = Rc::clone(&calls);
        let id =
            hub.on_stopped_touching_ground(Box::new(move || drop_me.borrow_mut().push("drop")));

        assert!(hub.unsubscribe(id));
        hub.emit_stopped_touching_ground();

        assert_eq!(*calls.borrow(), vec!["keep"]);
        // Repeated unsubscription of the same id finds nothing.
        assert!(!hub.unsubscribe(id));
    }

    #[test]
    fn hit_listeners_receive_the_contact() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut hub = EventHub::new();

        let sink = Rc::clone(&seen);
        hub.on_hit_collider(Box::new(move |hit| sink.borrow_mut().push(hit.collider)));

        let hit = HitInfo {
            collider: 7,
            normal: Vec3::new(0.0, 1.0, 0.0),
            point: Vec3::zeros(),
            distance: 0.25,
            movement_direction: Vec3::new(1.0, 0.0, 0.0),
        };
        hub.emit_hit_collider(&hit);
        hub.emit_hit_collider(&hit);

        assert_eq!(*seen.borrow(), vec![7, 7]);
    }
}
