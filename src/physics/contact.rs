// Copyright (c) 2019-present Dmitry Stepanov and Fyrox Engine contributors.
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! Contact notifications. The engine reports contacts while it steps, they are buffered here and
//! fanned out to physics objects once the step is over.

use crate::{
    core::{parking_lot::Mutex, pool::Handle},
    scene2d::node::Node,
};
use bitflags::bitflags;
use rapier2d::{
    dynamics::RigidBodySet,
    geometry::{ColliderHandle, ColliderSet, CollisionEvent, ContactPair},
    pipeline::{ActiveEvents, ActiveHooks, ContactModificationContext, EventHandler, PhysicsHooks},
};

/// Kind of a contact notification.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ContactKind {
    /// Two fixtures started touching.
    Begin,
    /// Two fixtures stopped touching.
    End,
    /// Contact is about to be solved. Raised every step while the contact persists.
    PreSolve,
    /// Contact was solved. Raised every step while the contact persists.
    PostSolve,
}

impl ContactKind {
    pub const ALL: [ContactKind; 4] = [
        ContactKind::Begin,
        ContactKind::End,
        ContactKind::PreSolve,
        ContactKind::PostSolve,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            ContactKind::Begin => 0,
            ContactKind::End => 1,
            ContactKind::PreSolve => 2,
            ContactKind::PostSolve => 3,
        }
    }

    /// Listener flag that enables this kind of notification.
    pub fn listener(self) -> ContactListeners {
        match self {
            ContactKind::Begin => ContactListeners::BEGIN_CONTACT,
            ContactKind::End => ContactListeners::END_CONTACT,
            ContactKind::PreSolve => ContactListeners::PRE_SOLVE,
            ContactKind::PostSolve => ContactListeners::POST_SOLVE,
        }
    }
}

bitflags! {
    /// A set of contact notifications a world listens to. Colliders only request the engine
    /// events that are actually listened to.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct ContactListeners: u8 {
        const NONE = 0;
        const BEGIN_CONTACT = 0b0001;
        const END_CONTACT = 0b0010;
        const PRE_SOLVE = 0b0100;
        const POST_SOLVE = 0b1000;
    }
}

impl ContactListeners {
    pub(crate) fn active_events(self) -> ActiveEvents {
        let mut events = ActiveEvents::empty();
        if self.intersects(ContactListeners::BEGIN_CONTACT | ContactListeners::END_CONTACT) {
            events |= ActiveEvents::COLLISION_EVENTS;
        }
        if self.contains(ContactListeners::POST_SOLVE) {
            events |= ActiveEvents::CONTACT_FORCE_EVENTS;
        }
        events
    }

    pub(crate) fn active_hooks(self) -> ActiveHooks {
        if self.contains(ContactListeners::PRE_SOLVE) {
            ActiveHooks::MODIFY_SOLVER_CONTACTS
        } else {
            ActiveHooks::empty()
        }
    }
}

/// Contact notification for an object that has no handler attached for its kind. Such events are
/// queued on the world, see [`crate::physics::PhysicsWorld::drain_contact_events`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ContactEvent {
    pub kind: ContactKind,
    /// The object that received the notification.
    pub this: Handle<Node>,
    /// The other side of the contact.
    pub opponent: Handle<Node>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct RawContact {
    pub kind: ContactKind,
    pub collider1: ColliderHandle,
    pub collider2: ColliderHandle,
}

/// Collects engine notifications during a step. The engine requires its callbacks to be
/// `Send + Sync`, hence the mutex.
pub(crate) struct ContactCollector {
    listeners: ContactListeners,
    contacts: Mutex<Vec<RawContact>>,
}

impl ContactCollector {
    pub fn new(listeners: ContactListeners) -> Self {
        Self {
            listeners,
            contacts: Default::default(),
        }
    }

    pub fn listeners(&self) -> ContactListeners {
        self.listeners
    }

    pub fn drain(&self) -> Vec<RawContact> {
        std::mem::take(&mut *self.contacts.lock())
    }

    fn push(&self, kind: ContactKind, collider1: ColliderHandle, collider2: ColliderHandle) {
        if self.listeners.contains(kind.listener()) {
            self.contacts.lock().push(RawContact {
                kind,
                collider1,
                collider2,
            });
        }
    }
}

impl EventHandler for ContactCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        let kind = if event.started() {
            ContactKind::Begin
        } else {
            ContactKind::End
        };
        self.push(kind, event.collider1(), event.collider2());
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        contact_pair: &ContactPair,
        _total_force_magnitude: f32,
    ) {
        self.push(
            ContactKind::PostSolve,
            contact_pair.collider1,
            contact_pair.collider2,
        );
    }
}

impl PhysicsHooks for ContactCollector {
    fn modify_solver_contacts(&self, context: &mut ContactModificationContext) {
        self.push(ContactKind::PreSolve, context.collider1, context.collider2);
    }
}

#[cfg(test)]
mod test {
    use super::{ContactCollector, ContactKind, ContactListeners};
    use rapier2d::{geometry::ColliderHandle, pipeline::{ActiveEvents, ActiveHooks}};

    #[test]
    fn only_listened_kinds_are_collected() {
        let collector = ContactCollector::new(ContactListeners::BEGIN_CONTACT);
        let a = ColliderHandle::from_raw_parts(0, 0);
        let b = ColliderHandle::from_raw_parts(1, 0);

        collector.push(ContactKind::Begin, a, b);
        collector.push(ContactKind::End, a, b);
        collector.push(ContactKind::PostSolve, a, b);

        let contacts = collector.drain();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].kind, ContactKind::Begin);
        assert!(collector.drain().is_empty());
    }

    #[test]
    fn listeners_map_to_engine_flags() {
        assert_eq!(
            ContactListeners::NONE.active_events(),
            ActiveEvents::empty()
        );
        assert_eq!(
            ContactListeners::END_CONTACT.active_events(),
            ActiveEvents::COLLISION_EVENTS
        );
        assert_eq!(
            ContactListeners::all().active_events(),
            ActiveEvents::COLLISION_EVENTS | ActiveEvents::CONTACT_FORCE_EVENTS
        );
        assert_eq!(
            ContactListeners::PRE_SOLVE.active_hooks(),
            ActiveHooks::MODIFY_SOLVER_CONTACTS
        );
        for kind in ContactKind::ALL {
            assert!(ContactListeners::all().contains(kind.listener()));
        }
    }
}
