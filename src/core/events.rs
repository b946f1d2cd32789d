use crate::core::BodyHandle;
use std::collections::VecDeque;

/// Something that happened during the last step or since the last step began
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicsEvent {
    /// A pair involving a trigger started overlapping
    TriggerEnter {
        body_a: BodyHandle,
        body_b: BodyHandle,
    },

    /// A tracked trigger pair stopped overlapping
    TriggerExit {
        body_a: BodyHandle,
        body_b: BodyHandle,
    },

    /// A body has gone to sleep
    Sleep(BodyHandle),

    /// A sleeping body was woken by a collision
    Wake(BodyHandle),

    /// A body has been added to the world
    Added(BodyHandle),

    /// A body has been removed from the world
    Removed(BodyHandle),
}

impl PhysicsEvent {
    /// Returns whether the event refers to the given body
    pub fn involves(&self, body: BodyHandle) -> bool {
        match *self {
            PhysicsEvent::TriggerEnter { body_a, body_b }
            | PhysicsEvent::TriggerExit { body_a, body_b } => body_a == body || body_b == body,
            PhysicsEvent::Sleep(handle)
            | PhysicsEvent::Wake(handle)
            | PhysicsEvent::Added(handle)
            | PhysicsEvent::Removed(handle) => handle == body,
        }
    }
}

/// A queue of physics events, polled by the host between steps
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<PhysicsEvent>,
}

impl EventQueue {
    /// Creates a new empty event queue
    pub fn new() -> Self {
        Self {
            events: VecDeque::new(),
        }
    }

    /// Adds an event to the queue
    pub fn push(&mut self, event: PhysicsEvent) {
        self.events.push_back(event);
    }

    /// Gets the next event from the queue
    pub fn next_event(&mut self) -> Option<PhysicsEvent> {
        self.events.pop_front()
    }

    /// Returns whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Clears all events from the queue
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Iterates over the queued events without consuming them
    pub fn iter(&self) -> impl Iterator<Item = &PhysicsEvent> {
        self.events.iter()
    }

    /// Gets all events involving a specific body
    pub fn events_for_body(&self, body: BodyHandle) -> Vec<&PhysicsEvent> {
        self.events.iter().filter(|e| e.involves(body)).collect()
    }
}
