//! Event System
//!
//! Things that happened during a tick, for the host to react to
//! (sounds, particles, HUD flashes) without the core knowing about any of
//! that. Queues are cleared at the start of every tick, so after a tick
//! they hold exactly that tick's events.

use crate::world::BlockKind;

/// A queue for events of a single type.
#[derive(Debug)]
pub struct EventQueue<T> {
    events: Vec<T>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Send an event (add to queue)
    pub fn send(&mut self, event: T) {
        self.events.push(event);
    }

    /// Iterate over events without clearing
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Container for all game events.
#[derive(Debug, Default)]
pub struct Events {
    /// Collectable picked up
    pub item_collected: EventQueue<ItemCollectedEvent>,

    /// Door opened with a key
    pub door_opened: EventQueue<DoorEvent>,

    /// Player hit the ground
    pub landed: EventQueue<LandedEvent>,

    /// Player bumped a ceiling
    pub ceiling_hit: EventQueue<CeilingEvent>,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all event queues. Called at the start of each tick.
    pub fn clear_all(&mut self) {
        self.item_collected.clear();
        self.door_opened.clear();
        self.landed.clear();
        self.ceiling_hit.clear();
    }
}

// =============================================================================
// Event Types
// =============================================================================

/// A collectable was removed from the map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemCollectedEvent {
    pub col: i32,
    pub row: i32,
    /// Symbol the cell held before it became air
    pub symbol: char,
    /// Copied since the tile is gone
    pub kind: BlockKind,
}

/// A closed door was swapped for its open symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorEvent {
    pub col: i32,
    pub row: i32,
    pub closed: char,
    pub opened: char,
}

/// Airborne to grounded transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandedEvent {
    /// Y of the surface landed on
    pub floor: f64,
    /// Vertical velocity just before the impact
    pub impact_velocity: f64,
}

/// Upward move refused by a solid tile or the map top
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CeilingEvent {
    pub x: f64,
    pub y: f64,
}
