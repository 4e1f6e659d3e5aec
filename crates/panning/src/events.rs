//! Synchronous notifications raised by the pan.
//!
//! Every event is delivered in order to every subscribed listener before the
//! call that raised it returns. Listeners only see the event, never the pan,
//! so they cannot mutate particles while an evaluation is in flight.

use std::cell::RefCell;
use std::rc::Rc;

use crate::materials::{GoldId, GoldParticle};

#[derive(Clone, Debug, PartialEq)]
pub enum PanEvent {
    /// Total water volume moved beyond the comparison epsilon.
    WaterVolumeChanged { volume: f32 },
    /// A sediment milestone fired; `remaining` is the normalized sediment left.
    SedimentMilestoneReached { threshold: f32, remaining: f32 },
    ShakeCue { remaining: f32 },
    SparkleCue { remaining: f32 },
    /// Published on every settling update, even when the values repeat.
    SettlingChanged { heavy: f32, light: f32 },
    GoldRevealed { id: GoldId, particle: GoldParticle },
    GoldCollected { id: GoldId, particle: GoldParticle },
    ShakeStateChanged { shaking: bool },
}

/// Receiver for [`PanEvent`]s.
pub trait PanListener {
    fn on_event(&mut self, event: &PanEvent);
}

impl<F> PanListener for F
where
    F: FnMut(&PanEvent),
{
    fn on_event(&mut self, event: &PanEvent) {
        self(event)
    }
}

/// Ordered list of listeners.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Box<dyn PanListener>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: Box<dyn PanListener>) {
        self.listeners.push(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn publish(&mut self, event: PanEvent) {
        for listener in self.listeners.iter_mut() {
            listener.on_event(&event);
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Listener that records every event it sees.
///
/// Clones share the same log, so one clone can be subscribed while another is
/// kept for inspection.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<PanEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PanEvent> {
        self.events.borrow().clone()
    }

    /// Drain everything recorded so far.
    pub fn take(&self) -> Vec<PanEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn count(&self, predicate: impl Fn(&PanEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| predicate(e)).count()
    }
}

impl PanListener for EventLog {
    fn on_event(&mut self, event: &PanEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
