//! Button events and the bounded per-screen event queue
//!
//! The debouncing subsystem posts events through an `EventSender`; the
//! screen's UI context polls its `EventQueue` without blocking. Both ends
//! share one fixed-capacity `embassy_sync` channel.

use std::fmt;
use std::sync::Arc;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};

use crate::consts::INPUT_QUEUE_CAPACITY;

/// Physical buttons on the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Select,
    Alt,
    Up,
    Down,
}

/// Edge reported for a button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Press,
    Release,
}

/// One debounced button transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEvent {
    pub button: Button,
    pub action: Action,
}

impl ButtonEvent {
    pub fn press(button: Button) -> Self {
        Self {
            button,
            action: Action::Press,
        }
    }

    pub fn release(button: Button) -> Self {
        Self {
            button,
            action: Action::Release,
        }
    }

    #[inline]
    pub fn is_press(&self) -> bool {
        self.action == Action::Press
    }
}

/// Events delivered to a screen, one variant per source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Event {
    Input(ButtonEvent),
}

type EventChannel<const N: usize> = Channel<CriticalSectionRawMutex, Event, N>;

/// Posting side of a screen's event queue
#[derive(Clone)]
pub struct EventSender<const N: usize = INPUT_QUEUE_CAPACITY> {
    channel: Arc<EventChannel<N>>,
}

impl<const N: usize> EventSender<N> {
    /// Queue an event. Returns false if the queue was full and the event dropped.
    pub fn post(&self, event: Event) -> bool {
        match self.channel.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                log::warn!("Input queue full, dropping {:?}", event);
                false
            }
        }
    }
}

impl<const N: usize> fmt::Debug for EventSender<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSender")
            .field("queued", &self.channel.len())
            .field("capacity", &N)
            .finish()
    }
}

/// Receiving side, polled by the UI context
pub struct EventQueue<const N: usize = INPUT_QUEUE_CAPACITY> {
    channel: Arc<EventChannel<N>>,
}

impl<const N: usize> EventQueue<N> {
    /// Take at most one pending event, returning immediately if none is queued
    pub fn poll(&self) -> Option<Event> {
        self.channel.try_receive().ok()
    }

    /// Discard everything queued
    pub fn drain(&self) {
        while self.channel.try_receive().is_ok() {}
    }
}

/// Create a bounded event queue holding up to `N` events
pub fn channel<const N: usize>() -> (EventSender<N>, EventQueue<N>) {
    let channel = Arc::new(Channel::new());
    (
        EventSender {
            channel: Arc::clone(&channel),
        },
        EventQueue { channel },
    )
}
