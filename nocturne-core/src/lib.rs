//! Application plumbing for Nocturne
//!
//! Interrupt handlers (buttons, the RTC alarm line) never touch shared
//! state directly. They push an [`InputEvent`] into an [`EventQueue`] and
//! the main loop drains it once per poll cycle.

#![no_std]
#![deny(unsafe_code)]

// proptest needs std for its runner and assertion messages
#[cfg(test)]
#[macro_use]
extern crate std;

pub mod events;
pub mod queue;

pub use events::InputEvent;
pub use queue::{EventConsumer, EventProducer, EventQueue, QueueFull, DEFAULT_QUEUE_DEPTH};
