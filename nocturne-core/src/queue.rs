//! Interrupt-to-main event queue
//!
//! A bounded single-producer/single-consumer queue. The producer half lives
//! with the interrupt handlers, the consumer half with the main loop, which
//! drains it once per poll cycle. When the queue is full the newest event is
//! dropped and counted.

use heapless::spsc::{Consumer, Producer, Queue};

use crate::events::InputEvent;

/// Default backing size (holds `DEFAULT_QUEUE_DEPTH - 1` events)
pub const DEFAULT_QUEUE_DEPTH: usize = 8;

/// Returned when an event could not be queued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QueueFull(pub InputEvent);

/// Event queue storage
///
/// `N` is the backing size; one slot is kept free, so at most `N - 1`
/// events are pending at once.
pub struct EventQueue<const N: usize = DEFAULT_QUEUE_DEPTH> {
    queue: Queue<InputEvent, N>,
}

impl<const N: usize> EventQueue<N> {
    /// Create an empty queue
    pub const fn new() -> Self {
        Self {
            queue: Queue::new(),
        }
    }

    /// Maximum number of pending events
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Split into the interrupt-side producer and the main-loop consumer
    pub fn split(&mut self) -> (EventProducer<'_, N>, EventConsumer<'_, N>) {
        let (producer, consumer) = self.queue.split();
        (
            EventProducer {
                inner: producer,
                dropped: 0,
            },
            EventConsumer { inner: consumer },
        )
    }
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Producer half, owned by interrupt context
pub struct EventProducer<'a, const N: usize> {
    inner: Producer<'a, InputEvent, N>,
    dropped: u32,
}

impl<const N: usize> EventProducer<'_, N> {
    /// Queue an event
    ///
    /// A full queue rejects the new event; earlier events are kept.
    pub fn enqueue(&mut self, event: InputEvent) -> Result<(), QueueFull> {
        self.inner.enqueue(event).map_err(|event| {
            self.dropped = self.dropped.saturating_add(1);

            #[cfg(feature = "defmt")]
            defmt::warn!("Event queue full, dropped {}", event);

            QueueFull(event)
        })
    }

    /// Check if another event fits
    pub fn ready(&self) -> bool {
        self.inner.ready()
    }

    /// Events dropped because the queue was full
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

/// Consumer half, owned by the main loop
pub struct EventConsumer<'a, const N: usize> {
    inner: Consumer<'a, InputEvent, N>,
}

impl<'a, const N: usize> EventConsumer<'a, N> {
    /// Take the oldest pending event
    pub fn dequeue(&mut self) -> Option<InputEvent> {
        self.inner.dequeue()
    }

    /// Oldest pending event without removing it
    pub fn peek(&self) -> Option<InputEvent> {
        self.inner.peek().copied()
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if nothing is pending
    pub fn is_empty(&self) -> bool {
        !self.inner.ready()
    }

    /// Iterate over the events pending right now, oldest first
    ///
    /// Events queued while draining are left for the next cycle.
    pub fn drain(&mut self) -> Drain<'_, 'a, N> {
        let remaining = self.len();
        Drain {
            consumer: self,
            remaining,
        }
    }
}

/// Iterator returned by [`EventConsumer::drain`]
pub struct Drain<'c, 'a, const N: usize> {
    consumer: &'c mut EventConsumer<'a, N>,
    remaining: usize,
}

impl<const N: usize> Iterator for Drain<'_, '_, N> {
    type Item = InputEvent;

    fn next(&mut self) -> Option<InputEvent> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.consumer.dequeue()
    }
}
