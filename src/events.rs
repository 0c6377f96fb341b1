//! Interrupt-driven event system.
//!
//! Events are produced by `esp_timer` callbacks (sample tick, correction
//! window expiry, telemetry tick) and consumed by the
//! main control loop, which owns the engine and processes them one at a
//! time.  Timer callbacks never touch engine state.
//!
//! ```text
//! ┌───────────────────┐     ┌──────────────┐     ┌──────────────────────┐
//! │ Sample tick       │────▶│              │     │                      │
//! │ Correction timer  │────▶│  Event Queue │────▶│  Main Loop           │
//! │ Telemetry tick    │────▶│  (lock-free) │     │  (owns the engine)   │
//! └───────────────────┘     └──────────────┘     └──────────────────────┘
//! ```

use core::sync::atomic::{AtomicU8, Ordering};

/// Maximum number of pending events.
/// Power of 2 for efficient ring buffer modulo.
const EVENT_QUEUE_CAP: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Event {
    /// A correction window elapsed.  The token it was armed with is
    /// latched in `drivers::hw_timer` and read back by the consumer.
    CorrectionTimerFired = 0,
    /// Periodic sensor acquisition tick (1 Hz by default).
    SampleTick           = 10,
    /// Telemetry report timer fired.
    TelemetryTick        = 30,
}

// ── Lock-free SPSC ring buffer ────────────────────────────────
//
// Timer callbacks write (produce), main loop reads (consume).
// Atomic head/tail indices; the buffer is a static so the
// extern "C" callbacks can reach it.

static EVENT_HEAD: AtomicU8 = AtomicU8::new(0);
static EVENT_TAIL: AtomicU8 = AtomicU8::new(0);
// SAFETY: slot `head` is written only by the producer before it publishes
// `head + 1` (Release); slot `tail` is read only by the consumer after it
// observes that store (Acquire).  The esp_timer task is the single producer.
static mut EVENT_BUFFER: [u8; EVENT_QUEUE_CAP] = [0; EVENT_QUEUE_CAP];

/// Push an event into the queue.
/// Safe to call from timer-callback context (lock-free).
/// Returns `false` if the queue is full (event dropped).
pub fn push_event(event: Event) -> bool {
    let head = EVENT_HEAD.load(Ordering::Relaxed);
    let tail = EVENT_TAIL.load(Ordering::Acquire);
    let next_head = (head + 1) % EVENT_QUEUE_CAP as u8;

    if next_head == tail {
        return false;
    }

    unsafe {
        EVENT_BUFFER[head as usize] = event as u8;
    }

    EVENT_HEAD.store(next_head, Ordering::Release);
    true
}

/// Pop the next event from the queue.
/// Called from the main loop (single consumer).
pub fn pop_event() -> Option<Event> {
    let tail = EVENT_TAIL.load(Ordering::Relaxed);
    let head = EVENT_HEAD.load(Ordering::Acquire);

    if tail == head {
        return None;
    }

    let raw = unsafe { EVENT_BUFFER[tail as usize] };
    EVENT_TAIL.store((tail + 1) % EVENT_QUEUE_CAP as u8, Ordering::Release);

    event_from_u8(raw)
}

/// Drain all pending events into a callback, FIFO.
pub fn drain_events(mut handler: impl FnMut(Event)) {
    while let Some(event) = pop_event() {
        handler(event);
    }
}

/// Number of pending events.
pub fn queue_len() -> usize {
    let head = EVENT_HEAD.load(Ordering::Relaxed) as usize;
    let tail = EVENT_TAIL.load(Ordering::Relaxed) as usize;
    (head + EVENT_QUEUE_CAP - tail) % EVENT_QUEUE_CAP
}

// ── Internal ──────────────────────────────────────────────────

fn event_from_u8(raw: u8) -> Option<Event> {
    match raw {
        0  => Some(Event::CorrectionTimerFired),
        10 => Some(Event::SampleTick),
        30 => Some(Event::TelemetryTick),
        _  => None,
    }
}
