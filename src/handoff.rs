//! Latest-wins handoff between the capture thread and the main loop.
//!
//! Gesture detection only cares about the newest frame, so a frame that has
//! not been taken yet is overwritten rather than queued.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

struct SlotState<T> {
    value: Option<T>,
    closed: bool,
}

pub struct FrameSlot<T> {
    state: Mutex<SlotState<T>>,
    ready: Condvar,
    dropped: AtomicU64,
}

impl<T> FrameSlot<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SlotState {
                value: None,
                closed: false,
            }),
            ready: Condvar::new(),
            dropped: AtomicU64::new(0),
        }
    }

    /// Store `value`, replacing any frame not yet taken.
    /// Returns false once the slot is closed.
    pub fn publish(&self, value: T) -> bool {
        let mut state = self.state.lock();
        if state.closed {
            return false;
        }
        if state.value.replace(value).is_some() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        drop(state);
        self.ready.notify_one();
        true
    }

    pub fn try_take(&self) -> Option<T> {
        self.state.lock().value.take()
    }

    /// Wait up to `timeout` for a frame. Returns `None` on timeout or when
    /// the slot is closed and empty.
    pub fn take_timeout(&self, timeout: Duration) -> Option<T> {
        let mut state = self.state.lock();
        if state.value.is_none() && !state.closed {
            // Spurious wakeups just return whatever is there.
            let _ = self.ready.wait_for(&mut state, timeout);
        }
        state.value.take()
    }

    pub fn close(&self) {
        self.state.lock().closed = true;
        self.ready.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Frames overwritten before they were taken.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl<T> Default for FrameSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_latest_frame_wins() {
        let slot = FrameSlot::new();
        assert!(slot.publish(1));
        assert!(slot.publish(2));
        assert!(slot.publish(3));
        assert_eq!(slot.try_take(), Some(3));
        assert_eq!(slot.try_take(), None);
        assert_eq!(slot.dropped(), 2);
    }

    #[test]
    fn test_take_timeout_on_empty_slot() {
        let slot: FrameSlot<u32> = FrameSlot::new();
        assert_eq!(slot.take_timeout(Duration::from_millis(10)), None);
    }

    #[test]
    fn test_closed_slot_rejects_publish() {
        let slot = FrameSlot::new();
        slot.publish("a");
        slot.close();
        assert!(slot.is_closed());
        assert!(!slot.publish("b"));
        // The frame published before close is still delivered.
        assert_eq!(slot.take_timeout(Duration::from_millis(10)), Some("a"));
        assert_eq!(slot.take_timeout(Duration::from_millis(10)), None);
    }

    #[test]
    fn test_cross_thread_handoff() {
        let slot = Arc::new(FrameSlot::new());
        let producer = {
            let slot = Arc::clone(&slot);
            thread::spawn(move || {
                for i in 0..100u32 {
                    slot.publish(i);
                }
                slot.close();
            })
        };

        let mut last = None;
        loop {
            match slot.take_timeout(Duration::from_millis(50)) {
                Some(v) => {
                    if let Some(prev) = last {
                        assert!(v > prev, "frames arrive in order");
                    }
                    last = Some(v);
                }
                None if slot.is_closed() => {
                    // Close may land between the timeout and this check.
                    if let Some(v) = slot.try_take() {
                        last = Some(v);
                    }
                    break;
                }
                None => {}
            }
        }
        producer.join().expect("producer thread");
        assert_eq!(last, Some(99));
    }
}
