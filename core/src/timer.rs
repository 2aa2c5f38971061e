use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::constants::TIMER_INTERVAL;

/// # Delay timer
/// An 8-bit counter that decrements at 60Hz on its own thread, clamped at
/// zero, while instructions execute on the caller's thread.
///
/// The counter is the only state shared between the two threads, so it
/// lives in an atomic cell and every access goes through `get`/`set`.
pub struct DelayTimer {
    counter: Arc<AtomicU8>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl DelayTimer {
    pub fn new() -> Self {
        DelayTimer {
            counter: Arc::new(AtomicU8::new(0)),
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// Launches the decrement thread. Calling it again is a no-op.
    pub fn start(&mut self) {
        if self.handle.is_some() {
            return;
        }
        self.running.store(true, Ordering::Release);
        let counter = Arc::clone(&self.counter);
        let running = Arc::clone(&self.running);
        self.handle = Some(thread::spawn(move || {
            while running.load(Ordering::Acquire) {
                thread::sleep(TIMER_INTERVAL);
                Self::tick(&counter);
            }
        }));
    }

    pub fn set(&self, value: u8) {
        self.counter.store(value, Ordering::Release);
    }

    pub fn get(&self) -> u8 {
        self.counter.load(Ordering::Acquire)
    }

    /// One 60Hz step: decrement unless already zero.
    fn tick(counter: &AtomicU8) {
        let _ = counter.fetch_update(Ordering::AcqRel, Ordering::Acquire, |value| {
            value.checked_sub(1)
        });
    }
}

impl Default for DelayTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for DelayTimer {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
