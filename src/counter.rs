use crossbeam_utils::CachePadded;

use crate::sync::{AtomicBool, AtomicU64, Ordering};

#[derive(Debug)]
pub struct SharedCounter {
    value: CachePadded<AtomicU64>,
}

impl Default for SharedCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedCounter {
    pub fn new() -> Self {
        Self {
            value: CachePadded::new(AtomicU64::new(0)),
        }
    }

    pub fn increment(&self) -> u64 {
        self.value.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn load(&self) -> u64 {
        self.value.load(Ordering::Acquire)
    }
}

// Writes made before `stop` are visible to whoever sees `is_stopped() == true`.
#[derive(Debug)]
pub struct StopSignal {
    raised: AtomicBool,
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl StopSignal {
    pub fn new() -> Self {
        Self {
            raised: AtomicBool::new(false),
        }
    }

    pub fn stop(&self) {
        self.raised.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }
}

// Pending until consumed by `take`. A request raised while nobody is waiting
// stays pending for the next wait.
#[derive(Debug)]
pub struct Interrupt {
    pending: AtomicBool,
}

impl Default for Interrupt {
    fn default() -> Self {
        Self::new()
    }
}

impl Interrupt {
    pub fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
        }
    }

    pub fn raise(&self) {
        self.pending.store(true, Ordering::Release);
    }

    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }
}
