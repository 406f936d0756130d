use std::sync::{Mutex, PoisonError};

// Writer and reader lines may interleave in any order.
pub trait ProgressSink: Send + Sync {
    fn incremented(&self, value: u64);
    fn observed(&self, value: u64);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    Incremented(u64),
    Observed(u64),
}

impl ProgressEvent {
    pub fn line(&self) -> String {
        match self {
            ProgressEvent::Incremented(value) => format!("Increment shared counter: {value}"),
            ProgressEvent::Observed(value) => format!("Print shared counter: {value}"),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl ProgressSink for StdoutSink {
    fn incremented(&self, value: u64) {
        println!("{}", ProgressEvent::Incremented(value).line());
    }

    fn observed(&self, value: u64) {
        println!("{}", ProgressEvent::Observed(value).line());
    }
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn increments(&self) -> Vec<u64> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ProgressEvent::Incremented(value) => Some(value),
                ProgressEvent::Observed(_) => None,
            })
            .collect()
    }

    pub fn observations(&self) -> Vec<u64> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ProgressEvent::Observed(value) => Some(value),
                ProgressEvent::Incremented(_) => None,
            })
            .collect()
    }

    fn push(&self, event: ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl ProgressSink for RecordingSink {
    fn incremented(&self, value: u64) {
        self.push(ProgressEvent::Incremented(value));
    }

    fn observed(&self, value: u64) {
        self.push(ProgressEvent::Observed(value));
    }
}
