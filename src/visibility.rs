use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{info, warn};

use crate::counter::{Interrupt, SharedCounter, StopSignal};
use crate::error::DemoError;
use crate::report::ProgressSink;
use crate::sync::Contender;

const WRITER_THREAD: &str = "visibility-writer";
const READER_THREAD: &str = "visibility-reader";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityConfig {
    pub interval: Duration,
    // None keeps the writer going until cancelled.
    pub max_increments: Option<u64>,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_increments: None,
        }
    }
}

impl VisibilityConfig {
    pub fn bounded(max_increments: u64) -> Self {
        Self {
            max_increments: Some(max_increments),
            ..Self::default()
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    fn exhausted(&self, done: u64) -> bool {
        self.max_increments.is_some_and(|max| done >= max)
    }
}

#[derive(Debug, Default)]
pub struct WriterSignals {
    pub cancel: StopSignal,
    pub interrupt: Interrupt,
    // Raised by the writer itself, after its last increment.
    pub done: StopSignal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriterStats {
    pub increments: u64,
    pub interruptions: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderStats {
    pub last_seen: u64,
    pub observations: u64,
    pub polls: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityReport {
    pub writer: WriterStats,
    pub final_value: u64,
    pub reader: ReaderStats,
}

pub fn writer_loop<S: ProgressSink + ?Sized>(
    counter: &SharedCounter,
    sink: &S,
    config: &VisibilityConfig,
    signals: &WriterSignals,
) -> WriterStats {
    let mut stats = WriterStats::default();

    while !signals.cancel.is_stopped() && !config.exhausted(stats.increments) {
        let value = counter.increment();
        stats.increments += 1;
        sink.incremented(value);

        if pause(config.interval, signals) {
            stats.interruptions += 1;
        }
    }

    signals.done.stop();
    stats
}

// Waits out the full interval. Only a raised interrupt or cancel ends it
// early; spurious or stray wakeups from `park_timeout` go back to sleep.
fn pause(interval: Duration, signals: &WriterSignals) -> bool {
    if interval.is_zero() {
        return false;
    }

    let deadline = Instant::now() + interval;
    loop {
        if signals.cancel.is_stopped() {
            return false;
        }
        if signals.interrupt.take() {
            warn!("writer pause interrupted, continuing");
            return true;
        }

        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        thread::park_timeout(deadline - now);
    }
}

// `writer_done` is read before the counter, so the poll that sees it raised
// also sees the writer's last increment.
pub fn reader_loop<S: ProgressSink + ?Sized>(
    counter: &SharedCounter,
    sink: &S,
    writer_done: &StopSignal,
) -> ReaderStats {
    let mut stats = ReaderStats {
        last_seen: counter.load(),
        ..ReaderStats::default()
    };
    let backoff = Contender::new();

    loop {
        let finished = writer_done.is_stopped();
        let current = counter.load();
        stats.polls += 1;

        if current != stats.last_seen {
            sink.observed(current);
            stats.last_seen = current;
            stats.observations += 1;
            backoff.reset();
        } else if !finished {
            backoff.spin();
        }

        if finished {
            return stats;
        }
    }
}

// Used when the writer never started. Returns false if the reader panicked.
fn release_reader(reader: JoinHandle<ReaderStats>, writer_done: &StopSignal) -> bool {
    writer_done.stop();
    match reader.join() {
        Ok(_) => true,
        Err(_) => {
            warn!("{READER_THREAD} panicked while the writer failed to spawn");
            false
        }
    }
}

pub struct VisibilityDemo {
    counter: Arc<SharedCounter>,
    signals: Arc<WriterSignals>,
    writer: JoinHandle<WriterStats>,
    reader: JoinHandle<ReaderStats>,
}

impl VisibilityDemo {
    pub fn spawn<S>(config: VisibilityConfig, sink: Arc<S>) -> Result<Self, DemoError>
    where
        S: ProgressSink + ?Sized + 'static,
    {
        let counter = Arc::new(SharedCounter::new());
        let signals = Arc::new(WriterSignals::default());

        info!(
            "starting visibility run: interval={:?} max_increments={:?}",
            config.interval, config.max_increments
        );

        let reader = thread::Builder::new().name(READER_THREAD.into()).spawn({
            let counter = Arc::clone(&counter);
            let sink = Arc::clone(&sink);
            let signals = Arc::clone(&signals);
            move || reader_loop(&counter, sink.as_ref(), &signals.done)
        })?;

        let writer = thread::Builder::new().name(WRITER_THREAD.into()).spawn({
            let counter = Arc::clone(&counter);
            let signals = Arc::clone(&signals);
            move || writer_loop(&counter, sink.as_ref(), &config, &signals)
        });

        let writer = match writer {
            Ok(handle) => handle,
            Err(err) => {
                release_reader(reader, &signals.done);
                return Err(DemoError::Spawn(err));
            }
        };

        Ok(Self {
            counter,
            signals,
            writer,
            reader,
        })
    }

    pub fn counter(&self) -> &SharedCounter {
        &self.counter
    }

    pub fn interrupt_writer(&self) {
        self.signals.interrupt.raise();
        self.writer.thread().unpark();
    }

    pub fn cancel(&self) {
        self.signals.cancel.stop();
        self.writer.thread().unpark();
    }

    pub fn join(self) -> Result<VisibilityReport, DemoError> {
        let writer = self
            .writer
            .join()
            .map_err(|_| DemoError::TaskPanicked(WRITER_THREAD))?;
        let reader = self
            .reader
            .join()
            .map_err(|_| DemoError::TaskPanicked(READER_THREAD))?;

        let report = VisibilityReport {
            writer,
            final_value: self.counter.load(),
            reader,
        };
        info!(
            "visibility run finished: increments={} interruptions={} reader_last_seen={} polls={}",
            report.writer.increments,
            report.writer.interruptions,
            report.reader.last_seen,
            report.reader.polls
        );

        Ok(report)
    }
}
