pub mod counter;
pub mod error;
pub mod persist;
pub mod report;
mod sync;
pub mod visibility;

pub use counter::{Interrupt, SharedCounter, StopSignal};
pub use error::{DemoError, FormatError, PersistError, PersistResult};
pub use persist::{Employee, Persistable, decode, encode, load, save};
pub use report::{ProgressEvent, ProgressSink, RecordingSink, StdoutSink};
pub use visibility::{
    ReaderStats, VisibilityConfig, VisibilityDemo, VisibilityReport, WriterSignals, WriterStats,
};
