use std::error::Error;
use std::sync::Arc;

use flexi_logger::Logger;
use volatile_transient::{StdoutSink, VisibilityConfig, VisibilityDemo};

// Runs until the process is killed. Without acquire/release ordering on the
// counter, only the "Increment" lines would be guaranteed to show up.
fn main() -> Result<(), Box<dyn Error>> {
    let _logger = Logger::try_with_env_or_str("info")?.start()?;

    let demo = VisibilityDemo::spawn(VisibilityConfig::default(), Arc::new(StdoutSink))?;
    demo.join()?;

    Ok(())
}
