use std::error::Error;

use flexi_logger::Logger;
use volatile_transient::persist::DEFAULT_ARTIFACT;
use volatile_transient::{Employee, load};

fn main() -> Result<(), Box<dyn Error>> {
    let _logger = Logger::try_with_env_or_str("info")?.start()?;

    let employee: Employee = load(DEFAULT_ARTIFACT)?;

    // The national id was never written, so it prints as 0.
    println!("Deserialize Employee object...");
    println!("{employee}");

    Ok(())
}
