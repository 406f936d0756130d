use std::error::Error;

use flexi_logger::Logger;
use volatile_transient::persist::DEFAULT_ARTIFACT;
use volatile_transient::{Employee, save};

fn main() -> Result<(), Box<dyn Error>> {
    let _logger = Logger::try_with_env_or_str("info")?.start()?;

    let mut employee = Employee::new("Reyan Ali", 111222333);
    employee.set_phone("Some number");
    employee.set_address("Somewhere");

    println!("Serialize Employee object...");
    println!("{employee}");

    save(DEFAULT_ARTIFACT, &employee)?;

    Ok(())
}
