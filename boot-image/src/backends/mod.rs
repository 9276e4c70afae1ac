mod docker;
mod spring_boot;

pub use docker::DockerBackend;
pub use spring_boot::SpringBootPackager;

use anyhow::Result;
use log::debug;
use std::process::Command;

use crate::error::ExecutionError;

/// Runs a command to completion, any non-zero exit is an error.
fn run_command(mut command: Command) -> Result<()> {
    let display = format!("{:?}", command);
    debug!("executing {}", display);

    let status = command.status()?;

    if !status.success() {
        return Err(ExecutionError::CommandFailed {
            command: display,
            status,
        }
        .into());
    }

    Ok(())
}
