use anyhow::Result;
use ignore::WalkBuilder;
use log::{debug, log_enabled, trace, warn, Level};
use number_prefix::NumberPrefix;
use std::{ffi::OsString, path::Path, process::Command};

use super::run_command;
use crate::services::ImageBackend;

/// Drives the `docker` command line client.
pub struct DockerBackend {
    program: OsString,
}

impl DockerBackend {
    pub fn new<P: Into<OsString>>(program: P) -> DockerBackend {
        DockerBackend {
            program: program.into(),
        }
    }

    fn command(&self, args: &[String]) -> Command {
        let mut command = Command::new(&self.program);
        command.args(args);
        command
    }
}

impl ImageBackend for DockerBackend {
    fn build_image(&mut self, args: &[String], context: &Path) -> Result<()> {
        if log_enabled!(Level::Debug) {
            log_context(context);
        }

        run_command(self.command(args))
    }

    fn push_image(&mut self, args: &[String]) -> Result<()> {
        run_command(self.command(args))
    }
}

/// Logs the build context and returns its size in bytes. Entries that can't
/// be read are skipped.
fn log_context(context: &Path) -> u64 {
    let walk = WalkBuilder::new(context)
        .add_custom_ignore_filename(".dockerignore")
        .ignore(false)
        .git_global(false)
        .git_ignore(false)
        .git_exclude(false)
        .hidden(false)
        .build();

    let mut context_size = 0;
    for result in walk {
        let result = match result {
            Ok(result) => result,
            Err(err) => {
                warn!("skipping build context entry: {}", err);
                continue;
            }
        };

        let is_dir = result.file_type().map(|t| t.is_dir()).unwrap_or(false);
        trace!(
            "context: {}{}",
            result.path().display(),
            if is_dir { "/" } else { "" }
        );

        match result.metadata() {
            Ok(metadata) => context_size += metadata.len(),
            Err(err) => debug!("couldn't read {}: {}", result.path().display(), err),
        }
    }

    match NumberPrefix::binary(context_size as f32) {
        NumberPrefix::Standalone(bytes) => debug!("build context is {} bytes", bytes),
        NumberPrefix::Prefixed(prefix, n) => debug!("build context is {:.1} {}B", n, prefix),
    };

    context_size
}
