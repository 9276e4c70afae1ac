use std::process::ExitStatus;
use thiserror::Error;

/// Problems with the resolved options. These are raised before any external
/// process is started.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("can't set cacheTo ({cache_to}) without buildx enabled")]
    CacheToWithoutBuildx { cache_to: String },

    #[error("no image names could be resolved, set at least one tag or a fully qualified image name")]
    NoImageNames,

    #[error("invalid expose port {value:?}")]
    InvalidPort { value: String },
}

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("`{command}` failed with {status}")]
    CommandFailed { command: String, status: ExitStatus },
}
