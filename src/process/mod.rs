use std::io;

pub mod executor;

pub use executor::ProcessRunner;

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("command not found: {0}")]
    NotFound(String),
    #[error("{program} exited with {status}")]
    Failed { program: String, status: String },
    #[error("process error: {0}")]
    Io(#[from] io::Error),
}
