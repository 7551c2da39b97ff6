use std::io;

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Ctrl-C error: {0}")]
    CtrlC(#[from] ctrlc::Error),
    #[error("failed to start worker threads: {0}")]
    Thread(#[source] io::Error),
}
