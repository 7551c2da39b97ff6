pub mod codec;
pub mod core;
pub mod error;
pub mod highlight;
pub mod input;
pub mod path;
pub mod process;
pub mod runtime;
pub mod shell;
