mod expander;

pub use expander::{HomeDirNotFound, PathExpander};
