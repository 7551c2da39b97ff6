pub mod commands;
pub mod config;
pub mod dispatch;
pub mod state;
pub mod tokenizer;
