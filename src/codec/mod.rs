//! Stateless byte transforms used by the file commands.

pub mod base64;
pub mod rle;
pub mod xor;

pub use rle::{decode as rle_decode, encode as rle_encode};
pub use xor::{xor_transform, DEFAULT_KEY};
