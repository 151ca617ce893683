//! Credential records and decrypted credential values

mod types;

pub use types::*;
