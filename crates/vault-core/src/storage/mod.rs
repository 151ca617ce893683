//! Persistence for credential records and keys
//!
//! - CSV record store with a fixed, validated schema
//! - Key file loading (and one-time creation)

mod key_file;
mod record_store;

pub use key_file::{create_key_file, load_key};
pub use record_store::{RecordStore, HEADER};
