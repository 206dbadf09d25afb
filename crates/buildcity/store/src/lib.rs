//! BuildCity key-value storage.
//!
//! Every piece of durable app state (onboarding flag, cached gate URL, meal
//! and project records, settings) lives behind one string-keyed contract:
//! - `get` / `set` / `remove` / `clear`, last write wins per key
//! - no transactional guarantees beyond a single key
//!
//! Two backends ship with the crate:
//! - [`InMemoryStore`] for tests and ephemeral sessions
//! - [`FileStore`] which persists a JSON object and survives restarts

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

mod error;
pub mod file;
pub mod keys;
pub mod memory;
mod traits;

pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::InMemoryStore;
pub use traits::KeyValueStore;
