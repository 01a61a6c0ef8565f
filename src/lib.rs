//! Namespaced fleet configuration store.
//!
//! Loads a single `.fleetconfig` file describing namespaces of controller,
//! agent, and microservice records, maintains secondary indices for O(1)
//! lookup, applies create/delete mutations, and writes every mutation back
//! to the file, restoring an in-memory snapshot if the write fails.

pub mod errors;
pub mod file;
pub mod index;
pub mod locate;
pub mod store;
pub mod types;

pub use errors::StoreError;
pub use index::{ConfigIndex, ResourcePos};
pub use locate::{resolve_config_path, CONFIG_FILE_NAME};
pub use store::ConfigStore;
pub use types::{Agent, Configuration, Controller, Microservice, Namespace, ResourceKind};
