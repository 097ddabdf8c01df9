//! Credential storage backends

pub mod memory;
pub mod traits;

pub use memory::MemoryCredentialStore;
pub use traits::{Credential, CredentialStore};
