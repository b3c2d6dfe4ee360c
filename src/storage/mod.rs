pub mod client;
pub mod content_type;
pub mod deploy;
pub mod error;
pub mod invocation;
pub mod signer;
pub mod target;
pub mod upload;
pub mod walk;

#[cfg(test)]
pub(crate) mod testing;

pub use client::http_client;
pub use deploy::put_website;
pub use error::StorageError;
pub use signer::Ed25519Signer;
