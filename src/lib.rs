//! Client library for the Clowder data management service.
//!
//! Datasets and files are addressed by human-readable name. Names are not
//! unique on the service, so every name goes through [`resolve`], which
//! refuses to act unless exactly one entity matches.

pub mod api;
pub mod config;
pub mod error;
pub mod resolve;
pub mod transport;
pub mod upload;

pub use api::ClowderClient;
pub use config::{Auth, ClientConfig};
pub use error::{ClowderError, EntityKind, Result};
