//! The collaborators of the token endpoint.
//!
//! The endpoint itself never stores anything. Client secrets, users and issued tokens are all
//! managed by a [`DataHandler`], of which a fresh instance is created for every request. This
//! module defines that contract, the records it exchanges with the endpoint, and a simple
//! in-memory implementation.
//!
//! ```
//! use std::sync::Arc;
//! use oxide_token::endpoint::{FlowRegistry, TokenEndpoint};
//! use oxide_token::primitives::memory::MemoryStore;
//!
//! let store = Arc::new(MemoryStore::new());
//! let endpoint = TokenEndpoint::new(FlowRegistry::default_flows(), move || store.handler());
//! # let _ = endpoint;
//! ```
//!
//! [`DataHandler`]: handler/trait.DataHandler.html
use chrono::DateTime;
use chrono::Utc;

pub mod auth_info;
pub mod generator;
pub mod handler;
pub mod memory;

type Time = DateTime<Utc>;

/// Commonly used primitives for data handler implementations.
pub mod prelude {
    pub use super::auth_info::{AccessToken, AuthInfo};
    pub use super::generator::{RandomGenerator, TokenGenerator};
    pub use super::handler::{DataHandler, DataHandlerFactory};
    pub use super::memory::{MemoryHandler, MemoryStore};
}
