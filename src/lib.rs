//! # oxide-token
//!
//! The token issuing core of an OAuth2 authorization server.
//!
//! ## About
//!
//! `oxide-token` receives the parameters of a token request, dispatches them to the handler of
//! the requested grant type, validates the client and the grant, and renders either an access
//! token or a protocol error. Storage of clients and tokens is left to a [`DataHandler`] of your
//! choosing, transport to the web server of your choosing. The crate itself performs no I/O.
//!
//! ## Setting up a token endpoint
//!
//! First decide which grant types your server offers. These are configured as flows in a
//! [`FlowRegistry`], each flow grouping one or more [`GrantAction`]s. Grant types that are not
//! registered are rejected with `unsupported_grant_type`, even when the crate provides them.
//!
//! Next, a [`DataHandlerFactory`] needs to be chosen. The endpoint asks it for a fresh
//! [`DataHandler`] on every request, so an implementation may hold a database transaction or other
//! request scoped resources. There is a simple, in-memory implementation in
//! [`primitives::memory`] for tests and prototypes.
//!
//! Finally, create a [`TokenEndpoint`] and feed it requests, either directly with their parsed
//! parameters or through the [`WebRequest`] abstraction of [`frontends::simple`].
//!
//! ```
//! use std::sync::Arc;
//! use oxide_token::endpoint::{FlowRegistry, TokenEndpoint};
//! use oxide_token::frontends::simple::request::Request;
//! use oxide_token::primitives::memory::MemoryStore;
//!
//! let mut store = MemoryStore::new();
//! store.support_secret_type("hmac-sha256");
//! store.register_client("foo", "bar").unwrap();
//! let store = Arc::new(store);
//!
//! let endpoint = TokenEndpoint::new(FlowRegistry::default_flows(), move || store.handler());
//!
//! let mut request = Request::default();
//! request.urlbody.insert("type".into(), "client_credentials".into());
//! request.urlbody.insert("client_id".into(), "foo".into());
//! request.urlbody.insert("client_secret".into(), "bar".into());
//!
//! let response = match endpoint.execute(&mut request) {
//!     Ok(response) => response,
//!     Err(never) => never.into(),
//! };
//! assert_eq!(response.status, 200);
//! assert_eq!(response.header_value("Cache-Control"), Some("no-store"));
//! ```
//!
//! _WARNING_: Client secrets travel in the request. Front-ends MUST ensure a secure transportation
//! layer, which means using TLS for communication over HTTPS.
//!
//! [`DataHandler`]: primitives/handler/trait.DataHandler.html
//! [`DataHandlerFactory`]: primitives/handler/trait.DataHandlerFactory.html
//! [`FlowRegistry`]: endpoint/struct.FlowRegistry.html
//! [`GrantAction`]: code_grant/action/trait.GrantAction.html
//! [`primitives::memory`]: primitives/memory/index.html
//! [`TokenEndpoint`]: endpoint/struct.TokenEndpoint.html
//! [`WebRequest`]: frontends/simple/trait.WebRequest.html
//! [`frontends::simple`]: frontends/simple/index.html
#![warn(missing_docs)]

#[macro_use]
extern crate serde_derive;

pub mod code_grant;
pub mod endpoint;
pub mod frontends;
pub mod primitives;
