//! A base for implementing front-ends.
//!
//! Front-ends are glue adapters from http server crates to the [`TokenEndpoint`]. The endpoint
//! itself only deals in parameters and rendered responses, a front-end extracts the former from
//! the request of its server and writes the latter to the response.
//!
//! ## Usage
//!
//! Implement [`WebRequest`] and [`WebResponse`] for the types of your server and call
//! [`TokenEndpoint::execute`]. The owning types in [`simple::request`] serve as an example and are
//! useful for tests or for endpoints that do not speak http at all.
//!
//! [`TokenEndpoint`]: ../endpoint/struct.TokenEndpoint.html
//! [`TokenEndpoint::execute`]: ../endpoint/struct.TokenEndpoint.html#method.execute
//! [`WebRequest`]: simple/trait.WebRequest.html
//! [`WebResponse`]: simple/trait.WebResponse.html
//! [`simple::request`]: simple/request/index.html

pub mod simple;
