//! The transport boundary of the token endpoint.
//!
//! Contains the request and response abstraction as well as straightforward owning types
//! suitable for HTTP-less applications. This is useful for testing as well as token endpoints that
//! operate behind an HTTP portal.
use std::borrow::Cow;

use crate::endpoint::QueryParameter;

pub mod endpoint;

pub mod request;

/// Abstraction of web requests with several different abstractions and constructors needed by the
/// token endpoint.
pub trait WebRequest {
    /// The error generated from access of malformed or invalid requests.
    type Error;

    /// The corresponding type of Responses returned from this module.
    type Response: WebResponse<Error = Self::Error>;

    /// Retrieve a parsed version of the url query.
    ///
    /// An Err return value indicates a malformed query or an otherwise malformed WebRequest.
    fn query(&mut self) -> Result<Cow<dyn QueryParameter + 'static>, Self::Error>;

    /// Retrieve the parsed `application/x-form-urlencoded` body of the request.
    ///
    /// An Err value indicates a malformed body or a different Content-Type.
    fn urlbody(&mut self) -> Result<Cow<dyn QueryParameter + 'static>, Self::Error>;

    /// Contents of the authorization header or none if none exists.
    fn authheader(&mut self) -> Result<Option<Cow<str>>, Self::Error>;
}

/// Response representation into which the endpoint writes its answer.
pub trait WebResponse {
    /// The error generated when trying to construct an unhandled or invalid response.
    type Error;

    /// Set the numeric http status code.
    fn status(&mut self, status: u16) -> Result<(), Self::Error>;

    /// Add a header.
    fn header(&mut self, name: &str, value: &str) -> Result<(), Self::Error>;

    /// Set the body and its media type.
    fn body(&mut self, content_type: &str, body: &str) -> Result<(), Self::Error>;
}
