//! Simple, owning request and response types.
use std::borrow::Cow;
use std::collections::HashMap;

use crate::endpoint::QueryParameter;

use super::{WebRequest, WebResponse};

/// Open and simple implementation of `WebRequest`.
#[derive(Clone, Debug, Default)]
pub struct Request {
    /// The key-value pairs in the url query component.
    pub query: HashMap<String, String>,

    /// The key-value pairs of a `x-www-form-urlencoded` body.
    pub urlbody: HashMap<String, String>,

    /// Provided authorization header.
    pub auth: Option<String>,
}

/// Open and simple implementation of `WebResponse`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code, zero until one was set.
    pub status: u16,

    /// Headers in the order they were added.
    pub headers: Vec<(String, String)>,

    /// Media type of the body.
    pub content_type: Option<String>,

    /// Encoded body of the response.
    pub body: Option<String>,
}

/// An uninhabited error type for simple requests and responses.
///
/// Since these types are built to never error on their operation, and `!` is not the stable unique
/// representation for uninhabited types, this simple enum without variants is used instead.
#[derive(Debug)]
pub enum NoError {}

impl Response {
    /// The value of the first header with a name, compared case-insensitively.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl WebRequest for Request {
    type Error = NoError;
    type Response = Response;

    fn query(&mut self) -> Result<Cow<dyn QueryParameter + 'static>, Self::Error> {
        Ok(Cow::Borrowed(&self.query))
    }

    fn urlbody(&mut self) -> Result<Cow<dyn QueryParameter + 'static>, Self::Error> {
        Ok(Cow::Borrowed(&self.urlbody))
    }

    fn authheader(&mut self) -> Result<Option<Cow<str>>, Self::Error> {
        Ok(self.auth.as_ref().map(|string| Cow::Borrowed(string.as_str())))
    }
}

impl WebResponse for Response {
    type Error = NoError;

    fn status(&mut self, status: u16) -> Result<(), Self::Error> {
        self.status = status;
        Ok(())
    }

    fn header(&mut self, name: &str, value: &str) -> Result<(), Self::Error> {
        self.headers.push((name.to_owned(), value.to_owned()));
        Ok(())
    }

    fn body(&mut self, content_type: &str, body: &str) -> Result<(), Self::Error> {
        self.content_type = Some(content_type.to_owned());
        self.body = Some(body.to_owned());
        Ok(())
    }
}

impl NoError {
    /// Turn this into any type.
    ///
    /// Since `NoError` is uninhabited, this always works but is never executed.
    pub fn into<T>(self) -> T {
        match self {}
    }
}
