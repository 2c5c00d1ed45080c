use crate::code_grant::action::TokenResult;
use crate::code_grant::error::{Error, Result, ServerError};

/// Encodes the outcome of a token request into a response body.
///
/// The formatter is chosen per request by the `format` parameter. Implement this to offer other
/// encodings, for example xml, and register it with the endpoint.
pub trait Formatter: Send + Sync {
    /// The media type of the produced bodies.
    fn content_type(&self) -> &str;

    /// Encode an issued token.
    fn format_token(&self, token: &TokenResult) -> Result<String>;

    /// Encode a rejection as `error` and `error_description`.
    fn format_error(&self, error: &ServerError) -> Result<String>;
}

/// The encodings offered out of the box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    /// `application/json`, the default.
    Json,

    /// `application/x-www-form-urlencoded`.
    Form,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    error_description: &'a str,
}

impl Format {
    /// The format with the given value of the `format` parameter.
    pub fn by_name(name: &str) -> Option<Format> {
        match name {
            "json" => Some(Format::Json),
            "form" => Some(Format::Form),
            _ => None,
        }
    }

    /// The value of the `format` parameter selecting this format.
    pub fn name(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Form => "form",
        }
    }
}

impl Default for Format {
    fn default() -> Self {
        Format::Json
    }
}

impl Formatter for Format {
    fn content_type(&self) -> &str {
        match self {
            Format::Json => "application/json",
            Format::Form => "application/x-www-form-urlencoded",
        }
    }

    fn format_token(&self, token: &TokenResult) -> Result<String> {
        match self {
            Format::Json => serde_json::to_string(token).map_err(Error::internal),
            Format::Form => serde_urlencoded::to_string(token).map_err(Error::internal),
        }
    }

    fn format_error(&self, error: &ServerError) -> Result<String> {
        let body = ErrorBody {
            error: error.code(),
            error_description: error.message(),
        };

        match self {
            Format::Json => serde_json::to_string(&body).map_err(Error::internal),
            Format::Form => serde_urlencoded::to_string(&body).map_err(Error::internal),
        }
    }
}
