//! Dispatches token requests to grant actions and renders their outcome.
//!
//! The [`TokenEndpoint`] is the single entry point. It chooses the body format, creates a fresh
//! data handler for the request, looks up the grant action through the [`FlowRegistry`] and turns
//! the result into a [`Response`]. Protocol failures become formatted error responses while
//! unexpected faults are handed back to the caller untouched.
//!
//! ```
//! use std::collections::HashMap;
//! use std::sync::Arc;
//! use oxide_token::endpoint::{FlowRegistry, ResponseStatus, TokenEndpoint};
//! use oxide_token::primitives::memory::MemoryStore;
//!
//! let store = Arc::new(MemoryStore::new());
//! store.register_client("foo", "bar").unwrap();
//! let endpoint = TokenEndpoint::new(FlowRegistry::default_flows(), move || store.handler());
//!
//! let mut params = HashMap::new();
//! params.insert("type", "client_credentials");
//! params.insert("client_id", "foo");
//! params.insert("client_secret", "bar");
//!
//! let response = endpoint.handle_request(&params, None).unwrap();
//! assert_eq!(response.status, ResponseStatus::Ok);
//! assert_eq!(response.content_type, "application/json");
//! ```
//!
//! [`TokenEndpoint`]: struct.TokenEndpoint.html
//! [`FlowRegistry`]: struct.FlowRegistry.html
//! [`Response`]: struct.Response.html
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, debug_span, warn};

use crate::code_grant::action::TokenResult;
use crate::code_grant::error::{Error, ErrorKind, Result, ServerError};
use crate::primitives::handler::DataHandlerFactory;

mod context;
mod flow;
mod format;
mod query;

#[cfg(test)]
mod tests;

pub use self::context::{BasicCredentials, Context};
pub use self::flow::{Flow, FlowRegistry};
pub use self::format::{Format, Formatter};
pub use self::query::{NormalizedParameter, QueryParameter};

/// Answers token requests.
///
/// Cheap to share between threads when the factory is, all configuration is read only after
/// construction.
pub struct TokenEndpoint<F> {
    registry: Arc<FlowRegistry>,
    factory: F,
    formatters: HashMap<String, Arc<dyn Formatter>>,
    default_format: Arc<dyn Formatter>,
    standard_error_status: bool,
}

/// A rendered answer to a token request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    /// The status code to send.
    pub status: ResponseStatus,

    /// Headers besides the content type.
    pub headers: Vec<(String, String)>,

    /// Media type of the body.
    pub content_type: String,

    /// The encoded token or error.
    pub body: String,
}

/// The status codes a token response can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResponseStatus {
    /// Http status code 200.
    Ok,

    /// Http status code 400.
    BadRequest,

    /// Http status code 401.
    Unauthorized,
}

impl ResponseStatus {
    /// The numeric http status code.
    pub fn as_u16(self) -> u16 {
        match self {
            ResponseStatus::Ok => 200,
            ResponseStatus::BadRequest => 400,
            ResponseStatus::Unauthorized => 401,
        }
    }
}

impl<F: DataHandlerFactory> TokenEndpoint<F> {
    /// Create an endpoint dispatching to the flows of a registry.
    ///
    /// The factory is asked for a new data handler on every request. Bodies are json unless the
    /// request asks for `format=form`.
    pub fn new<R: Into<Arc<FlowRegistry>>>(registry: R, factory: F) -> Self {
        let mut formatters: HashMap<String, Arc<dyn Formatter>> = HashMap::new();
        for format in &[Format::Json, Format::Form] {
            formatters.insert(format.name().to_string(), Arc::new(*format));
        }

        TokenEndpoint {
            registry: registry.into(),
            factory,
            formatters,
            default_format: Arc::new(Format::Json),
            standard_error_status: false,
        }
    }

    /// Answer every rejection with 401, or distinguish 400 and 401.
    ///
    /// By default all rejections carry 401. When enabled, only `invalid_client` keeps 401 and all
    /// other rejections are answered with 400.
    pub fn standard_error_status(mut self, enabled: bool) -> Self {
        self.standard_error_status = enabled;
        self
    }

    /// The formatter used when the request does not name a known one.
    pub fn default_format<T: Formatter + 'static>(mut self, formatter: T) -> Self {
        self.default_format = Arc::new(formatter);
        self
    }

    /// Offer another body format under a value of the `format` parameter.
    pub fn with_formatter<T: Formatter + 'static>(mut self, name: &str, formatter: T) -> Self {
        self.formatters.insert(name.to_string(), Arc::new(formatter));
        self
    }

    /// The flows this endpoint dispatches to.
    pub fn registry(&self) -> &FlowRegistry {
        &self.registry
    }

    /// Handle the parameters of one token request.
    ///
    /// Credentials from an authorization header are only consulted when the parameters lack
    /// `client_id` or `client_secret`. Rejections are returned as `Ok` responses with a formatted
    /// error body, an `Err` signals a fault the client must not learn details about.
    pub fn handle_request(
        &self, params: &dyn QueryParameter, basic: Option<BasicCredentials>,
    ) -> Result<Response> {
        let format = params.value("format");
        let formatter = self.formatter(format.as_deref());

        let grant_type = match params.value("type") {
            Some(grant_type) => grant_type.into_owned(),
            None => return self.reject(formatter, &ServerError::missing_param("type")),
        };

        let span = debug_span!("token_endpoint", grant_type = %grant_type);
        let _entered = span.enter();
        debug!(format = ?format, "dispatching token request");

        let mut handler = self.factory.create();
        let mut ctx = Context::new(params, &mut handler).with_basic_credentials(basic);

        let result = match self.registry.find_action(&grant_type) {
            Some(action) => action.handle_request(&mut ctx),
            None => Err(ServerError::unsupported_type(&grant_type).into()),
        };

        match result {
            Ok(token) => self.issue(formatter, &token),
            Err(Error::Server(err)) => self.reject(formatter, &err),
            Err(err) => Err(err),
        }
    }

    /// Render a rejection in the format a request asked for.
    pub(crate) fn reject_request(&self, params: &dyn QueryParameter, err: &ServerError) -> Result<Response> {
        let format = params.value("format");
        self.reject(self.formatter(format.as_deref()), err)
    }

    fn formatter(&self, name: Option<&str>) -> &dyn Formatter {
        let formatter = name
            .and_then(|name| self.formatters.get(name))
            .unwrap_or(&self.default_format);
        &**formatter
    }

    fn issue(&self, formatter: &dyn Formatter, token: &TokenResult) -> Result<Response> {
        Ok(Response {
            status: ResponseStatus::Ok,
            headers: no_cache_headers(),
            content_type: formatter.content_type().to_string(),
            body: formatter.format_token(token)?,
        })
    }

    fn reject(&self, formatter: &dyn Formatter, err: &ServerError) -> Result<Response> {
        warn!(error = %err.kind(), "token request rejected");
        Ok(Response {
            status: self.status_for(err.kind()),
            headers: no_cache_headers(),
            content_type: formatter.content_type().to_string(),
            body: formatter.format_error(err)?,
        })
    }

    fn status_for(&self, kind: ErrorKind) -> ResponseStatus {
        match kind {
            ErrorKind::InvalidClient => ResponseStatus::Unauthorized,
            _ if self.standard_error_status => ResponseStatus::BadRequest,
            _ => ResponseStatus::Unauthorized,
        }
    }
}

fn no_cache_headers() -> Vec<(String, String)> {
    vec![
        ("Cache-Control".to_string(), "no-store".to_string()),
        ("Pragma".to_string(), "no-cache".to_string()),
    ]
}

impl<F> fmt::Debug for TokenEndpoint<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TokenEndpoint")
            .field("registry", &self.registry)
            .field("formats", &self.formatters.keys().collect::<Vec<_>>())
            .field("standard_error_status", &self.standard_error_status)
            .finish()
    }
}
