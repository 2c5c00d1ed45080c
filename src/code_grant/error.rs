//! Errors reported by the token endpoint.
//!
//! There are two classes of failure. A [`ServerError`] is a protocol level rejection of the
//! request, such as a missing parameter or a client that failed to authenticate. These are
//! rendered to the client with their wire code. Everything else, a storage outage or a broken
//! invariant in a data handler, is an internal fault and must never be formatted as an OAuth
//! error; see [`Error::Internal`].
//!
//! [`ServerError`]: struct.ServerError.html
//! [`Error::Internal`]: enum.Error.html#variant.Internal
use std::borrow::Cow;
use std::error;
use std::fmt;

use thiserror::Error as ThisError;

/// Boxed source of an internal fault.
pub type BoxError = Box<dyn error::Error + Send + Sync + 'static>;

/// Result type of the token endpoint, defaulting to [`Error`].
///
/// [`Error`]: enum.Error.html
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The kinds of protocol failures, each with a stable machine-readable code.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum ErrorKind {
    /// A required parameter was absent from the request.
    MissingParam,

    /// The client could not be authenticated.
    ///
    /// Deliberately does not tell an unknown client apart from a wrong secret.
    InvalidClient,

    /// The grant, refresh token or authorization code is invalid, expired, revoked or was issued
    /// to another client.
    InvalidGrant,

    /// The `type` parameter does not name any registered grant action.
    UnsupportedType,

    /// The `secret_type` parameter names an algorithm the server does not offer.
    UnsupportedSecretType,
}

impl ErrorKind {
    /// The code rendered as the `error` field of an error body.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::MissingParam => "invalid_request",
            ErrorKind::InvalidClient => "invalid_client",
            ErrorKind::InvalidGrant => "invalid_grant",
            ErrorKind::UnsupportedType => "unsupported_grant_type",
            ErrorKind::UnsupportedSecretType => "unsupported_secret_type",
        }
    }
}

impl AsRef<str> for ErrorKind {
    fn as_ref(&self) -> &str {
        self.code()
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

/// A protocol failure that is reported back to the requesting client.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("{kind}: {message}")]
pub struct ServerError {
    kind: ErrorKind,
    message: Cow<'static, str>,
}

impl ServerError {
    /// Construct an error of some kind with a free-text explanation.
    pub fn new<M: Into<Cow<'static, str>>>(kind: ErrorKind, message: M) -> Self {
        ServerError {
            kind,
            message: message.into(),
        }
    }

    /// A required parameter is absent.
    pub fn missing_param(name: &str) -> Self {
        ServerError::new(ErrorKind::MissingParam, format!("'{}' not found", name))
    }

    /// The client failed to authenticate.
    ///
    /// The message is fixed so that responses for unknown clients and for wrong secrets can not be
    /// told apart.
    pub fn invalid_client() -> Self {
        ServerError::new(ErrorKind::InvalidClient, "client authentication failed")
    }

    /// The presented grant is not acceptable.
    pub fn invalid_grant<M: Into<Cow<'static, str>>>(message: M) -> Self {
        ServerError::new(ErrorKind::InvalidGrant, message)
    }

    /// No action handles the requested grant type.
    pub fn unsupported_type(grant_type: &str) -> Self {
        ServerError::new(
            ErrorKind::UnsupportedType,
            format!("grant type '{}' is not supported", grant_type),
        )
    }

    /// The requested secret type is not offered.
    pub fn unsupported_secret_type(secret_type: &str) -> Self {
        ServerError::new(
            ErrorKind::UnsupportedSecretType,
            format!("secret type '{}' is not supported", secret_type),
        )
    }

    /// The formal kind of error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The wire code, same as `self.kind().code()`.
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// The human readable explanation.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Iterate over the key value pairs that describe this error.
    ///
    /// These pairs make up the body of an error response.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Cow<'_, str>)> {
        vec![
            ("error", Cow::Borrowed(self.code())),
            ("error_description", Cow::Borrowed(self.message.as_ref())),
        ]
        .into_iter()
    }
}

/// Any failure of a grant action or of the data handler it calls.
#[derive(Debug, ThisError)]
pub enum Error {
    /// A protocol failure, rendered to the client.
    #[error(transparent)]
    Server(#[from] ServerError),

    /// An unexpected fault. Its details must not reach the client.
    #[error("internal failure while handling a token request")]
    Internal(#[source] BoxError),
}

impl Error {
    /// Wrap an arbitrary fault of a collaborator.
    pub fn internal<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Error::Internal(err.into())
    }

    /// The kind of a protocol failure, `None` for internal faults.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Error::Server(err) => Some(err.kind()),
            Error::Internal(_) => None,
        }
    }

    /// Whether this failure should be reported to the client.
    pub fn is_server_error(&self) -> bool {
        self.kind().is_some()
    }
}
