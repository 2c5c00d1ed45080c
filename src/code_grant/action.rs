//! The contract shared by all grant actions.
use tracing::debug;

use crate::endpoint::Context;
use crate::primitives::auth_info::AuthInfo;

use super::error::{Error, Result, ServerError};

/// Handles token requests of one grant type.
///
/// An action is a stateless strategy: it is created once when the flows are configured and then
/// shared by all concurrent requests. Anything specific to a request lives in the [`Context`].
///
/// [`Context`]: ../../endpoint/struct.Context.html
pub trait GrantAction: Send + Sync {
    /// The value of the `type` parameter this action answers to.
    fn name(&self) -> &str;

    /// Validate the request and obtain a token from the data handler.
    fn handle_request(&self, ctx: &mut Context) -> Result<TokenResult>;
}

/// Token parameters returned to a client.
///
/// Absent fields are omitted from any encoding of the result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResult {
    /// The access token issued by the authorization server.
    pub access_token: String,

    /// The lifetime in seconds of the access token.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub expires_in: Option<i64>,

    /// The refresh token, which can be used to obtain new access tokens.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub refresh_token: Option<String>,

    /// The secret accompanying the access token.
    #[serde(
        rename = "access_token_secret",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub secret: Option<String>,

    /// The algorithm the secret is meant for.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub secret_type: Option<String>,
}

impl TokenResult {
    /// Read back the token issued on a record.
    ///
    /// The secret is only passed on when a secret type was requested, and the secret type is then
    /// the requested one. A requested secret the handler failed to issue is an internal fault.
    pub fn from_auth_info(info: AuthInfo, requested_secret_type: Option<String>) -> Result<Self> {
        let token = info
            .access_token
            .ok_or_else(|| Error::internal("data handler did not issue an access token"))?;

        let (secret, secret_type) = match (requested_secret_type, token.secret) {
            (Some(secret_type), Some(secret)) => (Some(secret), Some(secret_type)),
            (Some(_), None) => return Err(Error::internal("data handler did not issue a token secret")),
            (None, _) => (None, None),
        };

        Ok(TokenResult {
            access_token: token.token,
            expires_in: token.expires_in,
            refresh_token: info.refresh_token,
            secret,
            secret_type,
        })
    }
}

/// A client that has proven its identity for this request.
#[derive(Clone, Debug)]
pub struct Authenticated {
    /// The authenticated client.
    pub client_id: String,

    /// The supported secret type the client asked for, if any.
    pub secret_type: Option<String>,
}

/// The checks every grant action performs first, in this order.
///
/// 1. `client_id` must be present.
/// 2. `client_secret` must be present.
/// 3. The data handler must accept the pair for `grant_type`.
/// 4. A `secret_type`, if given, must be supported.
pub fn authenticate(ctx: &mut Context, grant_type: &str) -> Result<Authenticated> {
    let client_id = ctx
        .client_id()
        .ok_or_else(|| ServerError::missing_param("client_id"))?
        .into_owned();
    let client_secret = ctx
        .client_secret()
        .ok_or_else(|| ServerError::missing_param("client_secret"))?
        .into_owned();

    if !ctx
        .data_handler()
        .validate_client(&client_id, &client_secret, grant_type)?
    {
        debug!(grant_type, "client authentication failed");
        return Err(ServerError::invalid_client().into());
    }

    let secret_type = match ctx.secret_type().map(|st| st.into_owned()) {
        None => None,
        Some(secret_type) => {
            if !ctx.data_handler().supports_secret_type(&secret_type)? {
                return Err(ServerError::unsupported_secret_type(&secret_type).into());
            }
            Some(secret_type)
        }
    };

    Ok(Authenticated {
        client_id,
        secret_type,
    })
}

/// A parameter the grant can not do without.
pub(crate) fn required(value: Option<std::borrow::Cow<str>>, name: &str) -> Result<String> {
    value
        .map(|value| value.into_owned())
        .ok_or_else(|| ServerError::missing_param(name).into())
}
