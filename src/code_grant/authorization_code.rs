//! Provides the handling for Access Token Requests with an authorization code.
use tracing::debug;
use url::Url;

use crate::endpoint::Context;

use super::action::{authenticate, required, GrantAction, TokenResult};
use super::error::{Result, ServerError};

/// Redeems an authorization code for an access token.
///
/// The code must have been issued to the authenticated client and the `redirect_uri` must equal
/// the one the code was bound to. Both are compared only after the client authenticated, so an
/// attacker without credentials learns nothing about the code.
#[derive(Clone, Copy, Debug)]
pub struct AuthorizationCode {
    name: &'static str,
}

impl AuthorizationCode {
    /// The grant type this action answers to.
    pub const NAME: &'static str = "authorization_code";

    /// The name earlier protocol drafts used for the same grant.
    pub const WEB_SERVER: &'static str = "web_server";

    /// The action for `type=authorization_code`.
    pub fn new() -> Self {
        AuthorizationCode { name: Self::NAME }
    }

    /// The action for `type=web_server`.
    pub fn web_server() -> Self {
        AuthorizationCode {
            name: Self::WEB_SERVER,
        }
    }
}

impl Default for AuthorizationCode {
    fn default() -> Self {
        AuthorizationCode::new()
    }
}

impl GrantAction for AuthorizationCode {
    fn name(&self) -> &str {
        self.name
    }

    fn handle_request(&self, ctx: &mut Context) -> Result<TokenResult> {
        let client = authenticate(ctx, self.name)?;
        let code = required(ctx.code(), "code")?;
        let redirect_uri = required(ctx.redirect_uri(), "redirect_uri")?;

        let handler = ctx.data_handler();
        let info = handler
            .get_auth_info_by_code(&code)?
            .ok_or_else(|| ServerError::invalid_grant("authorization code is invalid"))?;

        if !info.belongs_to(&client.client_id) {
            debug!(client_id = %client.client_id, "authorization code of another client presented");
            return Err(ServerError::invalid_grant("authorization code is invalid").into());
        }

        if info.code_expired() {
            return Err(ServerError::invalid_grant("authorization code has expired").into());
        }

        let matches = match (redirect_uri.parse::<Url>(), &info.redirect_uri) {
            (Ok(given), Some(bound)) => &given == bound,
            _ => false,
        };

        if !matches {
            return Err(ServerError::invalid_grant("redirect_uri does not match").into());
        }

        let info = handler.create_access_token(&info, client.secret_type.as_deref())?;
        TokenResult::from_auth_info(info, client.secret_type)
    }
}
