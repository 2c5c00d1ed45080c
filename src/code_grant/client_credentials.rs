//! Provides the handling for Client Credentials Requests
use tracing::debug;

use crate::endpoint::Context;

use super::action::{authenticate, GrantAction, TokenResult};
use super::error::Result;

/// Offers access tokens to authenticated clients acting on their own behalf.
///
/// There is no user involved, the authorization record is created with an empty user id. Every
/// request rotates the refresh token of that record and issues a new access token.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClientCredentials;

impl ClientCredentials {
    /// The grant type this action answers to.
    pub const NAME: &'static str = "client_credentials";
}

impl GrantAction for ClientCredentials {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn handle_request(&self, ctx: &mut Context) -> Result<TokenResult> {
        let client = authenticate(ctx, Self::NAME)?;
        let scope = ctx.scope().map(|scope| scope.into_owned());

        debug!(client_id = %client.client_id, "issuing client credentials token");
        let handler = ctx.data_handler();
        let info = handler.create_or_update_auth_info(&client.client_id, "", scope.as_deref())?;
        let info = handler.create_access_token(&info, client.secret_type.as_deref())?;

        TokenResult::from_auth_info(info, client.secret_type)
    }
}
