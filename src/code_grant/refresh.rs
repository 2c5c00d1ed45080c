//! Retrieve a refreshed access token.
use tracing::debug;

use crate::endpoint::Context;

use super::action::{authenticate, required, GrantAction, TokenResult};
use super::error::{Result, ServerError};

/// Trades a refresh token for a new access token.
///
/// This has four basic phases:
/// 1. Authenticate the client
/// 2. Recover the record of the refresh token
/// 3. Check that it belongs to the authenticated client
/// 4. Rotate the refresh token and issue a new access token
#[derive(Clone, Copy, Debug, Default)]
pub struct RefreshToken;

impl RefreshToken {
    /// The grant type this action answers to.
    pub const NAME: &'static str = "refresh_token";
}

impl GrantAction for RefreshToken {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn handle_request(&self, ctx: &mut Context) -> Result<TokenResult> {
        let client = authenticate(ctx, Self::NAME)?;
        let refresh_token = required(ctx.refresh_token(), "refresh_token")?;

        let handler = ctx.data_handler();
        let info = handler
            .get_auth_info_by_refresh_token(&refresh_token)?
            .ok_or_else(|| ServerError::invalid_grant("refresh token is invalid"))?;

        // Same answer as for an unknown token, the holder learns nothing about other clients.
        if !info.belongs_to(&client.client_id) {
            debug!(client_id = %client.client_id, "refresh token of another client presented");
            return Err(ServerError::invalid_grant("refresh token is invalid").into());
        }

        let info = handler.refresh_auth_info(&info)?;
        let info = handler.create_access_token(&info, client.secret_type.as_deref())?;

        TokenResult::from_auth_info(info, client.secret_type)
    }
}
