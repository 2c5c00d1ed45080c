//! Resource owner password credentials.
use crate::endpoint::Context;

use super::action::{authenticate, required, GrantAction, TokenResult};
use super::error::{Result, ServerError};

/// Issues a token for a user who handed their credentials to the client.
#[derive(Clone, Copy, Debug, Default)]
pub struct Password;

impl Password {
    /// The grant type this action answers to.
    pub const NAME: &'static str = "password";
}

impl GrantAction for Password {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn handle_request(&self, ctx: &mut Context) -> Result<TokenResult> {
        let client = authenticate(ctx, Self::NAME)?;
        let username = required(ctx.username(), "username")?;
        let password = required(ctx.password(), "password")?;
        let scope = ctx.scope().map(|scope| scope.into_owned());

        let handler = ctx.data_handler();
        let user_id = handler
            .get_user_id(&username, &password)?
            .ok_or_else(|| ServerError::invalid_grant("resource owner credentials are invalid"))?;

        let info = handler.create_or_update_auth_info(&client.client_id, &user_id, scope.as_deref())?;
        let info = handler.create_access_token(&info, client.secret_type.as_deref())?;

        TokenResult::from_auth_info(info, client.secret_type)
    }
}
