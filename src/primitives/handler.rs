//! The storage and credential collaborator of the token endpoint.
//!
//! Every read or write of authorization records goes through a [`DataHandler`]. A fresh instance
//! is requested from a [`DataHandlerFactory`] for each incoming request so that an implementation
//! may keep request scoped state, such as a cache of lookups or an open transaction.
//!
//! [`DataHandler`]: trait.DataHandler.html
//! [`DataHandlerFactory`]: trait.DataHandlerFactory.html
use crate::code_grant::error::Result;

use super::auth_info::AuthInfo;

/// Credential lookups and token mutations requested by grant actions.
///
/// Any method may fail. A [`ServerError`] (for example `InvalidGrant` for a revoked code) is
/// reported to the client as is, while [`Error::Internal`] aborts the request without detail.
///
/// [`ServerError`]: ../../code_grant/error/struct.ServerError.html
/// [`Error::Internal`]: ../../code_grant/error/enum.Error.html#variant.Internal
pub trait DataHandler {
    /// The registered secret of a client, `None` for unknown clients.
    fn get_client_secret(&mut self, client_id: &str) -> Result<Option<String>>;

    /// Check a client id and secret pair for use with a grant type.
    ///
    /// Must answer `false` both for unknown clients and for wrong secrets.
    fn validate_client(&mut self, client_id: &str, client_secret: &str, grant_type: &str) -> Result<bool>;

    /// Whether tokens with a companion secret of this type can be issued.
    fn supports_secret_type(&mut self, secret_type: &str) -> Result<bool>;

    /// Find the record of a client and user, creating it if necessary.
    ///
    /// The `user_id` is empty for the client credentials grant.
    fn create_or_update_auth_info(
        &mut self, client_id: &str, user_id: &str, scope: Option<&str>,
    ) -> Result<AuthInfo>;

    /// Issue a new access token for the record.
    ///
    /// A secret of `secret_type` accompanies the token when requested. The returned record has
    /// `access_token` set.
    fn create_access_token(&mut self, auth_info: &AuthInfo, secret_type: Option<&str>) -> Result<AuthInfo>;

    /// Rotate the refresh token of a record, invalidating the previous one.
    fn refresh_auth_info(&mut self, auth_info: &AuthInfo) -> Result<AuthInfo>;

    /// Find the record a refresh token belongs to.
    fn get_auth_info_by_refresh_token(&mut self, refresh_token: &str) -> Result<Option<AuthInfo>>;

    /// Find the record an authorization code was issued for.
    fn get_auth_info_by_code(&mut self, code: &str) -> Result<Option<AuthInfo>>;

    /// Authenticate a resource owner, returning their user id.
    fn get_user_id(&mut self, username: &str, password: &str) -> Result<Option<String>>;
}

/// Creates the data handler for a single request.
///
/// Implemented for all `Fn() -> H` closures.
pub trait DataHandlerFactory {
    /// The handler type created.
    type Handler: DataHandler;

    /// Create a handler that is used for exactly one request.
    fn create(&self) -> Self::Handler;
}

impl<F, H> DataHandlerFactory for F
where
    F: Fn() -> H,
    H: DataHandler,
{
    type Handler = H;

    fn create(&self) -> H {
        self()
    }
}

impl<'s, D: DataHandler + ?Sized> DataHandler for &'s mut D {
    fn get_client_secret(&mut self, client_id: &str) -> Result<Option<String>> {
        (**self).get_client_secret(client_id)
    }

    fn validate_client(&mut self, client_id: &str, client_secret: &str, grant_type: &str) -> Result<bool> {
        (**self).validate_client(client_id, client_secret, grant_type)
    }

    fn supports_secret_type(&mut self, secret_type: &str) -> Result<bool> {
        (**self).supports_secret_type(secret_type)
    }

    fn create_or_update_auth_info(
        &mut self, client_id: &str, user_id: &str, scope: Option<&str>,
    ) -> Result<AuthInfo> {
        (**self).create_or_update_auth_info(client_id, user_id, scope)
    }

    fn create_access_token(&mut self, auth_info: &AuthInfo, secret_type: Option<&str>) -> Result<AuthInfo> {
        (**self).create_access_token(auth_info, secret_type)
    }

    fn refresh_auth_info(&mut self, auth_info: &AuthInfo) -> Result<AuthInfo> {
        (**self).refresh_auth_info(auth_info)
    }

    fn get_auth_info_by_refresh_token(&mut self, refresh_token: &str) -> Result<Option<AuthInfo>> {
        (**self).get_auth_info_by_refresh_token(refresh_token)
    }

    fn get_auth_info_by_code(&mut self, code: &str) -> Result<Option<AuthInfo>> {
        (**self).get_auth_info_by_code(code)
    }

    fn get_user_id(&mut self, username: &str, password: &str) -> Result<Option<String>> {
        (**self).get_user_id(username, password)
    }
}

impl<D: DataHandler + ?Sized> DataHandler for Box<D> {
    fn get_client_secret(&mut self, client_id: &str) -> Result<Option<String>> {
        (**self).get_client_secret(client_id)
    }

    fn validate_client(&mut self, client_id: &str, client_secret: &str, grant_type: &str) -> Result<bool> {
        (**self).validate_client(client_id, client_secret, grant_type)
    }

    fn supports_secret_type(&mut self, secret_type: &str) -> Result<bool> {
        (**self).supports_secret_type(secret_type)
    }

    fn create_or_update_auth_info(
        &mut self, client_id: &str, user_id: &str, scope: Option<&str>,
    ) -> Result<AuthInfo> {
        (**self).create_or_update_auth_info(client_id, user_id, scope)
    }

    fn create_access_token(&mut self, auth_info: &AuthInfo, secret_type: Option<&str>) -> Result<AuthInfo> {
        (**self).create_access_token(auth_info, secret_type)
    }

    fn refresh_auth_info(&mut self, auth_info: &AuthInfo) -> Result<AuthInfo> {
        (**self).refresh_auth_info(auth_info)
    }

    fn get_auth_info_by_refresh_token(&mut self, refresh_token: &str) -> Result<Option<AuthInfo>> {
        (**self).get_auth_info_by_refresh_token(refresh_token)
    }

    fn get_auth_info_by_code(&mut self, code: &str) -> Result<Option<AuthInfo>> {
        (**self).get_auth_info_by_code(code)
    }

    fn get_user_id(&mut self, username: &str, password: &str) -> Result<Option<String>> {
        (**self).get_user_id(username, password)
    }
}
