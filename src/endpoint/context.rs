use std::borrow::Cow;

use crate::primitives::handler::DataHandler;

use super::query::QueryParameter;

/// Everything a grant action may look at while handling one request.
///
/// Bundles the request parameters with the data handler created for this request. Parameters are
/// read-only; the only mutable part is the handler itself. A context is created by the token
/// endpoint on entry and dropped once the action returns, it is never shared between requests.
pub struct Context<'r> {
    params: &'r dyn QueryParameter,
    basic: Option<BasicCredentials<'r>>,
    handler: &'r mut dyn DataHandler,
}

/// Client credentials taken from an `Authorization: Basic` header.
#[derive(Clone, Copy, Debug)]
pub struct BasicCredentials<'r> {
    /// The user part of the header.
    pub client_id: &'r str,

    /// The password part of the header.
    pub client_secret: &'r str,
}

impl<'r> Context<'r> {
    /// Wrap the parameters of a request and the data handler created for it.
    pub fn new(params: &'r dyn QueryParameter, handler: &'r mut dyn DataHandler) -> Self {
        Context {
            params,
            basic: None,
            handler,
        }
    }

    /// Attach credentials of the authorization header.
    ///
    /// They are used only when the parameters do not contain `client_id` or `client_secret`.
    pub fn with_basic_credentials(mut self, basic: Option<BasicCredentials<'r>>) -> Self {
        self.basic = basic;
        self
    }

    /// Any parameter by name.
    pub fn param(&self, name: &str) -> Option<Cow<str>> {
        self.params.value(name)
    }

    /// The data handler of this request.
    pub fn data_handler(&mut self) -> &mut dyn DataHandler {
        &mut *self.handler
    }

    /// The requested grant type, parameter `type`.
    pub fn grant_type(&self) -> Option<Cow<str>> {
        self.param("type")
    }

    /// The requested body format, parameter `format`.
    pub fn format(&self) -> Option<Cow<str>> {
        self.param("format")
    }

    /// The client identifier, falling back to the authorization header.
    pub fn client_id(&self) -> Option<Cow<str>> {
        self.param("client_id")
            .or_else(|| self.basic.map(|basic| Cow::Borrowed(basic.client_id)))
    }

    /// The client secret, falling back to the authorization header.
    pub fn client_secret(&self) -> Option<Cow<str>> {
        self.param("client_secret")
            .or_else(|| self.basic.map(|basic| Cow::Borrowed(basic.client_secret)))
    }

    /// The algorithm requested for a companion secret.
    pub fn secret_type(&self) -> Option<Cow<str>> {
        self.param("secret_type")
    }

    /// The requested scope.
    pub fn scope(&self) -> Option<Cow<str>> {
        self.param("scope")
    }

    /// The authorization code being exchanged.
    pub fn code(&self) -> Option<Cow<str>> {
        self.param("code")
    }

    /// The redirection uri the code was requested with.
    pub fn redirect_uri(&self) -> Option<Cow<str>> {
        self.param("redirect_uri")
    }

    /// The refresh token being exchanged.
    pub fn refresh_token(&self) -> Option<Cow<str>> {
        self.param("refresh_token")
    }

    /// Resource owner name for the password grant.
    pub fn username(&self) -> Option<Cow<str>> {
        self.param("username")
    }

    /// Resource owner password for the password grant.
    pub fn password(&self) -> Option<Cow<str>> {
        self.param("password")
    }

    /// Opaque client state of the authorization request.
    pub fn state(&self) -> Option<Cow<str>> {
        self.param("state")
    }

    /// Whether the client asked for an answer without owner interaction.
    pub fn immediate(&self) -> Option<Cow<str>> {
        self.param("immediate")
    }
}
