//! Records a data handler persists on behalf of the token endpoint.
use chrono::Utc;
use url::Url;

use super::Time;

/// Links a client, a user and a scope to the tokens issued for them.
///
/// The record is owned by the data handler. The endpoint only asks for records to be created,
/// looked up, refreshed and reads back their fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthInfo {
    /// Identifies the record within its data handler.
    pub id: String,

    /// The client the grant was issued to.
    pub client_id: String,

    /// The user that authorized the grant, empty for client credentials.
    pub user_id: String,

    /// The scope requested for the grant, if any.
    pub scope: Option<String>,

    /// The authorization code this record was created from.
    pub code: Option<String>,

    /// The redirection uri the authorization code was bound to.
    pub redirect_uri: Option<Url>,

    /// Until when the authorization code can be exchanged.
    pub until: Option<Time>,

    /// The current refresh token.
    ///
    /// Rotated whenever the record is refreshed or updated.
    pub refresh_token: Option<String>,

    /// The most recently issued access token.
    pub access_token: Option<AccessToken>,
}

/// An access token and its optional companion secret.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessToken {
    /// The token string presented by the client.
    pub token: String,

    /// The signing secret, only when a secret type was requested.
    pub secret: Option<String>,

    /// The algorithm of the secret, for example `hmac-sha256`.
    pub secret_type: Option<String>,

    /// The lifetime in seconds, if the token expires.
    pub expires_in: Option<i64>,

    /// Creation timestamp (Utc).
    pub created_on: Time,
}

impl AuthInfo {
    /// A fresh record without any issued tokens.
    pub fn new(id: String, client_id: String, user_id: String, scope: Option<String>) -> Self {
        AuthInfo {
            id,
            client_id,
            user_id,
            scope,
            code: None,
            redirect_uri: None,
            until: None,
            refresh_token: None,
            access_token: None,
        }
    }

    /// Whether the record was issued to this client.
    pub fn belongs_to(&self, client_id: &str) -> bool {
        self.client_id == client_id
    }

    /// Whether the authorization code of this record is past its deadline.
    pub fn code_expired(&self) -> bool {
        self.until.map_or(false, |until| until < Utc::now())
    }
}
