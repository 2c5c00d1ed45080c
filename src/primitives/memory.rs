//! A data handler keeping all records in memory.
//!
//! Intended for tests and prototyping. The [`MemoryStore`] is shared by all requests while each
//! request receives its own [`MemoryHandler`], a cheap handle onto the shared store:
//!
//! ```
//! # use std::sync::Arc;
//! use oxide_token::primitives::memory::MemoryStore;
//!
//! let mut store = MemoryStore::new();
//! store.support_secret_type("hmac-sha256");
//! store.register_client("foo", "bar").unwrap();
//!
//! let store = Arc::new(store);
//! let factory = move || store.handler();
//! # let _ = factory;
//! ```
//!
//! [`MemoryStore`]: struct.MemoryStore.html
//! [`MemoryHandler`]: struct.MemoryHandler.html
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{Duration, Utc};
use ring::constant_time::verify_slices_are_equal;
use url::Url;

use crate::code_grant::error::{Error, Result, ServerError};

use super::auth_info::{AccessToken, AuthInfo};
use super::generator::{RandomGenerator, TokenGenerator};
use super::handler::DataHandler;

/// Keeps clients, users and authorization records in hash maps.
pub struct MemoryStore {
    duration: Duration,
    code_duration: Duration,
    secret_types: HashSet<String>,
    generator: Box<dyn TokenGenerator + Send + Sync>,
    state: RwLock<State>,
}

/// The per-request handle onto a shared `MemoryStore`.
#[derive(Clone)]
pub struct MemoryHandler {
    store: Arc<MemoryStore>,
}

#[derive(Default)]
struct State {
    clients: HashMap<String, RegisteredClient>,
    users: HashMap<String, RegisteredUser>,
    records: HashMap<String, AuthInfo>,
    by_owner: HashMap<(String, String), String>,
    by_refresh: HashMap<String, String>,
    by_code: HashMap<String, String>,
    next_id: u64,
}

struct RegisteredClient {
    secret: String,
    /// Restricts the grant types, `None` permits all.
    grant_types: Option<HashSet<String>>,
}

struct RegisteredUser {
    password: String,
    user_id: String,
}

impl MemoryStore {
    /// An empty store issuing tokens valid for one hour.
    pub fn new() -> Self {
        MemoryStore::with_generator(RandomGenerator::new(16))
    }

    /// An empty store drawing its tokens from a custom generator.
    pub fn with_generator<G>(generator: G) -> Self
    where
        G: TokenGenerator + Send + Sync + 'static,
    {
        MemoryStore {
            duration: Duration::hours(1),
            code_duration: Duration::minutes(10),
            secret_types: HashSet::new(),
            generator: Box::new(generator),
            state: RwLock::new(State::default()),
        }
    }

    /// Set the validity of all issued access tokens to the specified duration.
    pub fn valid_for(&mut self, duration: Duration) {
        self.duration = duration;
    }

    /// Set how long authorization codes can be exchanged after they were issued.
    pub fn code_valid_for(&mut self, duration: Duration) {
        self.code_duration = duration;
    }

    /// Offer companion secrets of this type, for example `hmac-sha256`.
    pub fn support_secret_type(&mut self, secret_type: &str) {
        self.secret_types.insert(secret_type.to_string());
    }

    /// Register a confidential client usable with every grant type.
    pub fn register_client(&self, client_id: &str, secret: &str) -> Result<()> {
        self.insert_client(client_id, secret, None)
    }

    /// Register a client restricted to some grant types.
    pub fn register_client_for<'a, I>(&self, client_id: &str, secret: &str, grant_types: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let grant_types = grant_types.into_iter().map(str::to_string).collect();
        self.insert_client(client_id, secret, Some(grant_types))
    }

    /// Register a resource owner for the password grant.
    pub fn register_user(&self, username: &str, password: &str, user_id: &str) -> Result<()> {
        self.write()?.users.insert(
            username.to_string(),
            RegisteredUser {
                password: password.to_string(),
                user_id: user_id.to_string(),
            },
        );
        Ok(())
    }

    /// Record an authorization code, as the authorization endpoint would after owner consent.
    ///
    /// Codes can be exchanged exactly once, and only before they expire.
    pub fn issue_code(
        &self, client_id: &str, user_id: &str, scope: Option<&str>, redirect_uri: Url,
    ) -> Result<String> {
        let code = self.generator.generate()?;
        let mut state = self.write()?;
        let id = state.next_id();
        let mut record = AuthInfo::new(
            id.clone(),
            client_id.to_string(),
            user_id.to_string(),
            scope.map(str::to_string),
        );
        record.code = Some(code.clone());
        record.redirect_uri = Some(redirect_uri);
        record.until = Some(Utc::now() + self.code_duration);
        state.by_code.insert(code.clone(), id.clone());
        state.records.insert(id, record);
        Ok(code)
    }

    /// Unconditionally delete the record a refresh token belongs to.
    pub fn revoke(&self, refresh_token: &str) -> Result<()> {
        let mut state = self.write()?;
        if let Some(id) = state.by_refresh.remove(refresh_token) {
            state.remove_record(&id);
        }
        Ok(())
    }

    /// Create a handle for a single request.
    pub fn handler(self: &Arc<Self>) -> MemoryHandler {
        MemoryHandler { store: self.clone() }
    }

    fn insert_client(&self, client_id: &str, secret: &str, grant_types: Option<HashSet<String>>) -> Result<()> {
        self.write()?.clients.insert(
            client_id.to_string(),
            RegisteredClient {
                secret: secret.to_string(),
                grant_types,
            },
        );
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<State>> {
        self.state
            .read()
            .map_err(|_| Error::internal("memory store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<State>> {
        self.state
            .write()
            .map_err(|_| Error::internal("memory store lock poisoned"))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore::new()
    }
}

impl State {
    fn next_id(&mut self) -> String {
        self.next_id += 1;
        self.next_id.to_string()
    }

    /// Swap the refresh token of a record.
    fn rotate_refresh(&mut self, id: &str, refresh: String) -> Result<AuthInfo> {
        let record = self
            .records
            .get_mut(id)
            .ok_or_else(|| ServerError::invalid_grant("authorization no longer exists"))?;
        if let Some(old) = record.refresh_token.replace(refresh.clone()) {
            self.by_refresh.remove(&old);
        }
        let record = record.clone();
        self.by_refresh.insert(refresh, id.to_string());
        Ok(record)
    }

    /// Rotate only while `expected` is still the current refresh token of the record.
    fn rotate_refresh_from(&mut self, id: &str, expected: Option<&String>, refresh: String) -> Result<AuthInfo> {
        let current = self.records.get(id).and_then(|record| record.refresh_token.as_ref());
        if current.is_none() || current != expected {
            return Err(ServerError::invalid_grant("refresh token was already used").into());
        }
        self.rotate_refresh(id, refresh)
    }

    fn lookup(&self, index: &HashMap<String, String>, key: &str) -> Option<AuthInfo> {
        index.get(key).and_then(|id| self.records.get(id)).cloned()
    }

    fn remove_record(&mut self, id: &str) {
        if let Some(record) = self.records.remove(id) {
            if let Some(code) = &record.code {
                self.by_code.remove(code);
            }
            if let Some(refresh) = &record.refresh_token {
                self.by_refresh.remove(refresh);
            }
            let owner = (record.client_id, record.user_id);
            if self.by_owner.get(&owner).map(String::as_str) == Some(id) {
                self.by_owner.remove(&owner);
            }
        }
    }
}

fn secrets_match(expected: &str, given: &str) -> bool {
    verify_slices_are_equal(expected.as_bytes(), given.as_bytes()).is_ok()
}

impl DataHandler for MemoryHandler {
    fn get_client_secret(&mut self, client_id: &str) -> Result<Option<String>> {
        let state = self.store.read()?;
        Ok(state.clients.get(client_id).map(|client| client.secret.clone()))
    }

    fn validate_client(&mut self, client_id: &str, client_secret: &str, grant_type: &str) -> Result<bool> {
        let state = self.store.read()?;
        let client = match state.clients.get(client_id) {
            None => return Ok(false),
            Some(client) => client,
        };

        let permitted = client
            .grant_types
            .as_ref()
            .map_or(true, |types| types.contains(grant_type));
        Ok(secrets_match(&client.secret, client_secret) && permitted)
    }

    fn supports_secret_type(&mut self, secret_type: &str) -> Result<bool> {
        Ok(self.store.secret_types.contains(secret_type))
    }

    fn create_or_update_auth_info(
        &mut self, client_id: &str, user_id: &str, scope: Option<&str>,
    ) -> Result<AuthInfo> {
        let refresh = self.store.generator.generate()?;
        let mut state = self.store.write()?;
        let owner = (client_id.to_string(), user_id.to_string());

        let existing = state.by_owner.get(&owner).cloned();
        let id = match existing {
            Some(id) => id,
            None => {
                let id = state.next_id();
                let record = AuthInfo::new(id.clone(), owner.0.clone(), owner.1.clone(), None);
                state.records.insert(id.clone(), record);
                state.by_owner.insert(owner, id.clone());
                id
            }
        };

        if let Some(record) = state.records.get_mut(&id) {
            record.scope = scope.map(str::to_string);
        }

        state.rotate_refresh(&id, refresh)
    }

    fn create_access_token(&mut self, auth_info: &AuthInfo, secret_type: Option<&str>) -> Result<AuthInfo> {
        let token = self.store.generator.generate()?;
        let secret = match secret_type {
            Some(_) => Some(self.store.generator.generate()?),
            None => None,
        };
        // Records created from a code receive their first refresh token on exchange.
        let refresh = match (&auth_info.code, &auth_info.refresh_token) {
            (Some(_), None) => Some(self.store.generator.generate()?),
            _ => None,
        };

        let mut state = self.store.write()?;
        let record = state
            .records
            .get_mut(&auth_info.id)
            .ok_or_else(|| ServerError::invalid_grant("authorization no longer exists"))?;

        if auth_info.code.is_some() && record.code != auth_info.code {
            return Err(ServerError::invalid_grant("authorization code was already used").into());
        }

        if auth_info.code.is_some() && record.code_expired() {
            return Err(ServerError::invalid_grant("authorization code has expired").into());
        }

        record.access_token = Some(AccessToken {
            token,
            secret,
            secret_type: secret_type.map(str::to_string),
            expires_in: Some(self.store.duration.num_seconds()),
            created_on: Utc::now(),
        });

        // An authorization code is spent once it has been exchanged.
        let spent = record.code.take();
        let record = record.clone();
        if let Some(code) = spent {
            state.by_code.remove(&code);
        }

        match refresh {
            Some(refresh) => state.rotate_refresh(&auth_info.id, refresh),
            None => Ok(record),
        }
    }

    fn refresh_auth_info(&mut self, auth_info: &AuthInfo) -> Result<AuthInfo> {
        let refresh = self.store.generator.generate()?;
        self.store
            .write()?
            .rotate_refresh_from(&auth_info.id, auth_info.refresh_token.as_ref(), refresh)
    }

    fn get_auth_info_by_refresh_token(&mut self, refresh_token: &str) -> Result<Option<AuthInfo>> {
        let state = self.store.read()?;
        Ok(state.lookup(&state.by_refresh, refresh_token))
    }

    fn get_auth_info_by_code(&mut self, code: &str) -> Result<Option<AuthInfo>> {
        let state = self.store.read()?;
        Ok(state.lookup(&state.by_code, code))
    }

    fn get_user_id(&mut self, username: &str, password: &str) -> Result<Option<String>> {
        let state = self.store.read()?;
        Ok(state
            .users
            .get(username)
            .filter(|user| secrets_match(&user.password, password))
            .map(|user| user.user_id.clone()))
    }
}
