use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::Value;

use crate::code_grant::error::{Error, Result};
use crate::primitives::auth_info::AuthInfo;
use crate::primitives::handler::DataHandler;
use crate::primitives::generator::TokenGenerator;
use crate::primitives::memory::{MemoryHandler, MemoryStore};

use super::*;
use self::defaults::*;

/// Predictable tokens, `{prefix}{n}` for a running counter.
struct TestGenerator {
    prefix: &'static str,
    counter: AtomicUsize,
}

impl TestGenerator {
    fn new(prefix: &'static str) -> Self {
        TestGenerator {
            prefix,
            counter: AtomicUsize::new(0),
        }
    }
}

impl TokenGenerator for TestGenerator {
    fn generate(&self) -> Result<String> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        Ok(format!("{}{}", self.prefix, n))
    }
}

/// A data handler whose storage is unreachable.
struct Offline;

impl DataHandler for Offline {
    fn get_client_secret(&mut self, _: &str) -> Result<Option<String>> {
        Err(Error::internal("storage offline"))
    }

    fn validate_client(&mut self, _: &str, _: &str, _: &str) -> Result<bool> {
        Err(Error::internal("storage offline"))
    }

    fn supports_secret_type(&mut self, _: &str) -> Result<bool> {
        Err(Error::internal("storage offline"))
    }

    fn create_or_update_auth_info(&mut self, _: &str, _: &str, _: Option<&str>) -> Result<AuthInfo> {
        Err(Error::internal("storage offline"))
    }

    fn create_access_token(&mut self, _: &AuthInfo, _: Option<&str>) -> Result<AuthInfo> {
        Err(Error::internal("storage offline"))
    }

    fn refresh_auth_info(&mut self, _: &AuthInfo) -> Result<AuthInfo> {
        Err(Error::internal("storage offline"))
    }

    fn get_auth_info_by_refresh_token(&mut self, _: &str) -> Result<Option<AuthInfo>> {
        Err(Error::internal("storage offline"))
    }

    fn get_auth_info_by_code(&mut self, _: &str) -> Result<Option<AuthInfo>> {
        Err(Error::internal("storage offline"))
    }

    fn get_user_id(&mut self, _: &str, _: &str) -> Result<Option<String>> {
        Err(Error::internal("storage offline"))
    }
}

struct TokenSetup {
    store: Arc<MemoryStore>,
    registry: Arc<FlowRegistry>,
}

impl TokenSetup {
    fn new() -> Self {
        TokenSetup::with_registry(FlowRegistry::default_flows())
    }

    fn with_registry(registry: FlowRegistry) -> Self {
        TokenSetup::with_store(TokenSetup::example_store(), registry)
    }

    fn example_store() -> MemoryStore {
        let mut store = MemoryStore::with_generator(TestGenerator::new("Token"));
        store.support_secret_type(EXAMPLE_SECRET_TYPE);
        store
            .register_client(EXAMPLE_CLIENT_ID, EXAMPLE_PASSPHRASE)
            .unwrap();
        store
            .register_user(EXAMPLE_USERNAME, EXAMPLE_PASSWORD, EXAMPLE_OWNER_ID)
            .unwrap();
        store
    }

    fn with_store(store: MemoryStore, registry: FlowRegistry) -> Self {
        TokenSetup {
            store: Arc::new(store),
            registry: Arc::new(registry),
        }
    }

    fn endpoint(&self) -> TokenEndpoint<impl Fn() -> MemoryHandler> {
        let store = self.store.clone();
        TokenEndpoint::new(self.registry.clone(), move || store.handler())
    }

    fn request(&self, params: &[(&str, &str)]) -> Response {
        let params = params.iter().to_single_value_query();
        self.endpoint()
            .handle_request(&params, None)
            .expect("Request should not fail internally")
    }

    fn assert_ok(&self, params: &[(&str, &str)]) -> Value {
        let response = self.request(params);
        assert_eq!(response.status, ResponseStatus::Ok, "{}", response.body);
        body_of(&response)
    }

    fn assert_error(&self, params: &[(&str, &str)], code: &str) -> Value {
        let response = self.request(params);
        assert_eq!(response.status, ResponseStatus::Unauthorized, "{}", response.body);
        let body = body_of(&response);
        assert_eq!(body["error"], code, "{}", response.body);
        body
    }
}

fn body_of(response: &Response) -> Value {
    assert_eq!(response.content_type, "application/json");
    serde_json::from_str(&response.body).expect("Body should be json")
}

fn token_of(body: &Value) -> (String, String) {
    let access = body["access_token"].as_str().expect("No access token");
    let refresh = body["refresh_token"].as_str().expect("No refresh token");
    (access.to_string(), refresh.to_string())
}

trait ToSingleValueQuery {
    fn to_single_value_query(self) -> HashMap<String, String>;
}

impl<'r, I, K, V> ToSingleValueQuery for I
where
    I: Iterator<Item = &'r (K, V)>,
    K: AsRef<str> + 'r,
    V: AsRef<str> + 'r,
{
    fn to_single_value_query(self) -> HashMap<String, String> {
        self.map(|&(ref k, ref v)| (k.as_ref().to_string(), v.as_ref().to_string()))
            .collect()
    }
}

pub mod defaults {
    pub const EXAMPLE_CLIENT_ID: &str = "ClientId";
    pub const EXAMPLE_OWNER_ID: &str = "Owner";
    pub const EXAMPLE_PASSPHRASE: &str = "VGhpcyBpcyBhIHZlcnkgc2VjdXJlIHBhc3NwaHJhc2UK";
    pub const EXAMPLE_REDIRECT_URI: &str = "https://client.example/endpoint";
    pub const EXAMPLE_SCOPE: &str = "example default";
    pub const EXAMPLE_SECRET_TYPE: &str = "hmac-sha256";
    pub const EXAMPLE_USERNAME: &str = "alice";
    pub const EXAMPLE_PASSWORD: &str = "wonderland";
}

mod authorization_code;
