use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use oxide_token::endpoint::{Flow, FlowRegistry, ResponseStatus, TokenEndpoint};
use oxide_token::frontends::simple::request::Request;
use oxide_token::primitives::memory::MemoryStore;

fn store() -> Arc<MemoryStore> {
    let mut store = MemoryStore::new();
    store.support_secret_type("hmac-sha256");
    store.register_client("foo", "bar").unwrap();
    store.register_user("alice", "wonderland", "user-1").unwrap();
    Arc::new(store)
}

fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).expect("Body should be json")
}

#[test]
fn concurrent_requests_receive_distinct_tokens() {
    let store = store();
    let factory_store = store.clone();
    let endpoint = Arc::new(TokenEndpoint::new(
        FlowRegistry::default_flows(),
        move || factory_store.handler(),
    ));

    let workers: Vec<_> = (0..8)
        .map(|_| {
            let endpoint = endpoint.clone();
            thread::spawn(move || {
                let params = params(&[
                    ("type", "password"),
                    ("client_id", "foo"),
                    ("client_secret", "bar"),
                    ("username", "alice"),
                    ("password", "wonderland"),
                ]);
                let response = endpoint.handle_request(&params, None).unwrap();
                assert_eq!(response.status, ResponseStatus::Ok);
                json(&response.body)["access_token"]
                    .as_str()
                    .unwrap()
                    .to_string()
            })
        })
        .collect();

    let mut tokens: Vec<String> = workers.into_iter().map(|w| w.join().unwrap()).collect();
    tokens.sort();
    tokens.dedup();
    assert_eq!(tokens.len(), 8);
}

#[test]
fn full_lifecycle_over_simple_frontend() {
    let store = store();
    let code = store
        .issue_code(
            "foo",
            "user-1",
            Some("read"),
            "https://client.example/cb".parse().unwrap(),
        )
        .unwrap();

    let factory_store = store.clone();
    let endpoint = TokenEndpoint::new(FlowRegistry::default_flows(), move || factory_store.handler());

    let mut request = Request::default();
    request.urlbody = params(&[
        ("type", "authorization_code"),
        ("code", code.as_str()),
        ("redirect_uri", "https://client.example/cb"),
        ("secret_type", "hmac-sha256"),
    ]);
    request.auth = Some(format!("Basic {}", base64::encode("foo:bar")));

    let response = match endpoint.execute(&mut request) {
        Ok(response) => response,
        Err(never) => never.into(),
    };
    assert_eq!(response.status, 200);
    let body = json(response.body.as_deref().unwrap());
    assert_eq!(body["secret_type"], "hmac-sha256");
    assert!(body["access_token_secret"].is_string());
    let refresh = body["refresh_token"].as_str().unwrap().to_string();

    let mut request = Request::default();
    request.urlbody = params(&[
        ("type", "refresh_token"),
        ("client_id", "foo"),
        ("client_secret", "bar"),
        ("refresh_token", refresh.as_str()),
        ("format", "form"),
    ]);
    let response = match endpoint.execute(&mut request) {
        Ok(response) => response,
        Err(never) => never.into(),
    };
    assert_eq!(response.status, 200);
    assert_eq!(
        response.content_type.as_deref(),
        Some("application/x-www-form-urlencoded")
    );

    // The refresh token was rotated by the previous request.
    let response = match endpoint.execute(&mut request) {
        Ok(response) => response,
        Err(never) => never.into(),
    };
    assert_eq!(response.status, 401);
}

#[test]
fn custom_registry_limits_grants() {
    let mut registry = FlowRegistry::new();
    registry.register("password", Flow::password());
    let store = store();
    let endpoint = TokenEndpoint::new(registry, move || store.handler()).standard_error_status(true);

    let response = endpoint
        .handle_request(
            &params(&[("type", "client_credentials"), ("client_id", "foo"), ("client_secret", "bar")]),
            None,
        )
        .unwrap();
    assert_eq!(response.status, ResponseStatus::BadRequest);
    assert_eq!(json(&response.body)["error"], "unsupported_grant_type");
}

#[test]
fn concurrent_refresh_redeems_once() {
    let store = store();
    let factory_store = store.clone();
    let endpoint = Arc::new(TokenEndpoint::new(
        FlowRegistry::default_flows(),
        move || factory_store.handler(),
    ));

    let issued = endpoint
        .handle_request(
            &params(&[("type", "client_credentials"), ("client_id", "foo"), ("client_secret", "bar")]),
            None,
        )
        .unwrap();
    let refresh = json(&issued.body)["refresh_token"].as_str().unwrap().to_string();

    let workers: Vec<_> = (0..8)
        .map(|_| {
            let endpoint = endpoint.clone();
            let refresh = refresh.clone();
            thread::spawn(move || {
                let params = params(&[
                    ("type", "refresh_token"),
                    ("client_id", "foo"),
                    ("client_secret", "bar"),
                    ("refresh_token", refresh.as_str()),
                ]);
                endpoint.handle_request(&params, None).unwrap()
            })
        })
        .collect();

    let responses: Vec<_> = workers.into_iter().map(|w| w.join().unwrap()).collect();
    let redeemed = responses
        .iter()
        .filter(|response| response.status == ResponseStatus::Ok)
        .count();
    assert_eq!(redeemed, 1);
    for response in responses.iter().filter(|r| r.status != ResponseStatus::Ok) {
        assert_eq!(json(&response.body)["error"], "invalid_grant");
    }
}
