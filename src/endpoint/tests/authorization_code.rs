use chrono::Duration;

use super::defaults::*;
use super::*;

struct AccessTokenSetup {
    setup: TokenSetup,
    authtoken: String,
}

impl AccessTokenSetup {
    fn private_client() -> Self {
        AccessTokenSetup::with_setup(TokenSetup::new())
    }

    fn expired_code() -> Self {
        let mut store = TokenSetup::example_store();
        store.code_valid_for(Duration::seconds(-1));
        AccessTokenSetup::with_setup(TokenSetup::with_store(store, FlowRegistry::default_flows()))
    }

    fn with_setup(setup: TokenSetup) -> Self {
        let authtoken = setup
            .store
            .issue_code(
                EXAMPLE_CLIENT_ID,
                EXAMPLE_OWNER_ID,
                Some(EXAMPLE_SCOPE),
                EXAMPLE_REDIRECT_URI.parse().unwrap(),
            )
            .unwrap();

        AccessTokenSetup { setup, authtoken }
    }

    fn exchange(&self, grant_type: &'static str, redirect_uri: &'static str) -> Vec<(&'static str, String)> {
        vec![
            ("type", grant_type.to_string()),
            ("client_id", EXAMPLE_CLIENT_ID.to_string()),
            ("client_secret", EXAMPLE_PASSPHRASE.to_string()),
            ("code", self.authtoken.clone()),
            ("redirect_uri", redirect_uri.to_string()),
        ]
    }

    fn request(&self, params: &[(&str, String)]) -> Response {
        let params = params.iter().to_single_value_query();
        self.setup.endpoint().handle_request(&params, None).unwrap()
    }

    fn assert_success(&self, params: &[(&str, String)]) -> Value {
        let response = self.request(params);
        assert_eq!(response.status, ResponseStatus::Ok, "{}", response.body);
        body_of(&response)
    }

    fn assert_error(&self, params: &[(&str, String)], code: &str) -> Value {
        let response = self.request(params);
        assert_eq!(response.status, ResponseStatus::Unauthorized);
        let body = body_of(&response);
        assert_eq!(body["error"], code, "{}", response.body);
        body
    }
}

#[test]
fn access_valid_private() {
    let setup = AccessTokenSetup::private_client();
    let body = setup.assert_success(&setup.exchange("authorization_code", EXAMPLE_REDIRECT_URI));

    assert!(body["access_token"].is_string());
    assert!(body["refresh_token"].is_string());
    assert_eq!(body["expires_in"], 3600);
}

#[test]
fn access_legacy_web_server() {
    let setup = AccessTokenSetup::private_client();
    setup.assert_success(&setup.exchange("web_server", EXAMPLE_REDIRECT_URI));
}

#[test]
fn access_code_is_single_use() {
    let setup = AccessTokenSetup::private_client();
    let params = setup.exchange("authorization_code", EXAMPLE_REDIRECT_URI);
    setup.assert_success(&params);
    setup.assert_error(&params, "invalid_grant");
}

#[test]
fn access_then_refresh() {
    let setup = AccessTokenSetup::private_client();
    let body = setup.assert_success(&setup.exchange("authorization_code", EXAMPLE_REDIRECT_URI));
    let (_, refresh) = token_of(&body);

    let params = [
        ("type", "refresh_token".to_string()),
        ("client_id", EXAMPLE_CLIENT_ID.to_string()),
        ("client_secret", EXAMPLE_PASSPHRASE.to_string()),
        ("refresh_token", refresh),
    ];
    setup.assert_success(&params);
}

#[test]
fn access_redirect_compared_as_url() {
    let setup = AccessTokenSetup::private_client();
    setup.assert_success(&setup.exchange("authorization_code", "HTTPS://client.example/endpoint"));
}

#[test]
fn access_wrong_redirect() {
    let setup = AccessTokenSetup::private_client();
    setup.assert_error(
        &setup.exchange("authorization_code", "https://client.example/other"),
        "invalid_grant",
    );
    setup.assert_error(&setup.exchange("authorization_code", "not a url"), "invalid_grant");

    // A mismatch does not spend the code.
    setup.assert_success(&setup.exchange("authorization_code", EXAMPLE_REDIRECT_URI));
}

#[test]
fn access_unknown_code() {
    let setup = AccessTokenSetup::private_client();
    let mut params = setup.exchange("authorization_code", EXAMPLE_REDIRECT_URI);
    params[3].1 = "NotAnAuthorizationCode".to_string();
    setup.assert_error(&params, "invalid_grant");
}

#[test]
fn access_code_of_other_client() {
    let setup = AccessTokenSetup::private_client();
    setup
        .setup
        .store
        .register_client("SomeOtherClient", "OtherSecret")
        .unwrap();

    let mut params = setup.exchange("authorization_code", EXAMPLE_REDIRECT_URI);
    params[1].1 = "SomeOtherClient".to_string();
    params[2].1 = "OtherSecret".to_string();
    setup.assert_error(&params, "invalid_grant");
}

#[test]
fn access_missing_parameters() {
    let setup = AccessTokenSetup::private_client();

    let mut without_code = setup.exchange("authorization_code", EXAMPLE_REDIRECT_URI);
    without_code.remove(3);
    let body = setup.assert_error(&without_code, "invalid_request");
    assert_eq!(body["error_description"], "'code' not found");

    let mut without_redirect = setup.exchange("authorization_code", EXAMPLE_REDIRECT_URI);
    without_redirect.remove(4);
    let body = setup.assert_error(&without_redirect, "invalid_request");
    assert_eq!(body["error_description"], "'redirect_uri' not found");
}

#[test]
fn access_requires_authentication() {
    let setup = AccessTokenSetup::private_client();
    let mut params = setup.exchange("authorization_code", EXAMPLE_REDIRECT_URI);
    params[2].1 = "the wrong passphrase".to_string();
    setup.assert_error(&params, "invalid_client");
}

#[test]
fn access_expired_code() {
    let setup = AccessTokenSetup::expired_code();
    let body = setup.assert_error(
        &setup.exchange("authorization_code", EXAMPLE_REDIRECT_URI),
        "invalid_grant",
    );
    assert_eq!(body["error_description"], "authorization code has expired");
}
