use std::fmt;
use std::sync::Arc;

use crate::code_grant::action::GrantAction;
use crate::code_grant::authorization_code::AuthorizationCode;
use crate::code_grant::client_credentials::ClientCredentials;
use crate::code_grant::password::Password;
use crate::code_grant::refresh::RefreshToken;

/// A named group of grant actions.
///
/// Each action answers to the grant type it names. A flow holds at most one action per grant
/// type, adding a second one replaces the first.
#[derive(Clone)]
pub struct Flow {
    name: String,
    actions: Vec<Arc<dyn GrantAction>>,
}

/// All flows the token endpoint dispatches to.
///
/// Configured once at startup and read concurrently afterwards. Only grant types that appear in
/// one of the registered flows are accepted, no matter which actions exist in the crate.
#[derive(Clone, Default)]
pub struct FlowRegistry {
    flows: Vec<(String, Flow)>,
}

impl Flow {
    /// An empty flow.
    pub fn new<N: Into<String>>(name: N) -> Self {
        Flow {
            name: name.into(),
            actions: Vec::new(),
        }
    }

    /// The authorization code grant together with refreshing.
    pub fn authorization_code() -> Self {
        Flow::new("authorization_code")
            .with_action(AuthorizationCode::new())
            .with_action(RefreshToken)
    }

    /// The authorization code grant under its legacy name `web_server`.
    pub fn web_server() -> Self {
        Flow::new("web_server")
            .with_action(AuthorizationCode::web_server())
            .with_action(RefreshToken)
    }

    /// The client credentials grant together with refreshing.
    pub fn client_credentials() -> Self {
        Flow::new("client_credentials")
            .with_action(ClientCredentials)
            .with_action(RefreshToken)
    }

    /// The resource owner password grant together with refreshing.
    pub fn password() -> Self {
        Flow::new("password")
            .with_action(Password)
            .with_action(RefreshToken)
    }

    /// Add an action.
    pub fn with_action<A: GrantAction + 'static>(self, action: A) -> Self {
        self.with_shared_action(Arc::new(action))
    }

    /// Add an action that is also used by other flows.
    pub fn with_shared_action(mut self, action: Arc<dyn GrantAction>) -> Self {
        match self.position(action.name()) {
            Some(idx) => self.actions[idx] = action,
            None => self.actions.push(action),
        }
        self
    }

    /// The name of this flow.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The grant types this flow answers to, in the order they were added.
    pub fn action_names(&self) -> Vec<&str> {
        self.actions.iter().map(|action| action.name()).collect()
    }

    /// The action handling a grant type.
    pub fn action(&self, grant_type: &str) -> Option<&dyn GrantAction> {
        self.position(grant_type).map(|idx| &*self.actions[idx])
    }

    fn position(&self, grant_type: &str) -> Option<usize> {
        self.actions
            .iter()
            .position(|action| action.name() == grant_type)
    }
}

impl FlowRegistry {
    /// A registry without any flows, rejecting every grant type.
    pub fn new() -> Self {
        FlowRegistry::default()
    }

    /// The authorization code, legacy web server, client credentials and password flows.
    pub fn default_flows() -> Self {
        let mut registry = FlowRegistry::new();
        registry
            .register("authorization_code", Flow::authorization_code())
            .register("web_server", Flow::web_server())
            .register("client_credentials", Flow::client_credentials())
            .register("password", Flow::password());
        registry
    }

    /// Add a flow under a name.
    ///
    /// A flow registered under an existing name replaces the previous one but keeps its position
    /// in the lookup order.
    pub fn register<N: Into<String>>(&mut self, name: N, flow: Flow) -> &mut Self {
        let name = name.into();
        match self.flows.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = flow,
            None => self.flows.push((name, flow)),
        }
        self
    }

    /// The flow registered under a name.
    pub fn get_flow(&self, name: &str) -> Option<&Flow> {
        self.flows
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, flow)| flow)
    }

    /// The action of the first registered flow that answers to a grant type.
    pub fn find_action(&self, grant_type: &str) -> Option<&dyn GrantAction> {
        self.flows
            .iter()
            .find_map(|(_, flow)| flow.action(grant_type))
    }

    /// Names of all registered flows in lookup order.
    pub fn flow_names(&self) -> impl Iterator<Item = &str> {
        self.flows.iter().map(|(name, _)| name.as_str())
    }
}

impl fmt::Debug for Flow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Flow")
            .field("name", &self.name)
            .field("actions", &self.action_names())
            .finish()
    }
}

impl fmt::Debug for FlowRegistry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map()
            .entries(self.flows.iter().map(|(name, flow)| (name, flow)))
            .finish()
    }
}
