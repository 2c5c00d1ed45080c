//! Available grant actions.
//!
//! Each action codifies the checks of one grant type into a strategy that can be registered in a
//! [`Flow`]. The result of an action is an abstract [`TokenResult`] or an [`Error`], which the
//! [`TokenEndpoint`] then relays to the client in the requested format.
//!
//! ## Usage
//!
//! For all purposes that offer the token endpoint over the network, you should probably have a
//! look at the encapsulation provided by [`endpoint`] instead. Custom grant types implement
//! [`GrantAction`] and reuse [`authenticate`] to get the same order of client checks:
//!
//! ```
//! use oxide_token::code_grant::action::{authenticate, GrantAction, TokenResult};
//! use oxide_token::code_grant::error::Result;
//! use oxide_token::endpoint::Context;
//!
//! struct Device;
//!
//! impl GrantAction for Device {
//!     fn name(&self) -> &str {
//!         "device_code"
//!     }
//!
//!     fn handle_request(&self, ctx: &mut Context) -> Result<TokenResult> {
//!         let client = authenticate(ctx, self.name())?;
//!         let handler = ctx.data_handler();
//!         let info = handler.create_or_update_auth_info(&client.client_id, "device", None)?;
//!         let info = handler.create_access_token(&info, client.secret_type.as_deref())?;
//!         TokenResult::from_auth_info(info, client.secret_type)
//!     }
//! }
//! ```
//!
//! [`Flow`]: ../endpoint/struct.Flow.html
//! [`TokenResult`]: action/struct.TokenResult.html
//! [`Error`]: error/enum.Error.html
//! [`TokenEndpoint`]: ../endpoint/struct.TokenEndpoint.html
//! [`endpoint`]: ../endpoint/index.html
//! [`GrantAction`]: action/trait.GrantAction.html
//! [`authenticate`]: action/fn.authenticate.html

pub mod action;
pub mod authorization_code;
pub mod client_credentials;
pub mod error;
pub mod password;
pub mod refresh;
