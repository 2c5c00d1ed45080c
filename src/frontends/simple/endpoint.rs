//! Drives the token endpoint from a web request.
use std::borrow::Cow;
use std::str::from_utf8;

use tracing::{debug, error};

use crate::code_grant::error::{Error, ServerError};
use crate::endpoint::{BasicCredentials, Response, TokenEndpoint};
use crate::primitives::handler::DataHandlerFactory;

use super::{WebRequest, WebResponse};

/// The status of answers to faults that were not the client's.
pub const INTERNAL_ERROR: u16 = 500;

struct Authorization(String, String);

struct Invalid;

impl<F: DataHandlerFactory> TokenEndpoint<F> {
    /// Answer a token request of a web server.
    ///
    /// Parameters are read from the urlencoded body, the url query is consulted only when the
    /// body is empty. Client credentials may be passed as `Authorization: Basic`. Faults of the
    /// data handler are logged and answered with a bare 500, the client learns nothing about
    /// them.
    pub fn execute<R>(&self, request: &mut R) -> Result<R::Response, R::Error>
    where
        R: WebRequest,
        R::Response: Default,
    {
        let header = request.authheader()?.map(Cow::into_owned);
        let body = request.urlbody()?.into_owned();
        let params = if body.is_empty() {
            request.query()?.into_owned()
        } else {
            body
        };

        let response = R::Response::default();

        let authorization = match header.as_deref().map(parse_header) {
            None => None,
            Some(Ok(authorization)) => Some(authorization),
            Some(Err(Invalid)) => {
                debug!("malformed authorization header");
                let answer = self.reject_request(&params, &ServerError::invalid_client());
                return finish(answer, response);
            }
        };

        let basic = authorization.as_ref().map(|auth| BasicCredentials {
            client_id: &auth.0,
            client_secret: &auth.1,
        });

        let answer = self.handle_request(&params, basic);
        finish(answer, response)
    }
}

fn finish<W: WebResponse>(answer: Result<Response, Error>, mut response: W) -> Result<W, W::Error> {
    match answer {
        Ok(answer) => {
            write(&answer, &mut response)?;
        }
        Err(err) => {
            error!(error = ?err, "token endpoint failed");
            response.status(INTERNAL_ERROR)?;
        }
    }

    Ok(response)
}

fn write<W: WebResponse>(answer: &Response, response: &mut W) -> Result<(), W::Error> {
    response.status(answer.status.as_u16())?;
    for (name, value) in &answer.headers {
        response.header(name, value)?;
    }
    response.body(&answer.content_type, &answer.body)
}

fn parse_header(header: &str) -> Result<Authorization, Invalid> {
    if !header.starts_with("Basic ") {
        return Err(Invalid);
    }

    let combined = match base64::decode(&header[6..]) {
        Err(_) => return Err(Invalid),
        Ok(vec) => vec,
    };

    let mut split = combined.splitn(2, |&c| c == b':');
    let client_bin = match split.next() {
        None => return Err(Invalid),
        Some(client) => client,
    };
    let passwd_bin = match split.next() {
        None => return Err(Invalid),
        Some(passwd) => passwd,
    };

    match (from_utf8(client_bin), from_utf8(passwd_bin)) {
        (Ok(client), Ok(passwd)) => Ok(Authorization(client.to_string(), passwd.to_string())),
        _ => Err(Invalid),
    }
}
