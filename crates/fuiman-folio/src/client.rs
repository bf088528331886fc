//! Blocking FOLIO client.

use std::cell::RefCell;

use fuiman_import::{
    Connection, Gateway, GatewayError, ImportRequest, ImportResponse, USER_IMPORT_PATH,
};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::SET_COOKIE;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::FolioConfig;
use crate::error::{FolioError, Result};

/// Login endpoint returning the access token as a cookie.
pub const LOGIN_PATH: &str = "/authn/login-with-expiry";
/// Session release endpoint.
pub const LOGOUT_PATH: &str = "/authn/logout";
/// Health endpoint answering `OK`.
pub const HEALTH_PATH: &str = "/admin/health";

/// Cookie carrying the access token.
pub const ACCESS_TOKEN_COOKIE: &str = "folioAccessToken";

const TENANT_HEADER: &str = "x-okapi-tenant";
const TOKEN_HEADER: &str = "x-okapi-token";

const INVALID_URL: &str = "Invalid FOLIO Url";
const UNHEALTHY: &str = "FOLIO health check did not report OK";

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

/// HTTP gateway to a FOLIO tenant.
#[derive(Debug)]
pub struct FolioClient {
    config: FolioConfig,
    client: Client,
}

impl FolioClient {
    pub fn new(config: FolioConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FolioError::Client(e.to_string()))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &FolioConfig {
        &self.config
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.client
            .post(self.config.url(path))
            .header(TENANT_HEADER, &self.config.tenant)
    }

    /// Sends the login request and returns the raw response.
    pub(crate) fn send_login(&self) -> std::result::Result<Response, reqwest::Error> {
        debug!(
            url = %self.config.url(LOGIN_PATH),
            username = %self.config.username,
            "Logging in"
        );
        self.post(LOGIN_PATH)
            .json(&Credentials {
                username: &self.config.username,
                password: &self.config.password,
            })
            .send()
    }

    /// Logs in and returns the access token.
    pub fn login(&self) -> std::result::Result<String, GatewayError> {
        let response = self.send_login().map_err(transport_error)?;
        let status = response.status().as_u16();
        let token = access_token(&response);

        match token {
            Some(token) if status == 201 => Ok(token),
            _ => {
                let body = response.text().unwrap_or_default();
                Err(GatewayError::Authentication(login_failure_reason(
                    status, &body,
                )))
            }
        }
    }

    /// Checks that the endpoint is a FOLIO instance accepting the credentials
    /// and reporting itself healthy.
    ///
    /// Returns a user-facing reason on failure: "Invalid FOLIO Url" when the
    /// host cannot be reached, "Invalid FOLIO Services Url" for a 405, the
    /// first error code FOLIO reports, or the health check failure.
    pub fn check_connectivity(&self) -> std::result::Result<(), String> {
        self.check_login()?;
        match self.health_check() {
            Ok(true) => Ok(()),
            Ok(false) => Err(UNHEALTHY.to_string()),
            Err(err) => Err(format!("FOLIO health check failed: {err}")),
        }
    }

    fn check_login(&self) -> std::result::Result<(), String> {
        let response = match self.send_login() {
            Ok(response) => response,
            Err(err) if err.is_connect() => {
                debug!(error = %err, "Could not reach FOLIO");
                return Err(INVALID_URL.to_string());
            }
            Err(err) => return Err(err.to_string()),
        };

        let status = response.status().as_u16();
        if let Some(token) = access_token(&response).filter(|_| status == 201) {
            // Release the session opened by the check.
            drop(FolioConnection::new(self, token));
            return Ok(());
        }

        let body = response.text().unwrap_or_default();
        Err(login_failure_reason(status, &body))
    }
}

impl Gateway for FolioClient {
    fn connect(&self) -> std::result::Result<Box<dyn Connection + '_>, GatewayError> {
        let token = self.login()?;
        debug!(tenant = %self.config.tenant, "Session opened");
        Ok(Box::new(FolioConnection::new(self, token)))
    }

    fn health_check(&self) -> std::result::Result<bool, GatewayError> {
        let response = self
            .client
            .get(self.config.url(HEALTH_PATH))
            .header(TENANT_HEADER, &self.config.tenant)
            .send()
            .map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(transport_error)?;
        if !(200..300).contains(&status) {
            return Err(GatewayError::from_status(status, body));
        }
        debug!(status, body = %body.trim(), "Health check");
        Ok(body.trim().trim_matches('"') == "OK")
    }
}

/// An authenticated session, logged out on drop.
///
/// A batch refused with 401 triggers one new login and a resend, since
/// access tokens expire during long imports.
pub struct FolioConnection<'c> {
    client: &'c FolioClient,
    token: RefCell<String>,
}

impl<'c> FolioConnection<'c> {
    fn new(client: &'c FolioClient, token: String) -> Self {
        Self {
            client,
            token: RefCell::new(token),
        }
    }

    fn post(&self, path: &str) -> RequestBuilder {
        let token = self.token.borrow();
        self.client.post(path).header(TOKEN_HEADER, token.as_str())
    }

    fn send_import(
        &self,
        request: &ImportRequest<'_>,
    ) -> std::result::Result<(u16, String), GatewayError> {
        let response = self
            .post(USER_IMPORT_PATH)
            .json(request)
            .send()
            .map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(transport_error)?;
        debug!(status, users = request.users.len(), "Posted batch");
        Ok((status, body))
    }
}

impl Connection for FolioConnection<'_> {
    fn post_import(
        &self,
        request: &ImportRequest<'_>,
    ) -> std::result::Result<ImportResponse, GatewayError> {
        let (mut status, mut body) = self.send_import(request)?;
        if status == 401 {
            info!("Access token refused, logging in again");
            let token = self.client.login()?;
            self.token.replace(token);
            (status, body) = self.send_import(request)?;
        }

        if (200..300).contains(&status) {
            ImportResponse::from_json(&body)
        } else {
            Err(GatewayError::from_status(status, body))
        }
    }
}

impl Drop for FolioConnection<'_> {
    fn drop(&mut self) {
        match self.post(LOGOUT_PATH).send() {
            Ok(response) if response.status().is_success() => debug!("Session released"),
            Ok(response) => {
                warn!(status = response.status().as_u16(), "Logout was not accepted");
            }
            Err(err) => warn!(error = %err, "Logout failed"),
        }
    }
}

/// Maps a transport failure onto the gateway taxonomy.
pub(crate) fn transport_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout(err.to_string())
    } else if err.is_decode() {
        GatewayError::InvalidResponse(err.to_string())
    } else {
        GatewayError::Network(err.to_string())
    }
}

/// Extracts the access token from `Set-Cookie` headers.
pub(crate) fn access_token(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(token_from_cookie)
}

fn token_from_cookie(cookie: &str) -> Option<String> {
    let pair = cookie.split(';').next()?.trim();
    let (name, value) = pair.split_once('=')?;
    (name == ACCESS_TOKEN_COOKIE && !value.is_empty()).then(|| value.to_string())
}

/// User-facing reason for an unsuccessful login response.
///
/// 405 means the endpoint is not a FOLIO services URL. Otherwise the first
/// `errors[].code` of a JSON body is used, falling back to the raw body.
pub fn login_failure_reason(status: u16, body: &str) -> String {
    if status == 405 {
        return "Invalid FOLIO Services Url".to_string();
    }
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            json.pointer("/errors/0/code").map(|code| match code {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
        })
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_from_cookie() {
        assert_eq!(
            token_from_cookie("folioAccessToken=abc.def; Max-Age=600; Path=/; HttpOnly"),
            Some("abc.def".to_string())
        );
        assert_eq!(token_from_cookie("folioRefreshToken=xyz; Path=/authn"), None);
        assert_eq!(token_from_cookie("folioAccessToken=; Path=/"), None);
    }

    #[test]
    fn test_login_failure_reason() {
        assert_eq!(login_failure_reason(405, ""), "Invalid FOLIO Services Url");
        assert_eq!(
            login_failure_reason(
                422,
                r#"{"errors":[{"message":"Password does not match","code":"password.incorrect"}]}"#
            ),
            "password.incorrect"
        );
        assert_eq!(
            login_failure_reason(400, "Tenant must be set"),
            "Tenant must be set"
        );
        assert_eq!(login_failure_reason(500, r#"{"errors":[]}"#), r#"{"errors":[]}"#);
    }
}
