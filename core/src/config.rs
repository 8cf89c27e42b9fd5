//! Client configuration: base endpoint, credentials and transport.
//!
//! A [`Config`] is assembled from an ordered list of [`ClientOption`]s (or
//! the equivalent [`ConfigBuilder`] chain) and is immutable afterwards.
//! Options apply in order, so a later option overrides an earlier one.

use std::fmt;
use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use url::Url;

use crate::error::{Error, Result};
use crate::transport::{default_transport, Transport};

pub const DEFAULT_BASE_URL: &str = "https://api.track.toggl.com/";

/// Basic-auth password paired with an API token.
pub const API_TOKEN_PASSWORD: &str = "api_token";

/// How requests authenticate.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Credentials {
    #[default]
    None,
    ApiToken(String),
    /// Legacy email/password login.
    BasicAuth { email: String, password: String },
}

impl Credentials {
    /// Value of the `Authorization` header.
    pub fn authorization(&self) -> Result<String> {
        let (user, password) = match self {
            Credentials::None => return Err(Error::BadConfig("missing credential".to_string())),
            Credentials::ApiToken(token) => (token.as_str(), API_TOKEN_PASSWORD),
            Credentials::BasicAuth { email, password } => (email.as_str(), password.as_str()),
        };
        if user.is_empty() {
            return Err(Error::BadConfig("empty credential".to_string()));
        }
        let encoded = general_purpose::STANDARD.encode(format!("{user}:{password}"));
        Ok(format!("Basic {encoded}"))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::None => f.write_str("None"),
            Credentials::ApiToken(_) => f.write_str("ApiToken(..)"),
            Credentials::BasicAuth { email, .. } => f
                .debug_struct("BasicAuth")
                .field("email", email)
                .finish_non_exhaustive(),
        }
    }
}

/// A single configuration setting.
#[derive(Clone)]
pub enum ClientOption {
    ApiToken(String),
    BasicAuth { email: String, password: String },
    Transport(Arc<dyn Transport>),
    /// Point the client at another server, such as a local fake.
    #[doc(hidden)]
    BaseUrl(String),
}

impl ClientOption {
    pub fn apply(self, builder: &mut ConfigBuilder) {
        match self {
            ClientOption::ApiToken(token) => builder.credentials = Credentials::ApiToken(token),
            ClientOption::BasicAuth { email, password } => {
                builder.credentials = Credentials::BasicAuth { email, password }
            }
            ClientOption::Transport(transport) => builder.transport = Some(transport),
            ClientOption::BaseUrl(base_url) => builder.base_url = base_url,
        }
    }
}

impl fmt::Debug for ClientOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientOption::ApiToken(_) => f.write_str("ApiToken(..)"),
            ClientOption::BasicAuth { email, .. } => f
                .debug_struct("BasicAuth")
                .field("email", email)
                .finish_non_exhaustive(),
            ClientOption::Transport(transport) => f.debug_tuple("Transport").field(transport).finish(),
            ClientOption::BaseUrl(url) => f.debug_tuple("BaseUrl").field(url).finish(),
        }
    }
}

pub fn with_api_token(token: impl Into<String>) -> ClientOption {
    ClientOption::ApiToken(token.into())
}

pub fn with_basic_auth(email: impl Into<String>, password: impl Into<String>) -> ClientOption {
    ClientOption::BasicAuth {
        email: email.into(),
        password: password.into(),
    }
}

pub fn with_transport(transport: Arc<dyn Transport>) -> ClientOption {
    ClientOption::Transport(transport)
}

#[doc(hidden)]
pub fn with_base_url(base_url: impl Into<String>) -> ClientOption {
    ClientOption::BaseUrl(base_url.into())
}

#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    base_url: String,
    credentials: Credentials,
    transport: Option<Arc<dyn Transport>>,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials: Credentials::None,
            transport: None,
        }
    }
}

impl ConfigBuilder {
    pub fn option(mut self, option: ClientOption) -> Self {
        option.apply(&mut self);
        self
    }

    pub fn with_api_token(self, token: impl Into<String>) -> Self {
        self.option(with_api_token(token))
    }

    pub fn with_basic_auth(self, email: impl Into<String>, password: impl Into<String>) -> Self {
        self.option(with_basic_auth(email, password))
    }

    pub fn with_transport(self, transport: Arc<dyn Transport>) -> Self {
        self.option(with_transport(transport))
    }

    #[doc(hidden)]
    pub fn with_base_url(self, base_url: impl Into<String>) -> Self {
        self.option(with_base_url(base_url))
    }

    pub fn build(self) -> Result<Config> {
        let base_url = Url::parse(self.base_url.trim())
            .map_err(|e| Error::BadConfig(format!("invalid base URL {:?}: {e}", self.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::BadConfig(format!(
                "base URL {:?} cannot carry a path",
                self.base_url
            )));
        }
        let transport = match self.transport {
            Some(transport) => transport,
            None => default_transport()
                .map_err(|e| Error::BadConfig(format!("cannot build the default transport: {e}")))?,
        };
        Ok(Config {
            base_url,
            credentials: self.credentials,
            transport,
        })
    }
}

/// Immutable client configuration, cheap to clone and share across tasks.
#[derive(Debug, Clone)]
pub struct Config {
    base_url: Url,
    credentials: Credentials,
    transport: Arc<dyn Transport>,
}

impl Config {
    pub fn new(options: impl IntoIterator<Item = ClientOption>) -> Result<Self> {
        options
            .into_iter()
            .fold(ConfigBuilder::default(), ConfigBuilder::option)
            .build()
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_public_endpoint() {
        let config = Config::new([with_api_token("token")]).unwrap();
        assert_eq!(config.base_url().as_str(), DEFAULT_BASE_URL);
    }

    #[test]
    fn configs_without_transport_share_the_default() {
        let first = Config::new([with_api_token("token")]).unwrap();
        let second = Config::builder().with_api_token("other").build().unwrap();
        assert!(Arc::ptr_eq(first.transport(), second.transport()));
        assert!(Arc::ptr_eq(first.transport(), &default_transport().unwrap()));
    }

    #[test]
    fn api_token_uses_fixed_password() {
        let auth = Credentials::ApiToken("1971800d4d82861d8f2c1651fea4d212".to_string())
            .authorization()
            .unwrap();
        let expected = general_purpose::STANDARD.encode("1971800d4d82861d8f2c1651fea4d212:api_token");
        assert_eq!(auth, format!("Basic {expected}"));
    }

    #[test]
    fn basic_auth_uses_email_and_password() {
        let config = Config::new([with_basic_auth("me@example.com", "secret")]).unwrap();
        let expected = general_purpose::STANDARD.encode("me@example.com:secret");
        assert_eq!(
            config.credentials().authorization().unwrap(),
            format!("Basic {expected}")
        );
    }

    #[test]
    fn later_options_win() {
        let config = Config::new([
            with_basic_auth("me@example.com", "secret"),
            with_api_token("token"),
            with_base_url("http://first.invalid/"),
            with_base_url("http://127.0.0.1:3000/"),
        ])
        .unwrap();
        assert_eq!(config.credentials(), &Credentials::ApiToken("token".to_string()));
        assert_eq!(config.base_url().as_str(), "http://127.0.0.1:3000/");
    }

    #[test]
    fn missing_or_empty_credential_is_bad_config() {
        assert!(matches!(
            Credentials::None.authorization(),
            Err(Error::BadConfig(_))
        ));
        assert!(matches!(
            Credentials::ApiToken(String::new()).authorization(),
            Err(Error::BadConfig(_))
        ));
    }

    #[test]
    fn unparseable_base_url_is_bad_config() {
        let err = Config::builder().with_base_url("not a url").build().unwrap_err();
        assert!(matches!(err, Error::BadConfig(_)));
        let err = Config::builder().with_base_url("mailto:me@example.com").build().unwrap_err();
        assert!(matches!(err, Error::BadConfig(_)));
    }

    #[test]
    fn debug_redacts_secrets() {
        let rendered = format!("{:?}", with_basic_auth("me@example.com", "hunter2"));
        assert!(!rendered.contains("hunter2"));
        let rendered = format!("{:?}", Credentials::ApiToken("secret-token".to_string()));
        assert!(!rendered.contains("secret-token"));
    }
}
