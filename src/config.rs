use std::fmt;
use std::path::PathBuf;

use crate::error::{ClowderError, Result};

/// Credentials sent with every request. Basic auth and key auth are
/// mutually exclusive.
#[derive(Clone, PartialEq, Eq)]
pub enum Auth {
    Anonymous,
    Basic { login: String, password: String },
    /// Pre-shared key, sent as the `key` query parameter.
    Key(String),
}

impl Auth {
    /// Build credentials from optional parts. Empty strings count as unset.
    pub fn from_parts(
        login: Option<String>,
        password: Option<String>,
        key: Option<String>,
    ) -> Result<Self> {
        let login = login.filter(|l| !l.is_empty());
        let key = key.filter(|k| !k.is_empty());
        match (login, key) {
            (Some(_), Some(_)) => Err(ClowderError::Config(
                "login and key are mutually exclusive".to_string(),
            )),
            (Some(login), None) => Ok(Auth::Basic {
                login,
                password: password.unwrap_or_default(),
            }),
            (None, Some(key)) => Ok(Auth::Key(key)),
            (None, None) => Ok(Auth::Anonymous),
        }
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auth::Anonymous => f.write_str("Anonymous"),
            Auth::Basic { login, .. } => f
                .debug_struct("Basic")
                .field("login", login)
                .field("password", &"<redacted>")
                .finish(),
            Auth::Key(_) => f.write_str("Key(<redacted>)"),
        }
    }
}

/// Values given on the command line. Anything left unset falls back to the
/// environment.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub url: Option<String>,
    pub login: Option<String>,
    pub password: Option<String>,
    pub key: Option<String>,
    pub local_paths: Vec<PathBuf>,
    pub insecure: bool,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service root, without trailing slash and without `/api`.
    pub url: String,
    pub auth: Auth,
    pub verify_tls: bool,
    /// Server-local prefixes the service can read directly. Files under one
    /// of these are uploaded by reference instead of by content.
    pub local_paths: Vec<PathBuf>,
}

impl ClientConfig {
    pub fn new(url: &str, auth: Auth) -> Result<Self> {
        let url = url.trim().trim_end_matches('/');
        if url.is_empty() {
            return Err(ClowderError::Config(
                "Clowder URL required (--clowder-url or CLOWDER_HOST)".to_string(),
            ));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ClowderError::Config(format!(
                "Clowder URL must start with http:// or https://, got '{}'",
                url
            )));
        }
        Ok(Self {
            url: url.to_string(),
            auth,
            verify_tls: true,
            local_paths: Vec::new(),
        })
    }

    pub fn with_local_paths(mut self, local_paths: Vec<PathBuf>) -> Self {
        self.local_paths = local_paths;
        self
    }

    /// Load `.env`, then merge command-line overrides over the environment.
    pub fn from_env(overrides: ConfigOverrides) -> Result<Self> {
        let _ = dotenv::dotenv();
        Self::from_lookup(overrides, |name| dotenv::var(name).ok())
    }

    fn from_lookup<F>(overrides: ConfigOverrides, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = overrides
            .url
            .or_else(|| lookup("CLOWDER_HOST"))
            .or_else(|| lookup("CLOWDER_URL"))
            .unwrap_or_default();
        // Credentials come from one layer only: a login or key on the command
        // line replaces both auth modes from the environment.
        let non_empty = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        let auth = if non_empty(&overrides.login) || non_empty(&overrides.key) {
            let password = if non_empty(&overrides.login) {
                overrides.password.or_else(|| lookup("CLOWDER_PASSWORD"))
            } else {
                overrides.password
            };
            Auth::from_parts(overrides.login, password, overrides.key)?
        } else {
            Auth::from_parts(
                lookup("CLOWDER_LOGIN"),
                overrides.password.or_else(|| lookup("CLOWDER_PASSWORD")),
                lookup("CLOWDER_KEY"),
            )?
        };

        let local_paths = if overrides.local_paths.is_empty() {
            lookup("CLOWDER_LOCAL_PATHS")
                .unwrap_or_default()
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .collect()
        } else {
            overrides.local_paths
        };

        let mut config = Self::new(&url, auth)?.with_local_paths(local_paths);
        config.verify_tls = !overrides.insecure;
        Ok(config)
    }

    /// Absolute URL of an API endpoint.
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/api/{}", self.url, path.trim_start_matches('/'))
    }

    pub fn user_url(&self, user_id: &str) -> String {
        self.api_url(&format!("users/{}", user_id))
    }
}
