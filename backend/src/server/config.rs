//! Server settings loaded via OrthoConfig and the validated configuration
//! built from them.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use todolist::inbound::http::ownership::DEFAULT_BODY_LIMIT;
use tracing::warn;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_OWNERSHIP_TIMEOUT_MS: u64 = 3_000;
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const MIN_SESSION_KEY_BYTES: usize = 32;

/// Startup failures caused by invalid settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The bind address does not parse as `host:port`.
    #[error("invalid bind address {value:?}: {source}")]
    InvalidBindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
    /// A zero timeout would reject every gated request.
    #[error("ownership timeout must be greater than zero")]
    ZeroOwnershipTimeout,
    /// A zero body limit would reject every task body.
    #[error("body limit must be greater than zero")]
    ZeroBodyLimit,
    /// The session key file is missing and no ephemeral key is allowed.
    #[error("failed to read session key at {path:?}: {source}")]
    SessionKeyUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The session key file holds too little key material.
    #[error("session key at {path:?} must hold at least 32 bytes")]
    SessionKeyTooShort { path: PathBuf },
}

/// Process settings read from `TODOLIST_*` variables, CLI flags and config
/// files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TODOLIST")]
pub struct ServerSettings {
    /// Listen address, `0.0.0.0:8080` when unset.
    pub bind_addr: Option<String>,
    /// Upper bound for one ownership query in milliseconds, `3000` when unset.
    pub ownership_timeout_ms: Option<u64>,
    /// Largest JSON body buffered by the gate and handlers, 2 MiB when unset.
    pub body_limit_bytes: Option<usize>,
    /// Session key material path.
    pub session_key_file: Option<PathBuf>,
    /// Permit a generated session key when the key file cannot be read.
    #[ortho_config(default = false)]
    pub allow_ephemeral_session_key: bool,
    /// `Secure` flag on the session cookie.
    #[ortho_config(default = true)]
    pub cookie_secure: bool,
}

impl ServerSettings {
    /// Parsed listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value
            .parse()
            .map_err(|source| SettingsError::InvalidBindAddr {
                value: value.to_owned(),
                source,
            })
    }

    /// Process-wide ownership query timeout.
    pub fn ownership_timeout(&self) -> Result<Duration, SettingsError> {
        match self.ownership_timeout_ms.unwrap_or(DEFAULT_OWNERSHIP_TIMEOUT_MS) {
            0 => Err(SettingsError::ZeroOwnershipTimeout),
            millis => Ok(Duration::from_millis(millis)),
        }
    }

    /// Body size limit shared by the ownership gate and `web::JsonConfig`.
    pub fn body_limit(&self) -> Result<usize, SettingsError> {
        match self.body_limit_bytes.unwrap_or(DEFAULT_BODY_LIMIT) {
            0 => Err(SettingsError::ZeroBodyLimit),
            limit => Ok(limit),
        }
    }

    /// Configured session key path.
    pub fn session_key_file(&self) -> &Path {
        self.session_key_file
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_SESSION_KEY_FILE))
    }

    /// Whether the session cookie carries the `Secure` flag.
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }

    /// Load the session key, falling back to a generated key in debug builds
    /// or when explicitly allowed.
    pub fn session_key(&self) -> Result<Key, SettingsError> {
        let path = self.session_key_file();
        match std::fs::read(path) {
            Ok(bytes) if bytes.len() >= MIN_SESSION_KEY_BYTES => Ok(Key::derive_from(&bytes)),
            Ok(_) => Err(SettingsError::SessionKeyTooShort {
                path: path.to_path_buf(),
            }),
            Err(error) if cfg!(debug_assertions) || self.allow_ephemeral_session_key => {
                warn!(path = %path.display(), %error, "using temporary session key (dev only)");
                Ok(Key::generate())
            }
            Err(source) => Err(SettingsError::SessionKeyUnreadable {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Validate every setting and build the server configuration.
    pub fn build(&self) -> Result<ServerConfig, SettingsError> {
        Ok(ServerConfig::new(
            self.session_key()?,
            self.cookie_secure(),
            SameSite::Lax,
            self.bind_addr()?,
        )
        .with_ownership_timeout(self.ownership_timeout()?)
        .with_body_limit(self.body_limit()?))
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) ownership_timeout: Duration,
    pub(crate) body_limit: usize,
}

impl ServerConfig {
    /// Construct a server configuration with the default ownership timeout
    /// and body limit.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            ownership_timeout: Duration::from_millis(DEFAULT_OWNERSHIP_TIMEOUT_MS),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    /// Override the ownership query timeout.
    #[must_use]
    pub fn with_ownership_timeout(mut self, timeout: Duration) -> Self {
        self.ownership_timeout = timeout;
        self
    }

    /// Override the request body limit.
    #[must_use]
    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
