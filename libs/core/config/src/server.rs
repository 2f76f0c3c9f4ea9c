use crate::{ConfigError, FromEnv, env_or_default, env_parse_or};
use std::net::Ipv4Addr;

/// Listening port when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 4000;

/// Bind address of an HTTP listener
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        Self { host, port }
    }

    /// All interfaces on `port`.
    pub fn any_interface(port: u16) -> Self {
        Self::new(Ipv4Addr::UNSPECIFIED.to_string(), port)
    }

    /// `host:port`, as accepted by `TcpListener::bind`
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl FromEnv for ServerConfig {
    /// - `HOST` (default: 0.0.0.0)
    /// - `PORT` (default: 4000)
    fn from_env() -> Result<Self, ConfigError> {
        let host = env_or_default("HOST", &Ipv4Addr::UNSPECIFIED.to_string());
        let port = env_parse_or("PORT", DEFAULT_PORT)?;
        Ok(Self { host, port })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::any_interface(DEFAULT_PORT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_listen_on_4000() {
        temp_env::with_vars_unset(["HOST", "PORT"], || {
            let config = ServerConfig::from_env().unwrap();
            assert_eq!(config, ServerConfig::default());
            assert_eq!(config.address(), "0.0.0.0:4000");
        });
    }

    #[test]
    fn test_host_and_port_override() {
        temp_env::with_vars([("HOST", Some("127.0.0.1")), ("PORT", Some("8081"))], || {
            let config = ServerConfig::from_env().unwrap();
            assert_eq!(config, ServerConfig::new("127.0.0.1".into(), 8081));
        });
    }

    #[test]
    fn test_bad_port_names_the_key() {
        for bad in ["http", "70000", "-1"] {
            temp_env::with_var("PORT", Some(bad), || {
                let err = ServerConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("PORT"), "{}", bad);
            });
        }
    }

    #[test]
    fn test_any_interface() {
        assert_eq!(ServerConfig::any_interface(9000).address(), "0.0.0.0:9000");
    }
}
