//! Network listener configuration.

use serde::Deserialize;
use std::net::SocketAddr;

/// Network listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ListenConfig {
    /// Address to bind to (e.g., "0.0.0.0:5556").
    pub address: SocketAddr,
    /// Disable Nagle so single-byte echo reaches the client immediately.
    #[serde(default = "default_nodelay")]
    pub nodelay: bool,
}

fn default_nodelay() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nodelay_defaults_on() {
        let cfg: ListenConfig = toml::from_str(r#"address = "127.0.0.1:5556""#).unwrap();
        assert!(cfg.nodelay);
        assert_eq!(cfg.address.port(), 5556);
    }
}
