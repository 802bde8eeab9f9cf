use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_dns_port")]
    pub dns_port: u16,

    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Queries handled at the same time; further datagrams wait for a slot.
    #[serde(default = "default_max_concurrent_queries")]
    pub max_concurrent_queries: usize,

    /// Answer SERVFAIL when resolution fails instead of dropping the query.
    #[serde(default = "default_true")]
    pub servfail_on_failure: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            dns_port: default_dns_port(),
            bind_address: default_bind_address(),
            max_concurrent_queries: default_max_concurrent_queries(),
            servfail_on_failure: true,
        }
    }
}

fn default_dns_port() -> u16 {
    53
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_max_concurrent_queries() -> usize {
    256
}

fn default_true() -> bool {
    true
}
