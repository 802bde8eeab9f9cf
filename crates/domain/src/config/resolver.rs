use serde::{Deserialize, Serialize};

/// d.root-servers.net
pub const DEFAULT_ROOT_SERVER: &str = "199.7.91.13:53";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Where every resolution starts, as `IP:PORT`.
    #[serde(default = "default_root_server")]
    pub root_server: String,

    /// Port used for nameservers learned from referrals.
    #[serde(default = "default_nameserver_port")]
    pub nameserver_port: u16,

    /// Per-hop timeout in milliseconds.
    #[serde(default = "default_query_timeout")]
    pub query_timeout: u64,

    /// Timeout for a whole resolution in milliseconds.
    #[serde(default = "default_resolution_timeout")]
    pub resolution_timeout: u64,

    /// Round trips allowed for one resolution, nested nameserver lookups
    /// included.
    #[serde(default = "default_max_hops")]
    pub max_hops: usize,

    /// Nesting allowed when a referral names a nameserver without glue.
    #[serde(default = "default_max_ns_depth")]
    pub max_ns_depth: usize,

    #[serde(default = "default_max_outbound_sockets")]
    pub max_outbound_sockets: usize,

    #[serde(default = "default_max_idle_sockets")]
    pub max_idle_sockets: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            root_server: default_root_server(),
            nameserver_port: default_nameserver_port(),
            query_timeout: default_query_timeout(),
            resolution_timeout: default_resolution_timeout(),
            max_hops: default_max_hops(),
            max_ns_depth: default_max_ns_depth(),
            max_outbound_sockets: default_max_outbound_sockets(),
            max_idle_sockets: default_max_idle_sockets(),
        }
    }
}

fn default_root_server() -> String {
    DEFAULT_ROOT_SERVER.to_string()
}

fn default_nameserver_port() -> u16 {
    53
}

fn default_query_timeout() -> u64 {
    2000
}

fn default_resolution_timeout() -> u64 {
    10_000
}

fn default_max_hops() -> usize {
    16
}

fn default_max_ns_depth() -> usize {
    4
}

fn default_max_outbound_sockets() -> usize {
    128
}

fn default_max_idle_sockets() -> usize {
    32
}
