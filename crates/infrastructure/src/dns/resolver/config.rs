use ferrous_resolver_domain::config::ResolverConfig;
use ferrous_resolver_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct IterativeConfig {
    pub root_server: SocketAddr,

    pub nameserver_port: u16,

    pub query_timeout: Duration,

    /// Bound on one whole resolution; `None` leaves only the per-hop timeout.
    pub resolution_timeout: Option<Duration>,

    pub max_hops: usize,

    pub max_ns_depth: usize,
}

impl Default for IterativeConfig {
    fn default() -> Self {
        Self {
            root_server: SocketAddr::from(([199, 7, 91, 13], 53)),
            nameserver_port: 53,
            query_timeout: Duration::from_millis(2000),
            resolution_timeout: Some(Duration::from_millis(10_000)),
            max_hops: 16,
            max_ns_depth: 4,
        }
    }
}

impl IterativeConfig {
    pub fn from_config(config: &ResolverConfig) -> Result<Self, DomainError> {
        let root_server = config.root_server.parse().map_err(|_| {
            DomainError::ConfigError(format!(
                "Invalid root server '{}', expected IP:PORT",
                config.root_server
            ))
        })?;

        Ok(Self {
            root_server,
            nameserver_port: config.nameserver_port,
            query_timeout: Duration::from_millis(config.query_timeout),
            resolution_timeout: Some(Duration::from_millis(config.resolution_timeout)),
            max_hops: config.max_hops,
            max_ns_depth: config.max_ns_depth,
        })
    }

    pub fn with_root_server(mut self, root_server: SocketAddr) -> Self {
        self.root_server = root_server;
        self
    }

    pub fn with_nameserver_port(mut self, port: u16) -> Self {
        self.nameserver_port = port;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    pub fn with_resolution_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.resolution_timeout = timeout;
        self
    }

    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    pub fn with_max_ns_depth(mut self, max_ns_depth: usize) -> Self {
        self.max_ns_depth = max_ns_depth;
        self
    }
}
