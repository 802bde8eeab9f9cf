use ferrous_resolver_application::use_cases::HandleDnsQueryUseCase;
use ferrous_resolver_domain::Config;
use ferrous_resolver_infrastructure::dns::{
    DnsServerHandler, IterativeConfig, IterativeResolver, ResponseCache, UdpSocketPool,
    UdpTransport,
};
use std::sync::Arc;
use tracing::info;

pub struct DnsServices {
    pub handler: DnsServerHandler,
    pub cache: Option<Arc<ResponseCache>>,
    pub socket_pool: Arc<UdpSocketPool>,
}

impl DnsServices {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let socket_pool = Arc::new(UdpSocketPool::new(
            config.resolver.max_outbound_sockets,
            config.resolver.max_idle_sockets,
        ));
        let resolver = Self::build_resolver(config, socket_pool.clone())?;
        let cache = Self::build_cache(config);

        let mut use_case = HandleDnsQueryUseCase::new(resolver)
            .with_servfail_on_failure(config.server.servfail_on_failure);
        if let Some(cache) = &cache {
            use_case = use_case.with_cache(cache.clone());
        }

        Ok(Self {
            handler: DnsServerHandler::new(Arc::new(use_case)),
            cache,
            socket_pool,
        })
    }

    fn build_resolver(
        config: &Config,
        pool: Arc<UdpSocketPool>,
    ) -> anyhow::Result<Arc<IterativeResolver>> {
        let transport = Arc::new(UdpTransport::new(pool));
        let iterative = IterativeConfig::from_config(&config.resolver)?;
        let resolver = IterativeResolver::new(transport, iterative);

        let iterative = resolver.config();
        info!(
            root_server = %iterative.root_server,
            query_timeout_ms = iterative.query_timeout.as_millis() as u64,
            max_hops = iterative.max_hops,
            max_outbound_sockets = config.resolver.max_outbound_sockets,
            "Iterative resolver configured"
        );

        Ok(Arc::new(resolver))
    }

    fn build_cache(config: &Config) -> Option<Arc<ResponseCache>> {
        if !config.cache.enabled {
            info!("Response cache disabled");
            return None;
        }

        info!(max_entries = config.cache.max_entries, "Response cache enabled");
        Some(Arc::new(ResponseCache::new(config.cache.max_entries)))
    }
}
