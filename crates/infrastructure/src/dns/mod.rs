pub mod cache;
pub mod resolver;
pub mod server;
pub mod transport;

pub use cache::{CacheKey, CacheMetrics, ResponseCache};
pub use resolver::{IterativeConfig, IterativeResolver};
pub use server::DnsServerHandler;
pub use transport::{DnsTransport, UdpSocketPool, UdpTransport};
