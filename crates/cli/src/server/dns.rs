use crate::di::DnsServices;
use ferrous_resolver_infrastructure::dns::DnsServerHandler;
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// Largest inbound datagram accepted.
pub const MAX_DATAGRAM_SIZE: usize = 4096;

pub async fn start_dns_server(
    socket_addr: SocketAddr,
    services: DnsServices,
    max_concurrent_queries: usize,
) -> anyhow::Result<()> {
    let DnsServices {
        handler,
        cache,
        socket_pool,
    } = services;

    let socket = Arc::new(create_udp_socket(socket_addr)?);
    let handler = Arc::new(handler);
    let permits = Arc::new(Semaphore::new(max_concurrent_queries));

    info!(
        bind_address = %socket_addr,
        max_concurrent_queries,
        "DNS server ready"
    );

    tokio::select! {
        result = run_udp_loop(socket, handler, permits) => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    if let Some(cache) = cache {
        let m = cache.metrics().snapshot(cache.len());
        info!(
            entries = m.total_entries,
            hits = m.hits,
            misses = m.misses,
            hit_rate = %format!("{:.1}%", m.hit_rate()),
            evictions = m.evictions,
            expirations = m.expirations,
            "Cache statistics"
        );
    }

    let pool = socket_pool.stats();
    info!(
        sockets_created = pool.total_created,
        sockets_reused = pool.total_reused,
        reuse_rate = %format!("{:.2}", pool.reuse_rate()),
        "Outbound socket statistics"
    );

    Ok(())
}

async fn run_udp_loop(
    socket: Arc<UdpSocket>,
    handler: Arc<DnsServerHandler>,
    permits: Arc<Semaphore>,
) -> anyhow::Result<()> {
    let mut recv_buf = [0u8; MAX_DATAGRAM_SIZE];

    loop {
        // Waiting here keeps a burst from spawning unbounded tasks.
        let permit = permits.clone().acquire_owned().await?;

        let (n, from) = match socket.recv_from(&mut recv_buf).await {
            Ok(received) => received,
            Err(e) if is_transient(&e) => continue,
            Err(e) => {
                error!(error = %e, "UDP recv error");
                return Err(e.into());
            }
        };

        let query: Arc<[u8]> = Arc::from(&recv_buf[..n]);
        let handler = handler.clone();
        let socket = socket.clone();

        tokio::spawn(async move {
            let _permit = permit;
            if let Some(outcome) = handler.handle_datagram(&query, from).await {
                if let Some(response) = outcome.response() {
                    if let Err(e) = socket.send_to(response, from).await {
                        warn!(client = %from, error = %e, "Failed to send response");
                    }
                }
            }
        });
    }
}

/// Errors a UDP socket reports for a single datagram, such as an ICMP port
/// unreachable from an earlier send.
fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::Interrupted | io::ErrorKind::ConnectionReset | io::ErrorKind::WouldBlock
    )
}

fn create_udp_socket(socket_addr: SocketAddr) -> anyhow::Result<UdpSocket> {
    let domain = if socket_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;

    let std_socket: std::net::UdpSocket = socket.into();
    Ok(UdpSocket::from_std(std_socket)?)
}
