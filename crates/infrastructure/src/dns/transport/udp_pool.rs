use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::net::UdpSocket;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, info};

/// Reusable outbound UDP sockets.
///
/// Sockets are unconnected, so one socket can talk to any nameserver of its
/// address family. A semaphore caps how many sockets are in use at once;
/// `acquire` waits for a slot when the cap is reached.
pub struct UdpSocketPool {
    idle_v4: Mutex<Vec<Arc<UdpSocket>>>,
    idle_v6: Mutex<Vec<Arc<UdpSocket>>>,

    /// Idle sockets kept per address family.
    max_idle: usize,

    semaphore: Arc<Semaphore>,

    total_created: AtomicU64,
    total_reused: AtomicU64,
}

impl UdpSocketPool {
    pub fn new(max_in_use: usize, max_idle: usize) -> Self {
        info!(max_in_use, max_idle, "Initializing UDP socket pool");

        Self {
            idle_v4: Mutex::new(Vec::new()),
            idle_v6: Mutex::new(Vec::new()),
            max_idle,
            semaphore: Arc::new(Semaphore::new(max_in_use.max(1))),
            total_created: AtomicU64::new(0),
            total_reused: AtomicU64::new(0),
        }
    }

    /// Takes an idle socket able to reach `server`, or creates one.
    ///
    /// The socket goes back to the pool when the returned guard is dropped.
    pub async fn acquire(&self, server: SocketAddr) -> Result<PooledUdpSocket<'_>, std::io::Error> {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|_| std::io::Error::other("UDP socket pool closed"))?;

        let is_ipv4 = server.is_ipv4();
        let reused = self.idle(is_ipv4).pop();
        if let Some(socket) = reused {
            self.total_reused.fetch_add(1, Ordering::Relaxed);
            return Ok(PooledUdpSocket {
                socket,
                is_ipv4,
                pool: self,
                _permit: permit,
            });
        }

        let socket = create_socket(is_ipv4)?;
        self.total_created.fetch_add(1, Ordering::Relaxed);
        debug!(server = %server, "Created new UDP socket");

        Ok(PooledUdpSocket {
            socket: Arc::new(socket),
            is_ipv4,
            pool: self,
            _permit: permit,
        })
    }

    fn release(&self, is_ipv4: bool, socket: Arc<UdpSocket>) {
        let mut idle = self.idle(is_ipv4);
        if idle.len() < self.max_idle {
            idle.push(socket);
        }
    }

    fn idle(&self, is_ipv4: bool) -> MutexGuard<'_, Vec<Arc<UdpSocket>>> {
        let idle = if is_ipv4 { &self.idle_v4 } else { &self.idle_v6 };
        idle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            total_created: self.total_created.load(Ordering::Relaxed),
            total_reused: self.total_reused.load(Ordering::Relaxed),
            total_idle: self.idle(true).len() + self.idle(false).len(),
            available_slots: self.semaphore.available_permits(),
        }
    }
}

fn create_socket(is_ipv4: bool) -> Result<UdpSocket, std::io::Error> {
    use socket2::{Domain, Protocol, Socket, Type};

    let (domain, bind_addr) = if is_ipv4 {
        (Domain::IPV4, SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)))
    } else {
        (Domain::IPV6, SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0)))
    };

    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_recv_buffer_size(256 * 1024)?;
    socket.set_send_buffer_size(128 * 1024)?;
    socket.bind(&bind_addr.into())?;
    socket.set_nonblocking(true)?;

    let std_socket: std::net::UdpSocket = socket.into();
    UdpSocket::from_std(std_socket)
}

/// Pooled socket; returns itself to the pool on drop.
pub struct PooledUdpSocket<'a> {
    socket: Arc<UdpSocket>,
    is_ipv4: bool,
    pool: &'a UdpSocketPool,
    _permit: OwnedSemaphorePermit,
}

impl<'a> PooledUdpSocket<'a> {
    pub fn socket(&self) -> &UdpSocket {
        &self.socket
    }
}

impl<'a> Drop for PooledUdpSocket<'a> {
    fn drop(&mut self) {
        self.pool.release(self.is_ipv4, Arc::clone(&self.socket));
    }
}

#[derive(Debug, Clone)]
pub struct PoolStats {
    pub total_created: u64,
    pub total_reused: u64,
    pub total_idle: usize,
    /// Sockets that can still be handed out without waiting.
    pub available_slots: usize,
}

impl PoolStats {
    pub fn reuse_rate(&self) -> f64 {
        if self.total_created == 0 {
            0.0
        } else {
            self.total_reused as f64 / self.total_created as f64
        }
    }
}
