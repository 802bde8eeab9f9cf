#![allow(dead_code)]
#![allow(unused_imports)]

mod dns_server_mock;
mod scripted_transport;

pub use dns_server_mock::MockDnsServer;
pub use scripted_transport::*;
