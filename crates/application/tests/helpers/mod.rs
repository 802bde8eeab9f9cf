#![allow(dead_code)]
#![allow(unused_imports)]

mod mock_ports;
mod packets;

pub use mock_ports::*;
pub use packets::*;
