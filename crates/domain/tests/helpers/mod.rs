#![allow(dead_code)]
mod packets;

pub use packets::*;
