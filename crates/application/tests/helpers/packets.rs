use ferrous_resolver_domain::wire::{build_query_with_id, QueryMode, FLAG_QR};
use ferrous_resolver_domain::{Header, Packet, Question, Record, RecordType};
use std::net::{Ipv4Addr, SocketAddr};

pub const CLIENT: SocketAddr =
    SocketAddr::new(std::net::IpAddr::V4(Ipv4Addr::new(192, 168, 1, 100)), 40000);

pub fn client_query(id: u16, name: &str, record_type: RecordType) -> Vec<u8> {
    build_query_with_id(id, name, record_type, QueryMode::Stub).unwrap()
}

pub fn a_answer(name: &str, ttl: u32, addr: [u8; 4]) -> Record {
    Record::a(name, ttl, Ipv4Addr::from(addr))
}

/// A complete response for `name`, as an upstream would send it.
pub fn response_bytes(id: u16, name: &str, answers: Vec<Record>) -> Vec<u8> {
    Packet {
        header: Header {
            id,
            flags: FLAG_QR,
            ..Header::default()
        },
        questions: vec![Question::new(name, RecordType::A)],
        answers,
        ..Packet::default()
    }
    .encode()
    .unwrap()
}
