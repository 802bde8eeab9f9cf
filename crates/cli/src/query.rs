use crate::QueryArgs;
use anyhow::Context;
use ferrous_resolver_domain::wire::{
    build_query, QueryMode, RCODE_FORMERR, RCODE_NOERROR, RCODE_NOTIMP, RCODE_NXDOMAIN,
    RCODE_SERVFAIL,
};
use ferrous_resolver_domain::{Packet, Record};
use ferrous_resolver_infrastructure::dns::{DnsTransport, UdpSocketPool, UdpTransport};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Sends one recursive query and prints the decoded response.
pub async fn run(args: QueryArgs) -> anyhow::Result<()> {
    let server: SocketAddr = args
        .server
        .parse()
        .with_context(|| format!("Invalid server '{}', expected IP:PORT", args.server))?;

    let (id, query) = build_query(&args.name, args.record_type, QueryMode::Stub)?;
    let transport = UdpTransport::new(Arc::new(UdpSocketPool::new(1, 0)));

    let start = Instant::now();
    let response = transport
        .exchange(server, &query, Duration::from_secs(args.timeout))
        .await?;
    let elapsed = start.elapsed();

    let packet = Packet::decode(&response)?;

    println!(
        ";; id {} status {} flags {}",
        id,
        rcode_name(packet.header.rcode()),
        flag_names(&packet)
    );
    println!(
        ";; QUERY: {}, ANSWER: {}, AUTHORITY: {}, ADDITIONAL: {}",
        packet.questions.len(),
        packet.answers.len(),
        packet.authorities.len(),
        packet.additionals.len()
    );

    println!("\n;; QUESTION SECTION:");
    for question in &packet.questions {
        println!(";{}.\t\t{}\t{}", question.name, question.qclass, question.qtype);
    }
    print_section("ANSWER", &packet.answers);
    print_section("AUTHORITY", &packet.authorities);
    print_section("ADDITIONAL", &packet.additionals);

    println!(
        "\n;; Query time: {} msec\n;; SERVER: {}\n;; MSG SIZE rcvd: {}",
        elapsed.as_millis(),
        server,
        response.len()
    );
    Ok(())
}

fn print_section(title: &str, records: &[Record]) {
    if records.is_empty() {
        return;
    }
    println!("\n;; {} SECTION:", title);
    for record in records {
        println!(
            "{}.\t{}\t{}\t{}\t{}",
            record.name, record.ttl, record.rclass, record.rtype, record.data
        );
    }
}

fn rcode_name(rcode: u8) -> String {
    match rcode {
        RCODE_NOERROR => "NOERROR".to_string(),
        RCODE_FORMERR => "FORMERR".to_string(),
        RCODE_SERVFAIL => "SERVFAIL".to_string(),
        RCODE_NXDOMAIN => "NXDOMAIN".to_string(),
        RCODE_NOTIMP => "NOTIMP".to_string(),
        other => format!("RCODE{}", other),
    }
}

fn flag_names(packet: &Packet) -> String {
    let header = &packet.header;
    [
        (header.is_response(), "qr"),
        (header.is_authoritative(), "aa"),
        (header.is_truncated(), "tc"),
        (header.recursion_desired(), "rd"),
        (header.recursion_available(), "ra"),
    ]
    .iter()
    .filter(|(set, _)| *set)
    .map(|(_, name)| *name)
    .collect::<Vec<_>>()
    .join(" ")
}
