use ferrous_resolver_application::ports::RecursiveResolver;
use ferrous_resolver_domain::wire::RCODE_NXDOMAIN;
use ferrous_resolver_domain::{DnsQuery, DomainError, Packet, Record, RecordData, RecordType};
use ferrous_resolver_infrastructure::dns::resolver::{IterativeConfig, IterativeResolver};
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

mod helpers;
use helpers::{ns_addr, ScriptedTransport, ROOT};

const TLD_NS: [u8; 4] = [192, 0, 2, 10];
const AUTH_NS: [u8; 4] = [192, 0, 2, 20];

fn config() -> IterativeConfig {
    IterativeConfig::default()
        .with_root_server(ROOT)
        .with_timeout(Duration::from_millis(200))
}

fn resolver(transport: &Arc<ScriptedTransport>, config: IterativeConfig) -> IterativeResolver {
    IterativeResolver::new(transport.clone(), config)
}

/// root → com (glue) → example.com (glue) → answer
fn delegation_with_glue() -> Arc<ScriptedTransport> {
    let transport = Arc::new(ScriptedTransport::new());
    transport
        .referral(ROOT, "com", "a.gtld.test", Some(Ipv4Addr::from(TLD_NS)))
        .referral(
            ns_addr(TLD_NS),
            "example.com",
            "ns1.example.com",
            Some(Ipv4Addr::from(AUTH_NS)),
        )
        .answer(
            ns_addr(AUTH_NS),
            "example.com",
            vec![Record::a("example.com", 300, Ipv4Addr::new(93, 184, 216, 34))],
        );
    transport
}

#[tokio::test]
async fn test_follows_glue_referrals_to_answer() {
    let transport = delegation_with_glue();
    let resolver = resolver(&transport, config());

    let bytes = resolver
        .resolve_name("example.com", RecordType::A, Some(0x2222))
        .await
        .unwrap();

    let packet = Packet::decode(&bytes).unwrap();
    assert_eq!(packet.header.id, 0x2222);
    assert_eq!(
        packet.answers[0].data,
        RecordData::Address(Ipv4Addr::new(93, 184, 216, 34))
    );

    let servers: Vec<_> = transport.queries().into_iter().map(|q| q.0).collect();
    assert_eq!(servers, vec![ROOT, ns_addr(TLD_NS), ns_addr(AUTH_NS)]);
}

#[tokio::test]
async fn test_queries_are_iterative_with_preserved_id() {
    let transport = delegation_with_glue();
    let resolver = resolver(&transport, config());

    let response = resolver
        .resolve(&DnsQuery::new("example.com", RecordType::A).with_id(77))
        .await
        .unwrap();

    assert_eq!(Packet::decode(&response).unwrap().header.id, 77);
    for (_, name, record_type) in transport.queries() {
        assert_eq!(name, "example.com");
        assert_eq!(record_type, RecordType::A);
    }
}

#[tokio::test]
async fn test_referral_port_follows_config() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.referral(ROOT, "com", "a.gtld.test", Some(Ipv4Addr::from(TLD_NS)));
    let resolver = resolver(&transport, config().with_nameserver_port(5353).with_max_hops(2));

    let _ = resolver.resolve_name("example.com", RecordType::A, None).await;

    let queries = transport.queries();
    assert_eq!(queries[1].0, "192.0.2.10:5353".parse().unwrap());
}

#[tokio::test]
async fn test_resolves_nameserver_without_glue() {
    let transport = Arc::new(ScriptedTransport::new());
    // The root refers example.com to a nameserver it gives no address for;
    // the nameserver's own name resolves through the root as well.
    transport
        .answer(
            ROOT,
            "ns.other.test",
            vec![Record::a("ns.other.test", 300, Ipv4Addr::from(AUTH_NS))],
        )
        .referral(ROOT, "example.com", "ns.other.test", None)
        .answer(
            ns_addr(AUTH_NS),
            "example.com",
            vec![Record::a("example.com", 300, Ipv4Addr::new(10, 1, 1, 1))],
        );
    let resolver = resolver(&transport, config());

    let bytes = resolver
        .resolve_name("example.com", RecordType::A, None)
        .await
        .unwrap();

    let packet = Packet::decode(&bytes).unwrap();
    assert_eq!(packet.answers[0].data.as_address(), Some(Ipv4Addr::new(10, 1, 1, 1)));

    let asked: Vec<_> = transport
        .queries()
        .into_iter()
        .map(|(server, name, _)| (server, name))
        .collect();
    assert_eq!(
        asked,
        vec![
            (ROOT, "example.com".to_string()),
            (ROOT, "ns.other.test".to_string()),
            (ns_addr(AUTH_NS), "example.com".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_unresolvable_nameserver() {
    let transport = Arc::new(ScriptedTransport::new());
    transport
        .nxdomain(ROOT, "ns.missing.test")
        .referral(ROOT, "example.com", "ns.missing.test", None);
    let resolver = resolver(&transport, config());

    let result = resolver.resolve_name("example.com", RecordType::A, None).await;

    assert_eq!(
        result,
        Err(DomainError::NameserverUnresolvable("ns.missing.test".to_string()))
    );
}

#[tokio::test]
async fn test_delegation_loop_exhausts_hop_budget() {
    let transport = Arc::new(ScriptedTransport::new());
    // Two servers referring to each other forever.
    transport
        .referral(ROOT, "com", "a.gtld.test", Some(Ipv4Addr::from(TLD_NS)))
        .referral(ns_addr(TLD_NS), "com", "b.gtld.test", Some(Ipv4Addr::from(AUTH_NS)))
        .referral(ns_addr(AUTH_NS), "com", "a.gtld.test", Some(Ipv4Addr::from(TLD_NS)));
    let resolver = resolver(&transport, config().with_max_hops(16));

    let result = resolver.resolve_name("example.com", RecordType::A, None).await;

    assert_eq!(result, Err(DomainError::DelegationTooDeep(16)));
    assert_eq!(transport.query_count(), 16);
}

#[tokio::test]
async fn test_nameserver_lookups_share_hop_budget() {
    let transport = Arc::new(ScriptedTransport::new());
    // Every name asked at the root is referred to a glueless nameserver,
    // including the nameserver names themselves.
    transport.referral(ROOT, "test", "ns.loop.test", None);
    let resolver = resolver(&transport, config().with_max_hops(3).with_max_ns_depth(10));

    let result = resolver.resolve_name("example.test", RecordType::A, None).await;

    assert_eq!(result, Err(DomainError::DelegationTooDeep(3)));
    assert_eq!(transport.query_count(), 3);
}

#[tokio::test]
async fn test_nameserver_nesting_is_bounded() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.referral(ROOT, "test", "ns.loop.test", None);
    let resolver = resolver(&transport, config().with_max_hops(100).with_max_ns_depth(2));

    let result = resolver.resolve_name("example.test", RecordType::A, None).await;

    assert_eq!(
        result,
        Err(DomainError::NameserverUnresolvable("ns.loop.test".to_string()))
    );
    // example.test, then ns.loop.test twice (depth 1 and 2)
    assert_eq!(transport.query_count(), 3);
}

#[tokio::test]
async fn test_nxdomain_is_returned_as_final_response() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.nxdomain(ROOT, "nope.invalid");
    let resolver = resolver(&transport, config());

    let bytes = resolver
        .resolve_name("nope.invalid", RecordType::A, None)
        .await
        .unwrap();

    let packet = Packet::decode(&bytes).unwrap();
    assert_eq!(packet.header.rcode(), RCODE_NXDOMAIN);
    assert!(packet.answers.is_empty());
}

#[tokio::test]
async fn test_response_without_answer_or_referral_fails() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.reply(ROOT, Packet::default());
    let resolver = resolver(&transport, config());

    let result = resolver.resolve_name("example.com", RecordType::A, None).await;

    assert_eq!(
        result,
        Err(DomainError::NoUsableReferral {
            server: ROOT.to_string()
        })
    );
}

#[tokio::test]
async fn test_mismatched_response_id_fails() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.answer_with_id(
        ROOT,
        "example.com",
        0x0001,
        vec![Record::a("example.com", 300, Ipv4Addr::LOCALHOST)],
    );
    let resolver = resolver(&transport, config());

    let result = resolver
        .resolve_name("example.com", RecordType::A, Some(0x0002))
        .await;

    assert_eq!(
        result,
        Err(DomainError::ResponseIdMismatch {
            expected: 0x0002,
            received: 0x0001
        })
    );
}

#[tokio::test]
async fn test_silent_server_fails_resolution() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.referral(ROOT, "com", "a.gtld.test", Some(Ipv4Addr::from(TLD_NS)));
    let resolver = resolver(&transport, config());

    let result = resolver.resolve_name("example.com", RecordType::A, None).await;

    assert_eq!(
        result,
        Err(DomainError::TransportTimeout {
            server: ns_addr(TLD_NS).to_string()
        })
    );
}

#[tokio::test]
async fn test_invalid_name_fails_before_any_query() {
    let transport = Arc::new(ScriptedTransport::new());
    let resolver = resolver(&transport, config());

    let result = resolver.resolve_name("bad..name", RecordType::A, None).await;

    assert!(matches!(result, Err(DomainError::InvalidDomainName(_))));
    assert_eq!(transport.query_count(), 0);
}

#[test]
fn test_config_from_resolver_section() {
    let mut section = ferrous_resolver_domain::config::ResolverConfig::default();
    section.root_server = "198.41.0.4:53".to_string();
    section.max_hops = 8;

    let config = IterativeConfig::from_config(&section).unwrap();
    assert_eq!(config.root_server, "198.41.0.4:53".parse().unwrap());
    assert_eq!(config.max_hops, 8);
    assert_eq!(config.query_timeout, Duration::from_millis(2000));

    section.root_server = "not-an-address".to_string();
    assert!(matches!(
        IterativeConfig::from_config(&section),
        Err(DomainError::ConfigError(_))
    ));
}
