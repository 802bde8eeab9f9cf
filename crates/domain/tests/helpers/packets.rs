/// `example.com` as it appears at offset 12 of a message.
pub const EXAMPLE_COM: [u8; 13] = [
    7, b'e', b'x', b'a', b'm', b'p', b'l', b'e', 3, b'c', b'o', b'm', 0,
];

pub fn header(id: u16, flags: u16, qd: u16, an: u16, ns: u16, ar: u16) -> Vec<u8> {
    [id, flags, qd, an, ns, ar]
        .iter()
        .flat_map(|v| v.to_be_bytes())
        .collect()
}

/// Response to `example.com A` whose answer owner is a pointer to the question.
pub fn compressed_answer_response() -> Vec<u8> {
    let mut buf = header(0x1234, 0x8180, 1, 1, 0, 0);
    buf.extend_from_slice(&EXAMPLE_COM);
    buf.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);
    buf.extend_from_slice(&[0xc0, 0x0c]);
    buf.extend_from_slice(&a_record_tail(300, [93, 184, 216, 34]));
    buf
}

/// Same message as `compressed_answer_response` with every name spelled out.
pub fn expanded_answer_response() -> Vec<u8> {
    let mut buf = header(0x1234, 0x8180, 1, 1, 0, 0);
    buf.extend_from_slice(&EXAMPLE_COM);
    buf.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);
    buf.extend_from_slice(&EXAMPLE_COM);
    buf.extend_from_slice(&a_record_tail(300, [93, 184, 216, 34]));
    buf
}

/// Type, class, ttl, rdlength and address of an IN A record.
pub fn a_record_tail(ttl: u32, addr: [u8; 4]) -> Vec<u8> {
    let mut buf = vec![0x00, 0x01, 0x00, 0x01];
    buf.extend_from_slice(&ttl.to_be_bytes());
    buf.extend_from_slice(&[0x00, 0x04]);
    buf.extend_from_slice(&addr);
    buf
}

/// Referral from a `com` server: NS `a.gtld.example` for `com` with glue,
/// the NS target using a pointer into the question.
pub fn referral_with_glue() -> Vec<u8> {
    let mut buf = header(0x4242, 0x8000, 1, 0, 1, 1);
    buf.extend_from_slice(&EXAMPLE_COM);
    buf.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);

    // authority: com. NS ns1.example.com (ns1 + pointer to "example.com" at 12)
    buf.extend_from_slice(&[0xc0, 0x14]);
    buf.extend_from_slice(&[0x00, 0x02, 0x00, 0x01]);
    buf.extend_from_slice(&172_800u32.to_be_bytes());
    let ns_rdata = [3, b'n', b's', b'1', 0xc0, 0x0c];
    buf.extend_from_slice(&(ns_rdata.len() as u16).to_be_bytes());
    let ns_target_offset = buf.len();
    buf.extend_from_slice(&ns_rdata);

    // additional: ns1.example.com A 192.0.2.53, owner is a pointer to the NS rdata
    buf.extend_from_slice(&[0xc0, ns_target_offset as u8]);
    buf.extend_from_slice(&a_record_tail(172_800, [192, 0, 2, 53]));
    buf
}
