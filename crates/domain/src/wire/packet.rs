use super::header::{FLAG_QR, FLAG_RA, FLAG_RD, RCODE_SERVFAIL};
use super::{names_equal, Header, Question, Record, WireCursor};
use crate::{DomainError, RecordType};
use std::net::Ipv4Addr;

/// A complete DNS message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Packet {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<Record>,
    pub authorities: Vec<Record>,
    pub additionals: Vec<Record>,
}

impl Packet {
    /// Decodes a whole message. Every section count in the header must be
    /// satisfied by the bytes that follow it.
    pub fn decode(bytes: &[u8]) -> Result<Self, DomainError> {
        let mut cursor = WireCursor::new(bytes);
        let header = Header::decode(&mut cursor)?;

        let questions = (0..header.qdcount)
            .map(|_| Question::decode(&mut cursor))
            .collect::<Result<Vec<_>, _>>()?;
        let answers = decode_records(&mut cursor, header.ancount)?;
        let authorities = decode_records(&mut cursor, header.nscount)?;
        let additionals = decode_records(&mut cursor, header.arcount)?;

        Ok(Self {
            header,
            questions,
            answers,
            authorities,
            additionals,
        })
    }

    /// Encodes the message without name compression. Section counts are taken
    /// from the section lengths, not from `header`.
    pub fn encode(&self) -> Result<Vec<u8>, DomainError> {
        let header = Header {
            qdcount: section_len(self.questions.len())?,
            ancount: section_len(self.answers.len())?,
            nscount: section_len(self.authorities.len())?,
            arcount: section_len(self.additionals.len())?,
            ..self.header
        };

        let mut out = Vec::with_capacity(512);
        header.encode(&mut out);
        for question in &self.questions {
            question.encode(&mut out)?;
        }
        for record in self
            .answers
            .iter()
            .chain(&self.authorities)
            .chain(&self.additionals)
        {
            record.encode(&mut out)?;
        }
        Ok(out)
    }

    pub fn first_question(&self) -> Option<&Question> {
        self.questions.first()
    }

    pub fn answers_for<'a>(
        &'a self,
        name: &'a str,
        record_type: RecordType,
    ) -> impl Iterator<Item = &'a Record> + 'a {
        self.answers
            .iter()
            .filter(move |r| r.rtype == record_type && names_equal(&r.name, name))
    }

    pub fn has_answer_for(&self, name: &str, record_type: RecordType) -> bool {
        self.answers_for(name, record_type).next().is_some()
    }

    /// First NS target named in the authority section.
    pub fn referral_nameserver(&self) -> Option<&str> {
        self.authorities
            .iter()
            .filter(|r| r.rtype == RecordType::NS)
            .find_map(|r| r.data.as_name())
    }

    /// Address of a referred nameserver taken from the additional section.
    ///
    /// Glue belonging to one of the authority-section NS names wins; failing
    /// that, the first A record in the additional section is used.
    pub fn glue_address(&self) -> Option<Ipv4Addr> {
        let referred: Vec<&str> = self
            .authorities
            .iter()
            .filter(|r| r.rtype == RecordType::NS)
            .filter_map(|r| r.data.as_name())
            .collect();

        let mut glue = self
            .additionals
            .iter()
            .filter(|r| r.rtype == RecordType::A);

        glue.clone()
            .find(|r| referred.iter().any(|ns| names_equal(ns, &r.name)))
            .or_else(|| glue.next())
            .and_then(|r| r.data.as_address())
    }

    pub fn min_answer_ttl(&self) -> Option<u32> {
        min_ttl(&self.answers)
    }

    /// Builds a SERVFAIL reply to `query`, echoing its id and question.
    pub fn servfail_for(query: &Packet) -> Packet {
        Self::error_reply(query, RCODE_SERVFAIL)
    }

    /// Builds an empty reply to `query` carrying `rcode`.
    pub fn error_reply(query: &Packet, rcode: u8) -> Packet {
        let flags = FLAG_QR
            | (query.header.flags & 0x7800)
            | (query.header.flags & FLAG_RD)
            | FLAG_RA
            | (rcode & 0x0f) as u16;

        Packet {
            header: Header {
                id: query.header.id,
                flags,
                ..Header::default()
            },
            questions: query.questions.iter().take(1).cloned().collect(),
            ..Packet::default()
        }
    }
}

/// Smallest TTL across `records`, `None` when there are none.
pub fn min_ttl(records: &[Record]) -> Option<u32> {
    records.iter().map(|r| r.ttl).min()
}

fn decode_records(cursor: &mut WireCursor<'_>, count: u16) -> Result<Vec<Record>, DomainError> {
    (0..count).map(|_| Record::decode(cursor)).collect()
}

fn section_len(len: usize) -> Result<u16, DomainError> {
    u16::try_from(len)
        .map_err(|_| DomainError::InvalidDnsResponse(format!("{} entries in one section", len)))
}
