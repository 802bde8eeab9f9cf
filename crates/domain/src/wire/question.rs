use super::{decode_name, write_name, WireCursor};
use crate::{DomainError, RecordClass, RecordType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub name: String,
    pub qtype: RecordType,
    pub qclass: RecordClass,
}

impl Question {
    pub fn new(name: impl Into<String>, qtype: RecordType) -> Self {
        Self {
            name: name.into(),
            qtype,
            qclass: RecordClass::IN,
        }
    }

    pub fn decode(cursor: &mut WireCursor<'_>) -> Result<Self, DomainError> {
        let name = decode_name(cursor)?;
        let qtype = RecordType::from_u16(cursor.read_u16()?);
        let qclass = RecordClass::from_u16(cursor.read_u16()?);
        Ok(Self {
            name,
            qtype,
            qclass,
        })
    }

    pub fn encode(&self, out: &mut Vec<u8>) -> Result<(), DomainError> {
        write_name(out, &self.name)?;
        out.extend_from_slice(&self.qtype.to_u16().to_be_bytes());
        out.extend_from_slice(&self.qclass.to_u16().to_be_bytes());
        Ok(())
    }
}
