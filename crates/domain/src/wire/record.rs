use super::{decode_name, write_name, WireCursor};
use crate::{DomainError, RecordClass, RecordType};
use std::fmt;
use std::net::Ipv4Addr;

/// RDATA, interpreted once at decode time from the record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordData {
    /// A record address.
    Address(Ipv4Addr),
    /// NS record target.
    Name(String),
    /// Any other type, kept verbatim.
    Opaque(Vec<u8>),
}

impl RecordData {
    pub fn as_address(&self) -> Option<Ipv4Addr> {
        match self {
            RecordData::Address(addr) => Some(*addr),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            RecordData::Name(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for RecordData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordData::Address(addr) => write!(f, "{}", addr),
            RecordData::Name(name) => write!(f, "{}.", name),
            RecordData::Opaque(bytes) => {
                // RFC 3597 generic encoding
                write!(f, "\\# {}", bytes.len())?;
                if !bytes.is_empty() {
                    write!(f, " ")?;
                    for b in bytes {
                        write!(f, "{:02x}", b)?;
                    }
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub name: String,
    pub rtype: RecordType,
    pub rclass: RecordClass,
    pub ttl: u32,
    pub data: RecordData,
}

impl Record {
    pub fn a(name: impl Into<String>, ttl: u32, addr: Ipv4Addr) -> Self {
        Self {
            name: name.into(),
            rtype: RecordType::A,
            rclass: RecordClass::IN,
            ttl,
            data: RecordData::Address(addr),
        }
    }

    pub fn ns(name: impl Into<String>, ttl: u32, nameserver: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rtype: RecordType::NS,
            rclass: RecordClass::IN,
            ttl,
            data: RecordData::Name(nameserver.into()),
        }
    }

    pub fn decode(cursor: &mut WireCursor<'_>) -> Result<Self, DomainError> {
        let name = decode_name(cursor)?;
        let rtype = RecordType::from_u16(cursor.read_u16()?);
        let rclass = RecordClass::from_u16(cursor.read_u16()?);
        let ttl = cursor.read_u32()?;
        let rdlength = cursor.read_u16()? as usize;

        let remaining = cursor.remaining();
        if remaining < rdlength {
            return Err(DomainError::Truncated {
                needed: rdlength,
                remaining,
            });
        }
        let rdata_end = cursor.position() + rdlength;

        let data = match rtype {
            RecordType::A => {
                if rdlength != 4 {
                    return Err(DomainError::InvalidRdata(format!(
                        "A record for {} has {} bytes of RDATA",
                        name, rdlength
                    )));
                }
                let b = cursor.read_bytes(4)?;
                RecordData::Address(Ipv4Addr::new(b[0], b[1], b[2], b[3]))
            }
            RecordType::NS => {
                let target = decode_name(cursor)?;
                if cursor.position() > rdata_end {
                    return Err(DomainError::InvalidRdata(format!(
                        "NS record for {} overruns its RDATA",
                        name
                    )));
                }
                cursor.seek(rdata_end)?;
                RecordData::Name(target)
            }
            _ => RecordData::Opaque(cursor.read_bytes(rdlength)?.to_vec()),
        };

        Ok(Self {
            name,
            rtype,
            rclass,
            ttl,
            data,
        })
    }

    pub fn encode(&self, out: &mut Vec<u8>) -> Result<(), DomainError> {
        write_name(out, &self.name)?;
        out.extend_from_slice(&self.rtype.to_u16().to_be_bytes());
        out.extend_from_slice(&self.rclass.to_u16().to_be_bytes());
        out.extend_from_slice(&self.ttl.to_be_bytes());

        let len_at = out.len();
        out.extend_from_slice(&[0, 0]);
        match &self.data {
            RecordData::Address(addr) => out.extend_from_slice(&addr.octets()),
            RecordData::Name(target) => write_name(out, target)?,
            RecordData::Opaque(bytes) => out.extend_from_slice(bytes),
        }

        let rdlength = out.len() - len_at - 2;
        let rdlength = u16::try_from(rdlength)
            .map_err(|_| DomainError::InvalidRdata(format!("{} bytes of RDATA", rdlength)))?;
        out[len_at..len_at + 2].copy_from_slice(&rdlength.to_be_bytes());
        Ok(())
    }
}
