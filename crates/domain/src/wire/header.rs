use super::WireCursor;
use crate::DomainError;

pub const HEADER_LEN: usize = 12;

pub const FLAG_QR: u16 = 1 << 15;
pub const FLAG_AA: u16 = 1 << 10;
pub const FLAG_TC: u16 = 1 << 9;
pub const FLAG_RD: u16 = 1 << 8;
pub const FLAG_RA: u16 = 1 << 7;

pub const RCODE_NOERROR: u8 = 0;
pub const RCODE_FORMERR: u8 = 1;
pub const RCODE_SERVFAIL: u8 = 2;
pub const RCODE_NXDOMAIN: u8 = 3;
pub const RCODE_NOTIMP: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    pub id: u16,
    pub flags: u16,
    pub qdcount: u16,
    pub ancount: u16,
    pub nscount: u16,
    pub arcount: u16,
}

impl Header {
    pub fn decode(cursor: &mut WireCursor<'_>) -> Result<Self, DomainError> {
        Ok(Self {
            id: cursor.read_u16()?,
            flags: cursor.read_u16()?,
            qdcount: cursor.read_u16()?,
            ancount: cursor.read_u16()?,
            nscount: cursor.read_u16()?,
            arcount: cursor.read_u16()?,
        })
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut buf = [0u8; HEADER_LEN];
        let fields = [
            self.id,
            self.flags,
            self.qdcount,
            self.ancount,
            self.nscount,
            self.arcount,
        ];
        for (i, field) in fields.iter().enumerate() {
            buf[i * 2..i * 2 + 2].copy_from_slice(&field.to_be_bytes());
        }
        buf
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_bytes());
    }

    #[inline]
    pub fn is_response(&self) -> bool {
        self.flags & FLAG_QR != 0
    }

    #[inline]
    pub fn opcode(&self) -> u8 {
        ((self.flags >> 11) & 0x0F) as u8
    }

    #[inline]
    pub fn is_authoritative(&self) -> bool {
        self.flags & FLAG_AA != 0
    }

    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.flags & FLAG_TC != 0
    }

    #[inline]
    pub fn recursion_desired(&self) -> bool {
        self.flags & FLAG_RD != 0
    }

    #[inline]
    pub fn recursion_available(&self) -> bool {
        self.flags & FLAG_RA != 0
    }

    #[inline]
    pub fn rcode(&self) -> u8 {
        (self.flags & 0x000F) as u8
    }
}

/// Overwrites the transaction id of an encoded message in place.
///
/// Returns `false` when the buffer is too short to hold an id.
pub fn rewrite_id(message: &mut [u8], id: u16) -> bool {
    if message.len() < 2 {
        return false;
    }
    message[..2].copy_from_slice(&id.to_be_bytes());
    true
}
