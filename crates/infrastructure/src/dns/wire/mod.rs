pub mod cursor;
pub mod name;

pub use cursor::{OutOfBounds, WireCursor};
pub use name::{expand_name, ExpandedName, NameError, MAX_NAME_LEN, MAX_POINTER_HOPS};

/// Fixed size of the DNS message header (RFC 1035 §4.1.1).
pub const HEADER_LEN: usize = 12;

const FLAG_QR: u16 = 0x8000;
const FLAG_TC: u16 = 0x0200;
const RCODE_MASK: u16 = 0x000F;

/// The fixed header fields of a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyHeader {
    pub id: u16,
    pub flags: u16,
    pub qdcount: u16,
    pub ancount: u16,
    pub nscount: u16,
    pub arcount: u16,
}

impl ReplyHeader {
    pub fn read(cursor: &mut WireCursor<'_>) -> Result<Self, OutOfBounds> {
        cursor.ensure(HEADER_LEN)?;
        Ok(Self {
            id: cursor.read_u16()?,
            flags: cursor.read_u16()?,
            qdcount: cursor.read_u16()?,
            ancount: cursor.read_u16()?,
            nscount: cursor.read_u16()?,
            arcount: cursor.read_u16()?,
        })
    }

    pub fn is_response(&self) -> bool {
        self.flags & FLAG_QR != 0
    }

    pub fn is_truncated(&self) -> bool {
        self.flags & FLAG_TC != 0
    }

    pub fn rcode(&self) -> u8 {
        (self.flags & RCODE_MASK) as u8
    }

    pub fn rcode_name(&self) -> &'static str {
        match self.rcode() {
            0 => "NOERROR",
            1 => "FORMERR",
            2 => "SERVFAIL",
            3 => "NXDOMAIN",
            4 => "NOTIMP",
            5 => "REFUSED",
            _ => "UNKNOWN",
        }
    }
}
