//! DNS Message Builder
//!
//! Constructs CNAME query messages in wire format using `hickory-proto`.

use cname_resolver_domain::DomainError;
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name, RecordType};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::str::FromStr;

/// Builds DNS query messages in wire format
pub struct MessageBuilder;

impl MessageBuilder {
    /// Build a recursive CNAME/IN query with a random ID
    ///
    /// Returns the ID alongside the bytes so the reply can be matched.
    pub fn build_cname_query(hostname: &str) -> Result<(u16, Vec<u8>), DomainError> {
        Self::build_cname_query_with_id(hostname, fastrand::u16(..))
    }

    pub fn build_cname_query_with_id(
        hostname: &str,
        id: u16,
    ) -> Result<(u16, Vec<u8>), DomainError> {
        if hostname.is_empty() {
            return Err(DomainError::InvalidDomainName(
                "hostname is empty".to_string(),
            ));
        }

        let name = Name::from_str(hostname).map_err(|e| {
            DomainError::InvalidDomainName(format!("Invalid domain '{}': {}", hostname, e))
        })?;

        let mut query = Query::new();
        query.set_name(name);
        query.set_query_type(RecordType::CNAME);
        query.set_query_class(DNSClass::IN);

        let mut message = Message::new(id, MessageType::Query, OpCode::Query);
        message.set_recursion_desired(true);
        message.add_query(query);

        let bytes = Self::serialize_message(&message)?;
        Ok((id, bytes))
    }

    /// Serialize a Message to wire format bytes
    fn serialize_message(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message.emit(&mut encoder).map_err(|e| {
            DomainError::InvalidDomainName(format!("Failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }
}
