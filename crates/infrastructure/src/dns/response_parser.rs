use super::wire::{expand_name, OutOfBounds, WireCursor, HEADER_LEN};
use cname_resolver_application::ports::CnameResponseParser;
use cname_resolver_domain::{CnameAnswer, DomainError, RecordType};
use tracing::debug;

/// QTYPE + QCLASS
const QUESTION_FIXED_LEN: usize = 4;
/// TYPE + CLASS + TTL + RDLENGTH
const ANSWER_FIXED_LEN: usize = 10;

/// Extracts the target of the first answer record of a CNAME reply.
///
/// The walk is header, question name, question type/class, first answer
/// owner, answer fixed fields, RDATA name. Anything wrong up to and including
/// the question type is a malformed reply. A missing or unreadable answer
/// name or RDATA means there is no CNAME.
///
/// The answer's TYPE is only logged: whatever name sits in the first RDATA
/// is returned as the CNAME target.
#[derive(Debug, Default, Clone, Copy)]
pub struct WireCnameParser;

impl WireCnameParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(response: &[u8]) -> Result<CnameAnswer, DomainError> {
        let mut cursor = WireCursor::new(response);

        cursor
            .skip(HEADER_LEN)
            .map_err(|e| malformed(format!("reply shorter than header: {}", e)))?;

        let question = expand_name(response, cursor.position())
            .map_err(|e| malformed(format!("bad question name: {}", e)))?;
        cursor.skip(question.consumed).map_err(out_of_bounds)?;

        cursor
            .ensure(QUESTION_FIXED_LEN)
            .map_err(|e| malformed(format!("bad reply: {}", e)))?;
        let qtype = RecordType::from_u16(cursor.read_u16().map_err(out_of_bounds)?);
        if qtype != RecordType::CNAME {
            return Err(malformed(format!(
                "question type is {}, expected {}",
                qtype,
                RecordType::CNAME
            )));
        }
        cursor.skip(2).map_err(out_of_bounds)?; // class

        let owner = match expand_name(response, cursor.position()) {
            Ok(owner) => owner,
            Err(e) => {
                debug!(question = %question.name, error = %e, "No readable answer record");
                return Ok(CnameAnswer::NotFound);
            }
        };
        cursor.skip(owner.consumed).map_err(out_of_bounds)?;
        debug!(name = %owner.name, "Answer owner");

        cursor
            .ensure(ANSWER_FIXED_LEN)
            .map_err(|e| malformed(format!("bad reply: {}", e)))?;
        let rtype = RecordType::from_u16(cursor.read_u16().map_err(out_of_bounds)?);
        let class = cursor.read_u16().map_err(out_of_bounds)?;
        let ttl = cursor.read_u32().map_err(out_of_bounds)?;
        // not trusted: the RDATA name is bounds-checked on its own
        let rdlength = cursor.read_u16().map_err(out_of_bounds)?;
        debug!(record_type = %rtype, class, ttl, rdlength, "Answer fixed fields");

        match expand_name(response, cursor.position()) {
            Ok(target) => {
                debug!(
                    question = %question.name,
                    record_type = %rtype,
                    cname = %target.name,
                    "CNAME target decoded"
                );
                Ok(CnameAnswer::Found(target.name))
            }
            Err(e) => {
                debug!(
                    question = %question.name,
                    record_type = %rtype,
                    error = %e,
                    "Unreadable RDATA name"
                );
                Ok(CnameAnswer::NotFound)
            }
        }
    }
}

impl CnameResponseParser for WireCnameParser {
    fn parse_cname(&self, response: &[u8]) -> Result<CnameAnswer, DomainError> {
        Self::parse(response)
    }
}

fn malformed(reason: String) -> DomainError {
    DomainError::MalformedResponse(reason)
}

fn out_of_bounds(e: OutOfBounds) -> DomainError {
    malformed(e.to_string())
}
