//! Domain name expansion (RFC 1035 §4.1.4)
//!
//! Names are a sequence of length-prefixed labels ending in a zero octet or
//! in a two-octet pointer to an earlier offset of the same message. Pointers
//! must point strictly before themselves, the number of jumps is capped, and
//! the expanded name may not exceed 255 octets.

use std::fmt;

/// Maximum length of an expanded name, in wire octets and in text.
pub const MAX_NAME_LEN: usize = 255;

/// Upper bound on compression pointers followed while expanding one name.
pub const MAX_POINTER_HOPS: usize = 127;

const POINTER_MASK: u8 = 0xC0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameError {
    Truncated { offset: usize },
    ForwardPointer { offset: usize, target: usize },
    TooManyPointers,
    NameTooLong,
    UnsupportedLabel { offset: usize, kind: u8 },
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameError::Truncated { offset } => {
                write!(f, "name truncated at offset {}", offset)
            }
            NameError::ForwardPointer { offset, target } => write!(
                f,
                "compression pointer at offset {} targets offset {}",
                offset, target
            ),
            NameError::TooManyPointers => {
                write!(f, "more than {} compression pointers", MAX_POINTER_HOPS)
            }
            NameError::NameTooLong => write!(f, "name longer than {} octets", MAX_NAME_LEN),
            NameError::UnsupportedLabel { offset, kind } => {
                write!(f, "unsupported label type 0x{:02x} at offset {}", kind, offset)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedName {
    /// Presentation form without the trailing dot; the root name is `"."`.
    pub name: String,
    /// Octets occupied at the starting offset, up to and including the
    /// terminating zero or the first pointer.
    pub consumed: usize,
}

pub fn expand_name(message: &[u8], start: usize) -> Result<ExpandedName, NameError> {
    let mut pos = start;
    let mut consumed: Option<usize> = None;
    let mut wire_len = 0usize;
    let mut hops = 0usize;
    let mut name = String::new();

    loop {
        let len_byte = *message.get(pos).ok_or(NameError::Truncated { offset: pos })?;

        match len_byte & POINTER_MASK {
            0x00 => {
                let label_len = len_byte as usize;
                if label_len == 0 {
                    if consumed.is_none() {
                        consumed = Some(pos + 1 - start);
                    }
                    break;
                }

                let label = message
                    .get(pos + 1..pos + 1 + label_len)
                    .ok_or(NameError::Truncated { offset: pos })?;

                // length octet + label, plus the terminating zero still to come
                wire_len += label_len + 1;
                if wire_len + 1 > MAX_NAME_LEN {
                    return Err(NameError::NameTooLong);
                }

                if !name.is_empty() {
                    name.push('.');
                }
                push_label(&mut name, label);
                if name.len() > MAX_NAME_LEN {
                    return Err(NameError::NameTooLong);
                }

                pos += 1 + label_len;
            }
            POINTER_MASK => {
                let low = *message
                    .get(pos + 1)
                    .ok_or(NameError::Truncated { offset: pos })?;
                let target = (((len_byte & !POINTER_MASK) as usize) << 8) | low as usize;

                if target >= pos {
                    return Err(NameError::ForwardPointer {
                        offset: pos,
                        target,
                    });
                }

                hops += 1;
                if hops > MAX_POINTER_HOPS {
                    return Err(NameError::TooManyPointers);
                }

                if consumed.is_none() {
                    consumed = Some(pos + 2 - start);
                }
                pos = target;
            }
            kind => {
                return Err(NameError::UnsupportedLabel { offset: pos, kind });
            }
        }
    }

    if name.is_empty() {
        name.push('.');
    }

    Ok(ExpandedName {
        name,
        consumed: consumed.unwrap_or(0),
    })
}

/// Appends a label in presentation form, escaping the characters that
/// would otherwise change its meaning in a master file.
fn push_label(out: &mut String, label: &[u8]) {
    for &b in label {
        match b {
            b'.' | b'\\' | b'"' | b';' | b'(' | b')' | b'@' | b'$' => {
                out.push('\\');
                out.push(b as char);
            }
            0x21..=0x7e => out.push(b as char),
            _ => {
                out.push('\\');
                out.push_str(&format!("{:03}", b));
            }
        }
    }
}
