use std::fmt;

/// Outcome of walking a CNAME reply.
///
/// A reply that contradicts the question is not represented here; the parser
/// reports it as [`crate::DomainError::MalformedResponse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CnameAnswer {
    Found(String),
    NotFound,
}

/// Result handed back to callers of `resolve_cname`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CnameLookup {
    pub found: bool,
    pub cname: String,
}

impl CnameLookup {
    pub fn found(cname: impl Into<String>) -> Self {
        Self {
            found: true,
            cname: cname.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::default()
    }

    pub fn cname(&self) -> Option<&str> {
        self.found.then_some(self.cname.as_str())
    }
}

impl From<CnameAnswer> for CnameLookup {
    fn from(answer: CnameAnswer) -> Self {
        match answer {
            CnameAnswer::Found(name) => Self::found(name),
            CnameAnswer::NotFound => Self::not_found(),
        }
    }
}

impl fmt::Display for CnameLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cname() {
            Some(name) => write!(f, "CNAME {}", name),
            None => write!(f, "no CNAME"),
        }
    }
}
