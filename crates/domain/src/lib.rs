//! CNAME Resolver Domain Layer
pub mod cname_lookup;
pub mod config;
pub mod dns_record;
pub mod errors;

pub use cname_lookup::{CnameAnswer, CnameLookup};
pub use config::{CliOverrides, Config, ConfigError, LoggingConfig, ResolverConfig};
pub use dns_record::RecordType;
pub use errors::DomainError;
