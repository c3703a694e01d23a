pub mod message_builder;
pub mod query_issuer;
pub mod response_parser;
pub mod transport;
pub mod wire;

pub use message_builder::MessageBuilder;
pub use query_issuer::{UpstreamCnameQuery, UpstreamSelection, FALLBACK_NAMESERVER};
pub use response_parser::WireCnameParser;
