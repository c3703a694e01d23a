mod cname_query;
mod cname_response_parser;

pub use cname_query::CnameQueryPort;
pub use cname_response_parser::CnameResponseParser;
