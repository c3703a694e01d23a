pub mod dns;
pub mod registry;
pub mod system;
