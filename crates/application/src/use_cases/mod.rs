pub mod resolve_cname;

pub use resolve_cname::ResolveCnameUseCase;
