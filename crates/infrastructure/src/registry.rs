//! Process-wide resolver instance.
//!
//! Created once at startup with [`init_resolver`] (or [`install_resolver`]
//! for a pre-built façade) and released with [`shutdown_resolver`]. Lookups
//! already holding an `Arc` finish normally after shutdown.

use crate::dns::{UpstreamCnameQuery, WireCnameParser};
use arc_swap::ArcSwapOption;
use cname_resolver_application::use_cases::ResolveCnameUseCase;
use cname_resolver_domain::{CnameLookup, DomainError, ResolverConfig};
use std::sync::Arc;
use tracing::{info, warn};

static RESOLVER: ArcSwapOption<ResolveCnameUseCase> = ArcSwapOption::const_empty();

/// Builds the UDP/TCP query issuer and wire parser from `config` and installs
/// the resulting façade as the process-wide resolver.
pub fn init_resolver(config: &ResolverConfig) -> Result<Arc<ResolveCnameUseCase>, DomainError> {
    let query = UpstreamCnameQuery::from_config(config)?;
    let use_case = Arc::new(ResolveCnameUseCase::new(
        Arc::new(query),
        Arc::new(WireCnameParser::new()),
    ));

    install_resolver(use_case.clone());
    Ok(use_case)
}

pub fn install_resolver(use_case: Arc<ResolveCnameUseCase>) {
    if RESOLVER.swap(Some(use_case)).is_some() {
        warn!("CNAME resolver replaced while already initialized");
    } else {
        info!("CNAME resolver initialized");
    }
}

/// Returns `true` when an instance was installed.
pub fn shutdown_resolver() -> bool {
    let previous = RESOLVER.swap(None);
    if previous.is_some() {
        info!("CNAME resolver shut down");
    }
    previous.is_some()
}

pub fn resolver() -> Option<Arc<ResolveCnameUseCase>> {
    RESOLVER.load_full()
}

/// Resolves through the process-wide instance.
pub async fn resolve_cname(hostname: &str) -> Result<CnameLookup, DomainError> {
    let use_case = resolver().ok_or(DomainError::ResolverNotInitialized)?;
    use_case.execute(hostname).await
}
