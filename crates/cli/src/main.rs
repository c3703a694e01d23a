use clap::Parser;
use cname_resolver_domain::CliOverrides;
use cname_resolver_infrastructure::registry;
use std::process::ExitCode;
use tracing::{error, info};

mod bootstrap;

#[derive(Parser)]
#[command(name = "cname-resolver")]
#[command(version)]
#[command(about = "Look up the CNAME target of one or more hostnames")]
struct Cli {
    /// Hostnames to look up
    #[arg(required = true, value_name = "HOSTNAME")]
    hostnames: Vec<String>,

    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Nameserver to query (ip or ip:port), replaces the configured list
    #[arg(short = 'n', long)]
    nameserver: Option<String>,

    /// Per-query timeout in milliseconds
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Do not re-send truncated replies over TCP
    #[arg(long)]
    no_tcp: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Log as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        nameserver: cli.nameserver.clone(),
        query_timeout_ms: cli.timeout_ms,
        disable_tcp_fallback: cli.no_tcp,
        log_level: cli.log_level.clone(),
        json_logs: cli.json_logs,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting cname-resolver v{}", env!("CARGO_PKG_VERSION"));

    registry::init_resolver(&config.resolver)?;
    info!(count = cli.hostnames.len(), "Resolving hostnames");

    let mut failures = 0usize;
    for hostname in &cli.hostnames {
        match registry::resolve_cname(hostname).await {
            Ok(lookup) => match lookup.cname() {
                Some(cname) => println!("{} is an alias for {}", hostname, cname),
                None => println!("{} has no CNAME record", hostname),
            },
            Err(e) => {
                error!(hostname = %hostname, error = %e, "CNAME lookup failed");
                eprintln!("{}: {}", hostname, e);
                failures += 1;
            }
        }
    }

    registry::shutdown_resolver();

    if failures > 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
