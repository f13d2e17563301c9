//! REST API Server for the supplier onboarding dashboard
//!
//! Usage:
//!   ./target/release/api_server [options]
//!
//! Options:
//!   --host HOST          Address to bind (default: 0.0.0.0)
//!   --port PORT          Port to listen on (default: 5000)
//!   --data-path PATH     Onboarding CSV (default: data/onboarding.csv)
//!   --as-of YYYY-MM-DD   Pin the reference date
//!   --rollback RULE      fixed52 | iso-calendar
//!
//! REST endpoints:
//!   GET /                        - Dashboard page
//!   GET /get_suppliers           - Supplier names
//!   GET /get_overall_metrics     - Current vs previous week, all suppliers
//!   GET /get_all_suppliers_data  - Current vs previous week, per supplier
//!   GET /api/v1/health           - Health check

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use supplier_onboarding_metrics::api::{create_rest_router, OnboardingService, ROUTES};
use supplier_onboarding_metrics::config::ServiceConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "api_server")]
#[command(about = "Serve week-over-week supplier onboarding metrics", long_about = None)]
struct Cli {
    #[arg(long, env = "ONBOARDING_HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(long, env = "ONBOARDING_PORT", default_value_t = 5000)]
    port: u16,

    #[command(flatten)]
    service: ServiceConfig,
}

fn print_banner(port: u16, config: &ServiceConfig) {
    println!("============================================================");
    println!("         SUPPLIER ONBOARDING DASHBOARD API");
    println!("============================================================");
    println!();
    println!("  Port:     {}", port);
    println!("  REST:     http://localhost:{}/", port);
    println!("  Data:     {}", config.data_path.display());
    match config.as_of {
        Some(date) => println!("  As of:    {} (pinned)", date),
        None => println!("  As of:    local clock"),
    }
    println!("  Rollback: {:?}", config.rollback);
    println!();
    println!("REST Endpoints:");
    for (path, description) in ROUTES {
        println!("  GET {:<28}{}", path, description);
    }
    println!();
    println!("============================================================");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .init();

    let cli = Cli::parse();

    print_banner(cli.port, &cli.service);

    if !cli.service.data_path.exists() {
        tracing::warn!(
            "Data file {} does not exist yet; requests will see an empty dataset",
            cli.service.data_path.display()
        );
    }

    let service = Arc::new(OnboardingService::new(cli.service));
    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;

    let app = create_rest_router(service);
    tracing::info!("Starting REST server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
