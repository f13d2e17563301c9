//! Weekly onboarding report
//! Run: ./target/release/weekly_report --data-path data/onboarding.csv

use anyhow::Result;
use clap::Parser;
use supplier_onboarding_metrics::api::service::{overall_comparison, supplier_names, supplier_table};
use supplier_onboarding_metrics::config::ServiceConfig;
use supplier_onboarding_metrics::dataset;
use supplier_onboarding_metrics::models::{Indicator, IndicatorValues};
use supplier_onboarding_metrics::weeks::resolve_with;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "weekly_report")]
#[command(about = "Print the week-over-week onboarding comparison", long_about = None)]
struct Cli {
    #[command(flatten)]
    service: ServiceConfig,

    /// Only print the first N suppliers
    #[arg(long, default_value_t = 20)]
    limit: usize,
}

fn fmt_value(v: Option<f64>) -> String {
    v.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".to_string())
}

fn fmt_diff(v: Option<f64>) -> String {
    v.map(|v| format!("{:+.2}", v)).unwrap_or_else(|| "-".to_string())
}

fn print_indicators(current: &IndicatorValues, previous: &IndicatorValues, diff: &IndicatorValues) {
    println!("  {:<20} {:>10} {:>10} {:>10}", "Indicator", "Current", "Previous", "Diff");
    for indicator in Indicator::ALL {
        println!(
            "  {:<20} {:>10} {:>10} {:>10}",
            indicator.key(),
            fmt_value(current.get(indicator)),
            fmt_value(previous.get(indicator)),
            fmt_diff(diff.get(indicator)),
        );
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .init();

    let cli = Cli::parse();
    let records = dataset::try_load(&cli.service.data_path)?;
    let weeks = resolve_with(cli.service.today(), cli.service.rollback);

    println!("\n{}", "=".repeat(60));
    println!("         SUPPLIER ONBOARDING WEEKLY REPORT");
    println!("{}\n", "=".repeat(60));

    println!("DATASET");
    println!("{}", "-".repeat(40));
    println!("  Records:    {:>10}", records.len());
    println!("  Suppliers:  {:>10}", supplier_names(&records).len());
    println!(
        "  Undated:    {:>10}",
        records.iter().filter(|r| r.period().is_none()).count()
    );
    println!(
        "  Weeks:      {:>4}/{} vs {}/{}",
        weeks.current_week, weeks.current_year, weeks.previous_week, weeks.previous_year
    );

    println!("\nOVERALL");
    println!("{}", "-".repeat(40));
    match overall_comparison(&records, &weeks) {
        Some(cmp) => print_indicators(&cmp.current.means, &cmp.previous.means, &cmp.differences),
        None => println!("  Not enough data to compare"),
    }

    let rows = supplier_table(&records, &weeks);
    println!("\nBY SUPPLIER ({} active this week)", rows.len());
    println!("{}", "-".repeat(40));
    for row in rows.iter().take(cli.limit) {
        println!("\n  {} ({} onboarded)", row.supplier, row.total_onboarding);
        let cmp = &row.comparison;
        print_indicators(&cmp.current.means, &cmp.previous.means, &cmp.differences);
    }
    if rows.len() > cli.limit {
        println!("\n  ... {} more", rows.len() - cli.limit);
    }
    println!();

    Ok(())
}
