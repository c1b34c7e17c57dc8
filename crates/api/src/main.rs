use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;

use tillbook_api::{ReportArgs, ReportKind, ReportService, run_report};
use tillbook_core::TenantId;
use tillbook_infra::{AppConfig, InMemoryPosStore, Seed};

#[derive(Debug, Parser)]
#[command(name = "tillbook-report")]
#[command(version, about = "Print one analytics report for a tenant as JSON", long_about = None)]
struct Cli {
    /// Seed document (categories, products, inventory, invoices)
    seed: PathBuf,

    /// Tenant to report on
    tenant: TenantId,

    /// sales-summary, inventory, growth, best-sellers, monthly or periodic
    report: ReportKind,

    /// Range token (7d, 30d, 90d, 1y, week, month, year, custom) or, for
    /// `periodic`, a granularity (daily, monthly, yearly, custom)
    selector: Option<String>,

    /// Start bound, RFC 3339 or YYYY-MM-DD
    start: Option<String>,

    /// End bound, RFC 3339 or YYYY-MM-DD
    end: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tillbook_observability::init();
    let cli = Cli::parse();

    let config = AppConfig::from_env()?;
    let store = InMemoryPosStore::new(&config);
    Seed::from_path(&cli.seed)
        .and_then(|seed| seed.load_into(&store))
        .with_context(|| format!("failed to load seed '{}'", cli.seed.display()))?;

    let args = ReportArgs {
        selector: cli.selector,
        start_date: cli.start,
        end_date: cli.end,
    };
    let service = ReportService::new(store, &config);
    match run_report(&service, cli.tenant, cli.report, &args) {
        Ok(body) => {
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(())
        }
        Err(err) => {
            println!("{}", serde_json::to_string_pretty(&err)?);
            bail!("{err}")
        }
    }
}
