//! SIP sensitivity grid
//!
//! Projects one monthly contribution across a grid of annual returns and
//! horizons and writes the results as CSV.
//! Supports JSON output via --json flag
//! Accepts config via environment variables:
//!   SIP_MONTHLY, SIP_RATES (comma separated percent), SIP_YEARS (comma separated),
//!   SIP_OUTPUT (CSV path), FINPROJ_* settings overrides

use std::env;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;

use finance_projection::config::DEFAULT_SETTINGS_PATH;
use finance_projection::{Planner, Settings};

const DEFAULT_MONTHLY: f64 = 10_000.0;
const DEFAULT_RATES: &[f64] = &[6.0, 8.0, 10.0, 12.0, 14.0];
const DEFAULT_YEARS: &[u32] = &[5, 10, 15, 20, 25, 30];
const DEFAULT_OUTPUT: &str = "sip_grid.csv";

fn parse_list<T: std::str::FromStr>(key: &str, default: &[T]) -> Vec<T>
where
    T: Clone,
{
    env::var(key)
        .ok()
        .and_then(|s| {
            s.split(',')
                .map(|part| part.trim().parse().ok())
                .collect::<Option<Vec<T>>>()
        })
        .filter(|values| !values.is_empty())
        .unwrap_or_else(|| default.to_vec())
}

fn main() -> Result<()> {
    env_logger::init();

    let json_output = env::args().any(|arg| arg == "--json");
    let start = Instant::now();

    let monthly: f64 = env::var("SIP_MONTHLY")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_MONTHLY);
    let rates: Vec<f64> = parse_list("SIP_RATES", DEFAULT_RATES);
    let years: Vec<u32> = parse_list("SIP_YEARS", DEFAULT_YEARS);
    let output = env::var("SIP_OUTPUT").unwrap_or_else(|_| DEFAULT_OUTPUT.to_string());

    let settings = Settings::load(Path::new(DEFAULT_SETTINGS_PATH)).context("failed to load settings")?;
    let currency = settings.currency;
    let planner = Planner::new(settings);

    info!("SIP grid: {} rates x {} horizons", rates.len(), years.len());
    let grid = planner
        .sip_grid(monthly, &rates, &years)
        .context("grid projection failed")?;

    let mut writer = csv::Writer::from_path(&output)
        .with_context(|| format!("unable to create {}", output))?;
    for point in &grid {
        writer.serialize(point)?;
    }
    writer.flush()?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&grid)?);
        return Ok(());
    }

    println!("SIP of {}/month", currency.format(monthly));
    print!("{:>6}", "Years");
    for rate in &rates {
        print!(" {:>20}", format!("{}%", rate));
    }
    println!();
    println!("{}", "-".repeat(6 + 21 * rates.len()));

    // Grid is rate-major; print one row per horizon
    for (y_idx, y) in years.iter().enumerate() {
        print!("{:>6}", y);
        for r_idx in 0..rates.len() {
            let point = &grid[r_idx * years.len() + y_idx];
            print!(" {:>20}", currency.format(point.future_value));
        }
        println!();
    }

    println!("\nResults written to: {}", output);
    println!("Completed in {:.2?}", start.elapsed());
    Ok(())
}
