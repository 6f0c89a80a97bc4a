//! Finance projection CLI
//!
//! Command-line front end for the calculators

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;

use finance_projection::portfolio::loader::load_portfolio;
use finance_projection::portfolio::monitor::{self, MonitorConfig};
use finance_projection::portfolio::CsvPriceFeed;
use finance_projection::projection::{compound, goal, sip, Goal};
use finance_projection::retirement::GapStatus;
use finance_projection::tax::{load_brackets, TaxTable};
use finance_projection::{
    CompoundingFrequency, Currency, PortfolioSummary, ProjectionInput, ProjectionResult,
    RetirementPolicy, RetirementScenario, ScenarioBook, Settings,
};

#[derive(Parser, Debug)]
#[command(name = "finproj")]
#[command(about = "Personal-finance projections: SIP, compound interest, retirement, tax, portfolio")]
struct Cli {
    /// Settings file (JSON); defaults apply when missing
    #[arg(long, global = true, default_value = finance_projection::config::DEFAULT_SETTINGS_PATH)]
    settings: PathBuf,

    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Future value of a monthly SIP
    Sip {
        #[arg(long)]
        monthly: f64,
        /// Expected annual return in percent
        #[arg(long)]
        rate: f64,
        #[arg(long)]
        years: u32,
        /// Write the yearly breakdown to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Monthly SIP needed to reach a target
    SipTarget {
        #[arg(long)]
        target: f64,
        #[arg(long)]
        rate: f64,
        #[arg(long)]
        years: u32,
    },
    /// Lump-sum compound interest
    Compound {
        #[arg(long)]
        principal: f64,
        #[arg(long)]
        rate: f64,
        #[arg(long)]
        years: u32,
        /// Compounding periods per year (1, 2, 4 or 12)
        #[arg(long)]
        frequency: Option<u32>,
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Monthly SIP needed for an inflation-adjusted goal
    Goal {
        #[arg(long, default_value = "Goal")]
        name: String,
        /// Cost of the goal in today's money
        #[arg(long)]
        target: f64,
        #[arg(long)]
        years: u32,
        #[arg(long, default_value_t = 6.0)]
        inflation: f64,
        #[arg(long)]
        rate: f64,
        #[arg(long, default_value_t = 0.0)]
        savings: f64,
    },
    /// Retirement corpus projection
    Retirement {
        /// JSON file with a list of scenarios; overrides the individual flags
        #[arg(long)]
        scenarios: Option<PathBuf>,
        /// Scenario to project from --scenarios (first one otherwise)
        #[arg(long)]
        select: Option<String>,
        #[arg(long, default_value_t = 30)]
        current_age: u32,
        #[arg(long, default_value_t = 60)]
        retirement_age: u32,
        #[arg(long, default_value_t = 0.0)]
        savings: f64,
        #[arg(long, default_value_t = 0.0)]
        monthly: f64,
        #[arg(long, default_value_t = 10.0)]
        rate: f64,
        /// Monthly expenses in retirement at today's prices
        #[arg(long, default_value_t = 0.0)]
        expenses: f64,
        #[arg(long, default_value_t = 6.0)]
        inflation: f64,
        /// Safe withdrawal rate in percent; overrides the configured years of expenses
        #[arg(long)]
        withdrawal_rate: Option<f64>,
    },
    /// Progressive income tax
    Tax {
        /// Gross annual income
        #[arg(long)]
        income: f64,
        /// Itemized deduction amounts (repeatable)
        #[arg(long)]
        itemized: Vec<f64>,
        /// Built-in table name (us-2024-single, in-2024-new-regime)
        #[arg(long)]
        table: Option<String>,
        /// Load brackets from a CSV file instead of a built-in table
        #[arg(long)]
        brackets: Option<PathBuf>,
        /// Standard deduction used with --brackets
        #[arg(long, default_value_t = 0.0)]
        standard_deduction: f64,
    },
    /// Value a portfolio from a holdings CSV
    Portfolio {
        #[arg(long)]
        holdings: PathBuf,
        /// Refresh prices from this CSV before valuing
        #[arg(long)]
        prices: Option<PathBuf>,
    },
    /// Poll a price file and print the portfolio on every refresh
    Watch {
        #[arg(long)]
        holdings: PathBuf,
        #[arg(long)]
        prices: PathBuf,
        /// Seconds between refreshes; defaults to the configured interval
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,
        /// Stop after this many refreshes
        #[arg(long)]
        ticks: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let settings = Settings::load(&cli.settings)
        .with_context(|| format!("failed to load settings from {}", cli.settings.display()))?;
    let currency = settings.currency;

    match cli.command {
        Command::Sip { monthly, rate, years, csv } => {
            let result = sip::project(&ProjectionInput::new(monthly, rate, years))?;
            if let Some(path) = csv {
                write_breakdown(&path, &result)?;
            }
            if cli.json {
                return print_json(&result);
            }
            println!("SIP of {}/month at {}% for {} years", currency.format(monthly), rate, years);
            print_projection(&result, currency);
        }
        Command::SipTarget { target, rate, years } => {
            let monthly = sip::required_monthly_contribution(target, rate, years)?;
            if cli.json {
                return print_json(&serde_json::json!({ "target": target, "monthly": monthly }));
            }
            println!(
                "To reach {} in {} years at {}%: invest {}/month",
                currency.format(target),
                years,
                rate,
                currency.format(monthly)
            );
        }
        Command::Compound { principal, rate, years, frequency, csv } => {
            let frequency = match frequency {
                Some(periods) => CompoundingFrequency::from_periods(periods)
                    .ok_or_else(|| anyhow!("frequency must be 1, 2, 4 or 12, got {}", periods))?,
                None => settings.default_compounding,
            };
            let input = ProjectionInput::new(principal, rate, years).with_compounding(frequency);
            let result = compound::project(&input)?;
            if let Some(path) = csv {
                write_breakdown(&path, &result)?;
            }
            if cli.json {
                return print_json(&result);
            }
            println!(
                "{} at {}% compounded {} for {} years",
                currency.format(principal),
                rate,
                frequency.as_str(),
                years
            );
            print_projection(&result, currency);
        }
        Command::Goal { name, target, years, inflation, rate, savings } => {
            let plan = goal::plan(&Goal {
                name,
                target_today: target,
                years,
                inflation_percent: inflation,
                expected_return_percent: rate,
                current_savings: savings,
            })?;
            if cli.json {
                return print_json(&plan);
            }
            println!("Goal: {}", plan.name);
            println!("  Target in {} years:   {}", years, currency.format(plan.inflated_target));
            println!("  Savings will grow to: {}", currency.format(plan.savings_future_value));
            println!("  Still needed:         {}", currency.format(plan.remaining));
            println!("  Monthly SIP needed:   {}", currency.format(plan.required_monthly_sip));
        }
        Command::Retirement {
            scenarios,
            select,
            current_age,
            retirement_age,
            savings,
            monthly,
            rate,
            expenses,
            inflation,
            withdrawal_rate,
        } => {
            let policy = match withdrawal_rate {
                Some(pct) => RetirementPolicy::from_withdrawal_rate(pct)?,
                None => settings.retirement_policy()?,
            };

            let mut book = ScenarioBook::new();
            match scenarios {
                Some(path) => {
                    for scenario in read_scenarios(&path)? {
                        book.add(scenario);
                    }
                    if let Some(name) = select {
                        if !book.select(&name) {
                            bail!("no scenario named {} in {}", name, path.display());
                        }
                    }
                }
                None => book.add(RetirementScenario {
                    name: "cli".to_string(),
                    current_age,
                    retirement_age,
                    current_savings: savings,
                    monthly_contribution: monthly,
                    expected_return_percent: rate,
                    monthly_expenses_in_retirement: expenses,
                    inflation_rate_percent: inflation,
                }),
            }

            let plan = book
                .project_active(&policy)
                .ok_or_else(|| anyhow!("no retirement scenario to project"))??;
            if cli.json {
                return print_json(&plan);
            }

            println!("Scenario: {} ({} years to retirement)", plan.scenario, plan.years_to_retirement);
            println!("  Savings grow to:        {}", currency.format(plan.savings_future_value));
            println!("  Contributions grow to:  {}", currency.format(plan.contributions_future_value));
            println!("  Projected corpus:       {}", currency.format(plan.projected_corpus));
            println!("  Monthly expenses then:  {}", currency.format(plan.future_monthly_expenses));
            println!(
                "  Required corpus:        {} ({} years of expenses)",
                currency.format(plan.required_corpus),
                policy.years_of_expenses
            );
            match plan.status {
                GapStatus::Shortfall => {
                    println!("  Shortfall:              {}", currency.format(plan.gap));
                    println!("  Extra SIP needed:       {}/month", currency.format(plan.additional_monthly_needed));
                }
                GapStatus::Surplus => {
                    println!("  Surplus:                {}", currency.format(-plan.gap));
                }
            }
        }
        Command::Tax { income, itemized, table, brackets, standard_deduction } => {
            let table = match brackets {
                Some(path) => {
                    let brackets = load_brackets(&path)
                        .with_context(|| format!("failed to load brackets from {}", path.display()))?;
                    let name = path
                        .file_stem()
                        .map(|s| s.to_string_lossy().into_owned())
                        .unwrap_or_else(|| "custom".to_string());
                    TaxTable::new(name, brackets, standard_deduction)?
                }
                None => {
                    let name = table.unwrap_or_else(|| settings.tax_table.clone());
                    TaxTable::preset(&name).ok_or_else(|| {
                        anyhow!("unknown tax table {} (known: {})", name, TaxTable::preset_names().join(", "))
                    })?
                }
            };

            let report = table.assess(income, &itemized)?;
            if cli.json {
                return print_json(&report);
            }

            println!("Tax table: {}", report.table);
            println!("  Gross income:    {}", currency.format(report.gross_income));
            println!("  Deduction:       {} ({:?})", currency.format(report.deduction.amount), report.deduction.kind);
            println!("  Taxable income:  {}", currency.format(report.taxable_income));
            println!("{:>16} {:>16} {:>6} {:>16}", "From", "To", "Rate", "Tax");
            for slice in &report.slices {
                let to = slice
                    .bracket
                    .max
                    .map(|m| currency.format(m))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:>16} {:>16} {:>5}% {:>16}",
                    currency.format(slice.bracket.min),
                    to,
                    slice.bracket.rate_percent,
                    currency.format(slice.tax)
                );
            }
            if report.cess > 0.0 {
                println!("  Cess:            {}", currency.format(report.cess));
            }
            println!("  Total tax:       {}", currency.format(report.total_tax));
            println!("  Effective rate:  {:.2}%", report.effective_rate_percent);
            println!("  Marginal rate:   {}%", report.marginal_rate_percent);
        }
        Command::Portfolio { holdings, prices } => {
            let mut portfolio = load_portfolio(&holdings)
                .with_context(|| format!("failed to load holdings from {}", holdings.display()))?;
            if let Some(path) = prices {
                let report = portfolio.refresh_prices(&CsvPriceFeed::new(path), Utc::now());
                for (symbol, err) in &report.failed {
                    eprintln!("warning: {}: {}", symbol, err);
                }
            }
            let summary = portfolio.summary();
            if cli.json {
                return print_json(&summary);
            }
            print_summary(&summary, currency);
        }
        Command::Watch { holdings, prices, interval, ticks } => {
            let mut portfolio = load_portfolio(&holdings)
                .with_context(|| format!("failed to load holdings from {}", holdings.display()))?;
            let source = CsvPriceFeed::new(prices);
            let config = MonitorConfig::new(
                interval.map(Duration::from_secs).unwrap_or_else(|| settings.poll_interval()),
                ticks,
            )?;
            let json = cli.json;

            let shutdown = async {
                // If the handler cannot be installed, run until the tick limit
                if tokio::signal::ctrl_c().await.is_err() {
                    std::future::pending::<()>().await;
                }
            };
            monitor::watch(&mut portfolio, &source, config, shutdown, |tick, report, summary| {
                if json {
                    match serde_json::to_string(summary) {
                        Ok(line) => println!("{}", line),
                        Err(e) => eprintln!("error: {}", e),
                    }
                    return;
                }
                println!("\n[{}] refresh #{} ({} updated, {} failed)",
                    Utc::now().format("%H:%M:%S"), tick, report.updated.len(), report.failed.len());
                print_summary(summary, currency);
            })
            .await?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_projection(result: &ProjectionResult, currency: Currency) {
    println!("{:>5} {:>20} {:>20} {:>20}", "Year", "Invested", "Value", "Gain");
    println!("{}", "-".repeat(68));
    for row in &result.yearly_breakdown {
        println!(
            "{:>5} {:>20} {:>20} {:>20}",
            row.year,
            currency.format(row.invested),
            currency.format(row.value),
            currency.format(row.gain)
        );
    }
    println!("\nSummary:");
    println!("  Total invested: {}", currency.format(result.total_contributed));
    println!("  Future value:   {}", currency.format(result.future_value));
    println!("  Total gain:     {}", currency.format(result.total_gain));
}

fn print_summary(summary: &PortfolioSummary, currency: Currency) {
    println!("{:<14} {:<12} {:>18} {:>18} {:>18} {:>9}", "Symbol", "Kind", "Cost", "Value", "Gain/Loss", "%");
    println!("{}", "-".repeat(94));
    for h in &summary.holdings {
        let pct = h.gain_loss_percent.map(|p| format!("{:.2}", p)).unwrap_or_else(|| "-".to_string());
        println!(
            "{:<14} {:<12} {:>18} {:>18} {:>18} {:>9}",
            h.symbol,
            h.kind.as_str(),
            currency.format(h.cost_basis),
            currency.format(h.current_value),
            currency.format(h.gain_loss),
            pct
        );
    }
    println!("\nTotals:");
    println!("  Cost basis:  {}", currency.format(summary.total_cost));
    println!("  Value:       {}", currency.format(summary.total_value));
    match summary.total_gain_loss_percent {
        Some(pct) => println!("  Gain/Loss:   {} ({:.2}%)", currency.format(summary.total_gain_loss), pct),
        None => println!("  Gain/Loss:   {}", currency.format(summary.total_gain_loss)),
    }
    for slice in &summary.allocation {
        println!("  {:<12} {:>6.2}%", slice.kind.as_str(), slice.weight_percent);
    }
}

fn write_breakdown(path: &Path, result: &ProjectionResult) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("unable to create {}", path.display()))?;
    for row in &result.yearly_breakdown {
        writer.serialize(row)?;
    }
    writer.flush()?;
    println!("Breakdown written to: {}", path.display());
    Ok(())
}

fn read_scenarios(path: &Path) -> Result<Vec<RetirementScenario>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("unable to read {}", path.display()))?;
    let scenarios: Vec<RetirementScenario> = serde_json::from_str(&text)
        .with_context(|| format!("invalid scenario list in {}", path.display()))?;
    if scenarios.is_empty() {
        bail!("{} contains no scenarios", path.display());
    }
    Ok(scenarios)
}
