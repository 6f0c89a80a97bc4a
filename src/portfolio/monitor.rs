//! Timer-driven price polling
//!
//! Refreshes the portfolio from a [`PriceSource`] on a fixed interval and
//! hands each fresh summary to a callback. The loop ends on the shutdown
//! future or after `max_ticks` refreshes.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use log::{debug, info};
use tokio::time::{interval, MissedTickBehavior};

use super::price::PriceSource;
use crate::error::{CalcError, CalcResult};
use super::summary::PortfolioSummary;
use super::{Portfolio, RefreshReport};

/// Default refresh interval, matching the dashboard's 30s poll
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy)]
pub struct MonitorConfig {
    pub interval: Duration,

    /// Stop after this many refreshes; `None` runs until shutdown
    pub max_ticks: Option<u32>,
}

impl MonitorConfig {
    /// Build a config, rejecting a zero interval
    pub fn new(interval: Duration, max_ticks: Option<u32>) -> CalcResult<Self> {
        let config = Self { interval, max_ticks };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CalcResult<()> {
        if self.interval.is_zero() {
            return Err(CalcError::InvalidInput {
                field: "poll_interval",
                value: 0.0,
                reason: "must be greater than zero",
            });
        }
        Ok(())
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_ticks: None,
        }
    }
}

/// Poll `source` until `shutdown` resolves or the tick limit is reached
///
/// The first refresh happens immediately. Returns the number of refreshes
/// run, or an error before polling starts when the interval is zero.
pub async fn watch<F, S>(
    portfolio: &mut Portfolio,
    source: &dyn PriceSource,
    config: MonitorConfig,
    shutdown: S,
    mut on_tick: F,
) -> CalcResult<u32>
where
    F: FnMut(u32, &RefreshReport, &PortfolioSummary),
    S: Future<Output = ()>,
{
    config.validate()?;

    let mut ticker = interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    let mut ticks = 0;
    loop {
        if config.max_ticks.is_some_and(|max| ticks >= max) {
            break;
        }

        tokio::select! {
            _ = &mut shutdown => {
                info!("price monitor stopping after {} refreshes", ticks);
                break;
            }
            _ = ticker.tick() => {
                ticks += 1;
                debug!("price refresh #{}", ticks);
                let report = portfolio.refresh_prices(source, Utc::now());
                on_tick(ticks, &report, &portfolio.summary());
            }
        }
    }

    Ok(ticks)
}
