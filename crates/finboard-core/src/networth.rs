//! Net-worth time-series projection
//!
//! Builds a fixed-length, chronologically ascending series of net-worth
//! samples for a timeframe. No durable balance-snapshot history exists
//! upstream, so past points are a synthetic reconstruction: current totals
//! are discounted backwards by a small randomized per-period growth factor.
//! The series is explicitly an approximation tuned for visual plausibility,
//! not a replay of historical ledger balances.
//!
//! The random source is injected so callers (and tests) control
//! reproducibility.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};
use rand::Rng;

use crate::models::{Account, NetWorthPoint};
use crate::timeframe::Timeframe;

/// Minimum displayable value; keeps near-zero portfolios off a degenerate
/// flat line.
pub const VALUE_FLOOR: f64 = 1000.0;

/// Baseline portfolio value shown to users with no accounts yet
pub const EMPTY_BASELINE: f64 = 25_000.0;

/// How the points of a timeframe are spaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stride {
    Days(i64),
    CalendarMonth,
}

/// Fixed per-timeframe point count and spacing. A lookup table, not derived
/// from the span: 30d and 90d intentionally render the same number of points.
fn series_shape(timeframe: Timeframe) -> (usize, Stride) {
    match timeframe {
        Timeframe::Week => (7, Stride::Days(1)),
        Timeframe::Month => (6, Stride::Days(5)),
        Timeframe::Quarter => (6, Stride::Days(15)),
        Timeframe::Year => (12, Stride::CalendarMonth),
    }
}

/// Current totals across active accounts: assets, liabilities, net worth
pub fn current_totals(accounts: &[Account]) -> (f64, f64, f64) {
    let mut assets = 0.0;
    let mut liabilities = 0.0;
    for account in accounts.iter().filter(|a| a.active) {
        if account.kind.is_liability() {
            liabilities += account.balance;
        } else {
            assets += account.balance;
        }
    }
    let liabilities = liabilities.abs();
    (assets, liabilities, assets - liabilities)
}

/// Project the net-worth series for a timeframe, oldest point first.
///
/// `periods_ago = 0` is "now" and reproduces the exact current totals
/// (subject to the [`VALUE_FLOOR`]); older points are discounted by
/// `1 + r * periods_ago` with `r` drawn per point from 2-5%. Liabilities are
/// assumed to shrink slower than assets grow, so their divisor is damped.
/// Users with no accounts get a monotonic compounding curve from a fixed
/// baseline instead, so the chart is never empty.
pub fn project<R: Rng>(
    accounts: &[Account],
    timeframe: Timeframe,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<NetWorthPoint> {
    let (count, stride) = series_shape(timeframe);
    let today = now.date_naive();
    let active = accounts.iter().filter(|a| a.active).count();

    if active == 0 {
        return baseline_series(count, stride, today, timeframe, rng);
    }

    let (assets, liabilities, net_worth) = current_totals(accounts);

    let mut points = Vec::with_capacity(count);
    for periods_ago in (0..count).rev() {
        let date = point_date(today, stride, periods_ago);
        let rate = rng.gen_range(0.02..0.05);
        let factor = 1.0 + rate * periods_ago as f64;

        points.push(NetWorthPoint {
            label: point_label(date, timeframe),
            net_worth: (net_worth / factor).max(VALUE_FLOOR),
            assets: (assets / factor).max(VALUE_FLOOR),
            liabilities: liabilities / (factor * 0.8).max(1.0),
        });
    }
    points
}

/// Fallback series for users with zero accounts: a fixed baseline with one
/// 2-3% per-period compounding growth rate, guaranteed monotonic.
fn baseline_series<R: Rng>(
    count: usize,
    stride: Stride,
    today: NaiveDate,
    timeframe: Timeframe,
    rng: &mut R,
) -> Vec<NetWorthPoint> {
    let growth: f64 = rng.gen_range(0.02..0.03);

    let mut points = Vec::with_capacity(count);
    for periods_ago in (0..count).rev() {
        let date = point_date(today, stride, periods_ago);
        let age = (count - 1 - periods_ago) as f64;
        let value = EMPTY_BASELINE * (1.0 + growth).powf(age);

        points.push(NetWorthPoint {
            label: point_label(date, timeframe),
            net_worth: value,
            assets: value,
            liabilities: 0.0,
        });
    }
    points
}

fn point_date(today: NaiveDate, stride: Stride, periods_ago: usize) -> NaiveDate {
    match stride {
        Stride::Days(step) => today - Duration::days(step * periods_ago as i64),
        Stride::CalendarMonth => today
            .checked_sub_months(Months::new(periods_ago as u32))
            .unwrap_or(today),
    }
}

fn point_label(date: NaiveDate, timeframe: Timeframe) -> String {
    match timeframe {
        Timeframe::Week => date.format("%a").to_string(),
        Timeframe::Month | Timeframe::Quarter => {
            format!("{} {}", date.format("%b"), date.day())
        }
        Timeframe::Year => date.format("%b").to_string(),
    }
}
