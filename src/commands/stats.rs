use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::calc::{classify, Feedback};
use crate::commands::settings::get_settings;
use crate::commands::trades::{get_trade, list_trades};
use crate::db::Database;
use crate::error::Result;
use crate::stats::{self, DashboardStats, Period};

/// One point of the balance chart. The first point carries the settings
/// creation instant and the initial capital.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalancePoint {
    pub timestamp: i64,
    pub balance: f64,
}

pub fn get_dashboard_stats(db: &Database) -> Result<DashboardStats> {
    let settings = get_settings(db)?;
    let trades = list_trades(db, None)?;
    Ok(stats::dashboard_stats(&settings, &trades))
}

/// Chronological running balance for the chart: starting capital plus one
/// point per trade.
pub fn get_balance_curve(db: &Database) -> Result<Vec<BalancePoint>> {
    let settings = get_settings(db)?;
    let mut trades = list_trades(db, None)?;
    trades.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));

    let mut curve = Vec::with_capacity(trades.len() + 1);
    let mut balance = settings.initial_capital;
    curve.push(BalancePoint {
        timestamp: settings.created_at,
        balance,
    });
    for trade in &trades {
        balance += trade.profit_loss;
        curve.push(BalancePoint {
            timestamp: trade.timestamp,
            balance,
        });
    }

    Ok(curve)
}

pub fn get_period_growth(db: &Database, period: Period) -> Result<f64> {
    let settings = get_settings(db)?;
    let trades = list_trades(db, None)?;
    Ok(stats::period_growth(&settings, &trades, period, Utc::now()))
}

/// Qualitative feedback for a single recorded trade.
pub fn get_trade_feedback(db: &Database, id: &str) -> Result<Feedback> {
    let settings = get_settings(db)?;
    let trade = get_trade(db, id)?;
    Ok(classify(&trade, &settings))
}
