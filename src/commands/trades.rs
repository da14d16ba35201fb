use chrono::Utc;

use crate::calc::{calculate_multi_close, calculate_outcome, manual_outcome, TradeOutcome};
use crate::commands::settings::get_settings;
use crate::db::Database;
use crate::error::{JournalError, Result};
use crate::models::{EntryMode, NewTrade, Settings, Trade, TradeFilters, TradeResult};

const TRADE_COLUMNS: &str =
    "id, timestamp, pair, result, profit_loss, risk_amount, breakdown, r_multiple, notes";

/// Maps a database row (in `TRADE_COLUMNS` order) to a Trade.
fn map_row_to_trade(row: &rusqlite::Row) -> rusqlite::Result<Trade> {
    let result_str: String = row.get(3)?;
    let result = TradeResult::parse(&result_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Text,
            format!("unknown trade result '{}'", result_str).into(),
        )
    })?;

    let breakdown_json: String = row.get(6)?;
    let breakdown = serde_json::from_str(&breakdown_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Trade {
        id: row.get(0)?,
        timestamp: row.get(1)?,
        pair: row.get(2)?,
        result,
        profit_loss: row.get(4)?,
        risk_amount: row.get(5)?,
        breakdown,
        r_multiple: row.get(7)?,
        notes: row.get(8)?,
    })
}

pub fn list_trades(db: &Database, filters: Option<TradeFilters>) -> Result<Vec<Trade>> {
    let conn = db.lock();

    let mut query = format!("SELECT {} FROM trades WHERE 1=1", TRADE_COLUMNS);
    let mut conditions = Vec::new();
    let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(f) = &filters {
        if let Some(result) = f.result {
            conditions.push("result = ?");
            params.push(Box::new(result.as_str()));
        }
        if let Some(pair) = &f.pair {
            conditions.push("pair LIKE ?");
            params.push(Box::new(format!("%{}%", pair)));
        }
        if let Some(start_date) = f.start_date {
            conditions.push("timestamp >= ?");
            params.push(Box::new(start_date));
        }
        if let Some(end_date) = f.end_date {
            conditions.push("timestamp <= ?");
            params.push(Box::new(end_date));
        }
    }

    if !conditions.is_empty() {
        query.push_str(&format!(" AND {}", conditions.join(" AND ")));
    }

    // Newest first for display; the aggregator re-sorts ascending itself
    query.push_str(" ORDER BY timestamp DESC, id DESC");

    if let Some(f) = &filters {
        if let (Some(page), Some(limit)) = (f.page, f.limit) {
            let offset = (page - 1) * limit;
            query.push_str(" LIMIT ? OFFSET ?");
            params.push(Box::new(limit));
            params.push(Box::new(offset));
        }
    }

    let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let mut stmt = conn.prepare(&query)?;
    let trades = stmt
        .query_map(param_refs.as_slice(), map_row_to_trade)?
        .collect::<rusqlite::Result<Vec<Trade>>>()?;

    Ok(trades)
}

pub fn get_trade(db: &Database, id: &str) -> Result<Trade> {
    let conn = db.lock();

    conn.query_row(
        &format!("SELECT {} FROM trades WHERE id = ?", TRADE_COLUMNS),
        [id],
        map_row_to_trade,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => {
            JournalError::NotFound(format!("trade {}", id))
        }
        other => JournalError::Database(other),
    })
}

/// Validates the raw input, runs the appropriate calculator against the
/// current settings snapshot and appends the resulting trade.
///
/// The calculators themselves perform no bounds checking, so everything
/// the UI could get wrong is rejected here first.
pub fn record_trade(db: &Database, input: NewTrade) -> Result<Trade> {
    let settings = get_settings(db)?;
    validate_entry(&settings, input.result, &input.entry)?;

    let TradeOutcome {
        profit_loss,
        breakdown,
    } = match &input.entry {
        EntryMode::Single {
            first_close_rrr,
            first_close_percent,
            runner_close_rrr,
        } => calculate_outcome(
            &settings,
            input.result,
            *first_close_rrr,
            *first_close_percent,
            *runner_close_rrr,
        ),
        EntryMode::MultiClose { closes, manual } => {
            calculate_multi_close(&settings, closes, *manual)
        }
        EntryMode::ManualDirect { amount } => manual_outcome(*amount),
    };

    let id = format!("TRADE-{}-{}", Utc::now().timestamp_millis(), uuid::Uuid::new_v4());
    let now = Utc::now().timestamp();
    let pair = match input.pair {
        Some(p) if !p.trim().is_empty() => p,
        _ => "unknown".to_string(),
    };
    let notes = input.notes.unwrap_or_default();
    let breakdown_json = serde_json::to_string(&breakdown)?;

    {
        let conn = db.lock();
        conn.execute(
            "INSERT INTO trades (id, timestamp, pair, result, profit_loss, risk_amount, breakdown, r_multiple, notes)
             VALUES (?, ?, ?, ?, ?, ?, ?, NULL, ?)",
            rusqlite::params![
                id,
                now,
                pair,
                input.result.as_str(),
                profit_loss,
                settings.risk_amount(),
                breakdown_json,
                notes
            ],
        )?;
    }

    log::info!("Recorded trade {} ({}, {:+.2})", id, input.result.as_str(), profit_loss);
    get_trade(db, &id)
}

pub fn delete_trade(db: &Database, id: &str) -> Result<()> {
    let conn = db.lock();
    let deleted = conn.execute("DELETE FROM trades WHERE id = ?", [id])?;
    if deleted == 0 {
        return Err(JournalError::NotFound(format!("trade {}", id)));
    }
    log::info!("Deleted trade {}", id);
    Ok(())
}

pub fn delete_all_trades(db: &Database) -> Result<usize> {
    let conn = db.lock();
    let count = conn.execute("DELETE FROM trades", [])?;
    log::info!("Deleted all {} trades", count);
    Ok(count)
}

fn validate_entry(settings: &Settings, result: TradeResult, entry: &EntryMode) -> Result<()> {
    match entry {
        EntryMode::Single {
            first_close_rrr,
            first_close_percent,
            runner_close_rrr,
        } => {
            // A plain loss reads none of the close parameters
            if result == TradeResult::Loss {
                return Ok(());
            }
            validate_percent(*first_close_percent, "first close percent")?;
            validate_rrr(*first_close_rrr, "first close reward multiple")?;
            if result == TradeResult::Win {
                validate_rrr(*runner_close_rrr, "runner reward multiple")?;
            }
            Ok(())
        }
        EntryMode::MultiClose { closes, manual } => {
            if *manual {
                require_manual_mode(settings)?;
            }
            let mut total_percent = 0.0;
            for close in closes {
                validate_percent(close.percent, "close percent")?;
                total_percent += close.percent;
                if *manual {
                    if !close.profit.unwrap_or(0.0).is_finite() {
                        return Err(JournalError::InvalidInput(
                            "close profit must be a finite number".to_string(),
                        ));
                    }
                } else {
                    validate_rrr(close.rrr, "close reward multiple")?;
                }
            }
            if total_percent > 100.0 {
                return Err(JournalError::InvalidInput(format!(
                    "close percentages sum to {}%, exceeding 100%",
                    total_percent
                )));
            }
            Ok(())
        }
        EntryMode::ManualDirect { amount } => {
            require_manual_mode(settings)?;
            if !amount.is_finite() {
                return Err(JournalError::InvalidInput(
                    "manual amount must be a finite number".to_string(),
                ));
            }
            Ok(())
        }
    }
}

fn validate_percent(percent: f64, what: &str) -> Result<()> {
    if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
        return Err(JournalError::InvalidInput(format!(
            "{} must be between 0 and 100",
            what
        )));
    }
    Ok(())
}

fn validate_rrr(rrr: f64, what: &str) -> Result<()> {
    if !rrr.is_finite() || rrr <= 0.0 {
        return Err(JournalError::InvalidInput(format!(
            "{} must be greater than 0",
            what
        )));
    }
    Ok(())
}

fn require_manual_mode(settings: &Settings) -> Result<()> {
    if !settings.manual_mode {
        return Err(JournalError::InvalidInput(
            "manual entry requires manual mode to be enabled".to_string(),
        ));
    }
    Ok(())
}
