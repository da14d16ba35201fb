use chrono::Utc;

use crate::db::Database;
use crate::error::{JournalError, Result};
use crate::models::{Settings, UpdateSettingsInput};

/// Allowed range for the per-trade risk percentage.
const RISK_PER_TRADE_MIN: f64 = 0.1;
const RISK_PER_TRADE_MAX: f64 = 5.0;

pub fn get_settings(db: &Database) -> Result<Settings> {
    let conn = db.lock();

    let settings = conn.query_row(
        "SELECT id, initial_capital, risk_per_trade, target_growth, manual_mode, created_at, updated_at
         FROM settings WHERE id = 1",
        [],
        |row| {
            Ok(Settings {
                id: row.get(0)?,
                initial_capital: row.get(1)?,
                risk_per_trade: row.get(2)?,
                target_growth: row.get(3)?,
                manual_mode: row.get::<_, i32>(4)? == 1,
                created_at: row.get(5)?,
                updated_at: row.get(6)?,
            })
        },
    )?;

    Ok(settings)
}

/// Applies a partial settings update. Validation happens here, not in the
/// calculation core: the core trusts the snapshot it is handed.
pub fn update_settings(db: &Database, input: UpdateSettingsInput) -> Result<Settings> {
    validate(&input)?;

    {
        let conn = db.lock();

        // Build dynamic UPDATE from the provided fields
        let mut updates = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(val) = input.initial_capital {
            updates.push("initial_capital = ?");
            values.push(Box::new(val));
        }
        if let Some(val) = input.risk_per_trade {
            updates.push("risk_per_trade = ?");
            values.push(Box::new(val));
        }
        if let Some(val) = input.target_growth {
            updates.push("target_growth = ?");
            values.push(Box::new(val));
        }
        if let Some(val) = input.manual_mode {
            updates.push("manual_mode = ?");
            values.push(Box::new(val as i32));
        }

        updates.push("updated_at = ?");
        values.push(Box::new(Utc::now().timestamp()));

        let query = format!("UPDATE settings SET {} WHERE id = 1", updates.join(", "));
        let params: Vec<&dyn rusqlite::ToSql> = values.iter().map(|v| v.as_ref()).collect();
        conn.execute(&query, params.as_slice())?;
    }

    log::info!("Settings updated");
    get_settings(db)
}

fn validate(input: &UpdateSettingsInput) -> Result<()> {
    if let Some(capital) = input.initial_capital {
        if !capital.is_finite() || capital <= 0.0 {
            return Err(JournalError::InvalidInput(
                "initial capital must be a positive number".to_string(),
            ));
        }
    }
    if let Some(risk) = input.risk_per_trade {
        if !risk.is_finite() || !(RISK_PER_TRADE_MIN..=RISK_PER_TRADE_MAX).contains(&risk) {
            return Err(JournalError::InvalidInput(format!(
                "risk per trade must be between {} and {} percent",
                RISK_PER_TRADE_MIN, RISK_PER_TRADE_MAX
            )));
        }
    }
    if let Some(target) = input.target_growth {
        if !target.is_finite() || target <= 0.0 {
            return Err(JournalError::InvalidInput(
                "target growth must be a positive percentage".to_string(),
            ));
        }
    }
    Ok(())
}
