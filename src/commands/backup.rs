use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::commands::settings::get_settings;
use crate::commands::trades::list_trades;
use crate::db::Database;
use crate::error::{JournalError, Result};
use crate::models::{Settings, Trade};

/// Bumped when the backup layout changes incompatibly.
const BACKUP_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct BackupData {
    pub version: u32,
    pub exported_at: i64,
    pub settings: Settings,
    pub trades: Vec<Trade>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSummary {
    pub trades_imported: usize,
}

/// Serializes the whole journal (settings + ledger) to a JSON document.
pub fn export_all_data(db: &Database) -> Result<String> {
    let backup = BackupData {
        version: BACKUP_VERSION,
        exported_at: Utc::now().timestamp(),
        settings: get_settings(db)?,
        trades: list_trades(db, None)?,
    };

    let json = serde_json::to_string_pretty(&backup)?;
    log::info!("Exported {} trades", backup.trades.len());
    Ok(json)
}

/// Replaces settings and all trades with the backup's contents, in a
/// single transaction. Last write wins; there is no merging.
pub fn import_all_data(db: &Database, json: &str) -> Result<ImportSummary> {
    let backup: BackupData = serde_json::from_str(json)?;
    if backup.version != BACKUP_VERSION {
        return Err(JournalError::Backup(format!(
            "unsupported backup version {}",
            backup.version
        )));
    }
    if backup.settings.initial_capital <= 0.0 {
        return Err(JournalError::Backup(
            "backup settings have a non-positive initial capital".to_string(),
        ));
    }

    let conn = db.lock();
    let tx = conn.unchecked_transaction()?;

    tx.execute(
        "UPDATE settings SET initial_capital = ?, risk_per_trade = ?, target_growth = ?, manual_mode = ?, updated_at = ?
         WHERE id = 1",
        rusqlite::params![
            backup.settings.initial_capital,
            backup.settings.risk_per_trade,
            backup.settings.target_growth,
            backup.settings.manual_mode as i32,
            Utc::now().timestamp()
        ],
    )?;

    tx.execute("DELETE FROM trades", [])?;
    for trade in &backup.trades {
        let breakdown_json = serde_json::to_string(&trade.breakdown)?;
        tx.execute(
            "INSERT INTO trades (id, timestamp, pair, result, profit_loss, risk_amount, breakdown, r_multiple, notes)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            rusqlite::params![
                trade.id,
                trade.timestamp,
                trade.pair,
                trade.result.as_str(),
                trade.profit_loss,
                trade.risk_amount,
                breakdown_json,
                trade.r_multiple,
                trade.notes
            ],
        )?;
    }

    tx.commit()?;

    log::info!("Imported {} trades from backup", backup.trades.len());
    Ok(ImportSummary {
        trades_imported: backup.trades.len(),
    })
}

/// Flat CSV rendering of the ledger, newest first. The breakdown column
/// carries the tagged JSON unchanged.
pub fn export_trades_csv(db: &Database) -> Result<String> {
    let trades = list_trades(db, None)?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "id",
        "timestamp",
        "pair",
        "result",
        "profit_loss",
        "risk_amount",
        "r_multiple",
        "notes",
        "breakdown",
    ])?;

    for trade in &trades {
        writer.write_record(&[
            trade.id.clone(),
            trade.timestamp.to_string(),
            trade.pair.clone(),
            trade.result.as_str().to_string(),
            trade.profit_loss.to_string(),
            trade.risk_amount.to_string(),
            trade.r_multiple.map(|r| r.to_string()).unwrap_or_default(),
            trade.notes.clone(),
            serde_json::to_string(&trade.breakdown)?,
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| JournalError::Backup(format!("flushing CSV: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| JournalError::Backup(format!("CSV encoding: {}", e)))
}
