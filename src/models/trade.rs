use serde::{Deserialize, Serialize};

use crate::models::Breakdown;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeResult {
    Win,
    Loss,
    Be,
}

impl TradeResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeResult::Win => "win",
            TradeResult::Loss => "loss",
            TradeResult::Be => "be",
        }
    }

    pub fn parse(s: &str) -> Option<TradeResult> {
        match s {
            "win" => Some(TradeResult::Win),
            "loss" => Some(TradeResult::Loss),
            "be" => Some(TradeResult::Be),
            _ => None,
        }
    }
}

/// A recorded trade. Immutable once created except for deletion; in
/// particular `profit_loss` and `risk_amount` are fixed at creation and
/// never recomputed after a settings change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub id: String,
    /// Creation instant, epoch seconds.
    pub timestamp: i64,
    pub pair: String,
    pub result: TradeResult,
    pub profit_loss: f64,
    /// Risk amount snapshotted from the settings active at creation.
    pub risk_amount: f64,
    pub breakdown: Breakdown,
    /// Realized multiple carried over from rows imported from the old
    /// journal format; consulted only as an aggregation fallback.
    pub r_multiple: Option<f64>,
    pub notes: String,
}

/// One partial close as submitted by the caller. `profit` is only read in
/// manual mode, where the operator records the actually-realized amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloseInput {
    pub rrr: f64,
    pub percent: f64,
    pub profit: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum EntryMode {
    /// First close plus runner, profits derived from reward multiples.
    Single {
        first_close_rrr: f64,
        first_close_percent: f64,
        /// Only read for `win` results.
        runner_close_rrr: f64,
    },
    /// Ordered list of partial closes.
    MultiClose { closes: Vec<CloseInput>, manual: bool },
    /// Manual mode: the realized amount, entered directly.
    ManualDirect { amount: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTrade {
    pub pair: Option<String>,
    pub result: TradeResult,
    pub entry: EntryMode,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TradeFilters {
    pub result: Option<TradeResult>,
    pub pair: Option<String>,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    pub page: Option<i32>,
    pub limit: Option<i32>,
}
