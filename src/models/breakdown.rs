use serde::{Deserialize, Serialize};

/// One partial close of a position: its reward multiple, the share of the
/// position it closed, and the profit attributed to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloseFill {
    pub rrr: f64,
    pub percent: f64,
    pub profit: f64,
}

/// Explains how a trade's `profit_loss` was derived. Informational only:
/// the stored `profit_loss` is never re-derived from it.
///
/// Stored as tagged JSON in the `breakdown` TEXT column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Breakdown {
    /// Full stop-out at -1R.
    Loss { risk_amount: f64 },
    /// First close banked a partial win, the remainder stopped out.
    BreakEven {
        first_part: f64,
        runner_part: f64,
        first_close_rrr: f64,
        first_close_percent: f64,
    },
    /// First close plus a profitable runner.
    Win {
        first_part: f64,
        runner_part: f64,
        first_close_rrr: f64,
        first_close_percent: f64,
        runner_close_rrr: f64,
    },
    /// Multiple take-profit levels, profits derived from reward multiples.
    MultiTpAuto {
        closes: Vec<CloseFill>,
        total_percent: f64,
    },
    /// Multiple take-profit levels, profits entered by the operator.
    MultiTpManual {
        closes: Vec<CloseFill>,
        total_percent: f64,
    },
    /// Manual mode: realized amount entered directly.
    ManualDirect { amount: f64 },
}

impl Breakdown {
    /// Realized reward multiple of the runner portion, when the breakdown
    /// records one. Multi-TP trades treat the last close as the runner.
    pub fn runner_multiple(&self) -> Option<f64> {
        match self {
            Breakdown::Win {
                runner_close_rrr, ..
            } => Some(*runner_close_rrr),
            Breakdown::MultiTpAuto { closes, .. } | Breakdown::MultiTpManual { closes, .. } => {
                closes.last().map(|c| c.rrr)
            }
            _ => None,
        }
    }
}
