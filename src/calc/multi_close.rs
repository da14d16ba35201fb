//! Multi take-profit outcome calculation.
//!
//! Generalizes the single first-close/runner model to an arbitrary ordered
//! list of partial closes. The percentage sum is reported back in the
//! breakdown (`total_percent`) but deliberately not enforced here; the
//! commands layer rejects submissions exceeding 100%.

use crate::calc::outcome::TradeOutcome;
use crate::models::{Breakdown, CloseFill, CloseInput, Settings};

/// Computes the total profit/loss over an ordered list of partial closes.
///
/// Automatic mode derives each close's profit from its reward multiple;
/// manual mode takes the operator-supplied amount (missing amounts count
/// as zero). An empty list yields a zero total.
pub fn calculate_multi_close(
    settings: &Settings,
    closes: &[CloseInput],
    manual: bool,
) -> TradeOutcome {
    let risk_amount = settings.risk_amount();

    let mut fills = Vec::with_capacity(closes.len());
    let mut total = 0.0;
    let mut total_percent = 0.0;

    for close in closes {
        let profit = if manual {
            close.profit.unwrap_or(0.0)
        } else {
            close.percent / 100.0 * risk_amount * close.rrr
        };
        total += profit;
        total_percent += close.percent;
        fills.push(CloseFill {
            rrr: close.rrr,
            percent: close.percent,
            profit,
        });
    }

    let breakdown = if manual {
        Breakdown::MultiTpManual {
            closes: fills,
            total_percent,
        }
    } else {
        Breakdown::MultiTpAuto {
            closes: fills,
            total_percent,
        }
    };

    TradeOutcome {
        profit_loss: total,
        breakdown,
    }
}
