//! Stock action implied by a status transition.
//!
//! Creation is a transition out of "no order" and deletion a transition into
//! it; both sides of that are `None`, which is never consuming. Every stock
//! movement an order causes is decided here.

use serde::{Deserialize, Serialize};

use crate::status::{OrderStatus, StockRegion};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionAction {
    /// Stock is unaffected.
    None,
    /// Subtract the consumption computed from the order's current lines.
    Apply,
    /// Add back the consumption attached to the order.
    Restore,
    /// Restore the attached consumption, then apply a freshly computed one.
    Reapply,
}

impl TransitionAction {
    /// Whether a fresh requirement vector must be computed for this action.
    pub fn needs_fresh_consumption(self) -> bool {
        matches!(self, TransitionAction::Apply | TransitionAction::Reapply)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransitionAction::None => "none",
            TransitionAction::Apply => "apply",
            TransitionAction::Restore => "restore",
            TransitionAction::Reapply => "reapply",
        }
    }
}

fn region(status: Option<OrderStatus>) -> StockRegion {
    status.map_or(StockRegion::NonConsuming, OrderStatus::region)
}

/// Decide the stock action for `from → to`.
pub fn plan_transition(from: Option<OrderStatus>, to: Option<OrderStatus>) -> TransitionAction {
    match (region(from), region(to)) {
        (StockRegion::NonConsuming, StockRegion::NonConsuming) => TransitionAction::None,
        (StockRegion::NonConsuming, StockRegion::Consuming) => TransitionAction::Apply,
        (StockRegion::Consuming, StockRegion::NonConsuming) => TransitionAction::Restore,
        (StockRegion::Consuming, StockRegion::Consuming) => TransitionAction::Reapply,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_transition_table() {
        for from in OrderStatus::ALL {
            for to in OrderStatus::ALL {
                let expected = match (from.is_consuming(), to.is_consuming()) {
                    (false, false) => TransitionAction::None,
                    (false, true) => TransitionAction::Apply,
                    (true, false) => TransitionAction::Restore,
                    (true, true) => TransitionAction::Reapply,
                };
                assert_eq!(plan_transition(Some(from), Some(to)), expected, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn creation_applies_only_when_created_into_consuming() {
        assert_eq!(
            plan_transition(None, Some(OrderStatus::Pending)),
            TransitionAction::None
        );
        assert_eq!(
            plan_transition(None, Some(OrderStatus::Washing)),
            TransitionAction::Apply
        );
    }

    #[test]
    fn deletion_restores_only_when_consuming() {
        assert_eq!(
            plan_transition(Some(OrderStatus::Drying), None),
            TransitionAction::Restore
        );
        assert_eq!(
            plan_transition(Some(OrderStatus::Delivered), None),
            TransitionAction::None
        );
    }
}
