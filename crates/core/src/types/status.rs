//! Order status enum.

use serde::{Deserialize, Serialize};

/// Lifecycle status of an order.
///
/// Orders are created in `Pending`; the forward path is
/// pending → processed → shipped → delivered, with a cancel branch available
/// any time before delivery. This crate only ever *creates* pending orders —
/// the remaining transitions belong to fulfillment tooling.
///
/// Stored as TEXT in Postgres via [`Display`](std::fmt::Display) /
/// [`FromStr`](std::str::FromStr).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processed,
    Shipped,
    Delivered,
    Canceled,
}

impl OrderStatus {
    /// Whether the status may still transition to `Canceled`.
    #[must_use]
    pub const fn cancelable(self) -> bool {
        !matches!(self, Self::Delivered | Self::Canceled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processed => write!(f, "processed"),
            Self::Shipped => write!(f, "shipped"),
            Self::Delivered => write!(f, "delivered"),
            Self::Canceled => write!(f, "canceled"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processed" => Ok(Self::Processed),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "canceled" => Ok(Self::Canceled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_from_str_roundtrip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Processed,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Canceled,
        ] {
            let text = status.to_string();
            assert_eq!(text.parse::<OrderStatus>().expect("parse"), status);
        }
    }

    #[test]
    fn rejects_unknown_status() {
        assert!("refunded".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn delivered_and_canceled_are_terminal() {
        assert!(OrderStatus::Pending.cancelable());
        assert!(OrderStatus::Shipped.cancelable());
        assert!(!OrderStatus::Delivered.cancelable());
        assert!(!OrderStatus::Canceled.cancelable());
    }
}
