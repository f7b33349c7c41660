//! Orders, read-only inputs to commission computation.

use crate::{MemberId, OrderId};
use serde::{Deserialize, Serialize};

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub quantity: u32,

    /// Line total (price × quantity), in currency.
    pub line_total: f64,

    /// Per-unit commissionable value declared by the product, if any.
    /// Absent means the whole line total is commissionable.
    pub commissionable_value: Option<f64>,
}

impl OrderItem {
    /// The portion of this line eligible for commission.
    pub fn commissionable(&self) -> f64 {
        match self.commissionable_value {
            Some(cv) => cv * f64::from(self.quantity),
            None => self.line_total,
        }
    }
}

/// A completed product order.
///
/// The core consumes orders read-only; order lifecycle (payment, shipping)
/// is an external concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,

    /// Human-facing order number, used in commission notes.
    pub number: String,

    /// The purchasing member.
    pub member: MemberId,

    pub items: Vec<OrderItem>,
}

impl Order {
    /// Total commissionable value across all items.
    pub fn commissionable_value(&self) -> f64 {
        self.items.iter().map(OrderItem::commissionable).sum()
    }
}
