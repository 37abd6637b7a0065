//! Money calculation utilities using rust_decimal for precision
//!
//! Line totals are exact decimals; only the tax amount is rounded
//! (2 decimal places, half away from zero).

use crate::models::OrderLine;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Fixed client-side tax rate (18%)
pub const TAX_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 2);

/// Round a monetary value to 2 decimal places
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Subtotal / tax / total of a set of lines
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl OrderTotals {
    pub fn from_subtotal(subtotal: Decimal) -> Self {
        let tax = round_money(subtotal * TAX_RATE);
        Self {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }
}

/// Fold line totals into order totals.
///
/// Pure and order-independent: the result does not depend on line order.
pub fn calculate_totals<'a, I>(lines: I) -> OrderTotals
where
    I: IntoIterator<Item = &'a OrderLine>,
{
    let subtotal = lines.into_iter().map(OrderLine::line_total).sum();
    OrderTotals::from_subtotal(subtotal)
}

/// Even share of `total` across `ways` guests, rounded to cents.
///
/// Returns `None` when `ways` is zero.
pub fn split_evenly(total: Decimal, ways: u32) -> Option<Decimal> {
    if ways == 0 {
        return None;
    }
    Some(round_money(total / Decimal::from(ways)))
}

/// Format an amount with its currency code, e.g. `24.19 EUR`
pub fn format_amount(amount: Decimal, currency: &str) -> String {
    format!("{:.2} {}", round_money(amount), currency)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(item: &str, price: Decimal, quantity: i32) -> OrderLine {
        let mut line = OrderLine::pending(item, item, price, vec![]);
        line.quantity = quantity;
        line.recompute_total();
        line
    }

    #[test]
    fn test_margherita_and_coke_totals() {
        let lines = vec![
            line("margherita", Decimal::new(900, 2), 2),
            line("coke", Decimal::new(250, 2), 1),
        ];
        let totals = calculate_totals(&lines);
        assert_eq!(totals.subtotal, Decimal::new(2050, 2));
        assert_eq!(totals.tax, Decimal::new(369, 2));
        assert_eq!(totals.total, Decimal::new(2419, 2));
    }

    #[test]
    fn test_totals_are_order_independent() {
        let mut lines = vec![
            line("a", Decimal::new(333, 2), 3),
            line("b", Decimal::new(10, 2), 7),
            line("c", Decimal::new(1999, 2), 1),
        ];
        let forward = calculate_totals(&lines);
        lines.reverse();
        assert_eq!(calculate_totals(&lines), forward);
        lines.swap(0, 1);
        assert_eq!(calculate_totals(&lines), forward);
    }

    #[test]
    fn test_empty_totals() {
        let totals = calculate_totals(&Vec::<OrderLine>::new());
        assert_eq!(totals, OrderTotals::default());
    }

    #[test]
    fn test_tax_rounds_half_away_from_zero() {
        // 0.25 * 0.18 = 0.045 -> 0.05
        let totals = OrderTotals::from_subtotal(Decimal::new(25, 2));
        assert_eq!(totals.tax, Decimal::new(5, 2));
        assert_eq!(totals.total, Decimal::new(30, 2));
    }

    #[test]
    fn test_no_drift_over_many_lines() {
        let lines: Vec<_> = (0..1000).map(|i| line(&i.to_string(), Decimal::new(10, 2), 1)).collect();
        assert_eq!(calculate_totals(&lines).subtotal, Decimal::new(10000, 2));
    }

    #[test]
    fn test_split_evenly() {
        assert_eq!(split_evenly(Decimal::new(2419, 2), 2), Some(Decimal::new(1210, 2)));
        assert_eq!(split_evenly(Decimal::new(3000, 2), 3), Some(Decimal::new(1000, 2)));
        assert_eq!(split_evenly(Decimal::new(3000, 2), 0), None);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(Decimal::new(2419, 2), "EUR"), "24.19 EUR");
        assert_eq!(format_amount(Decimal::new(5, 0), "EUR"), "5.00 EUR");
    }
}
