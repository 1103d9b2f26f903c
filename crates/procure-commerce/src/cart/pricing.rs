//! Derived cart totals.

use crate::cart::LineItem;
use crate::catalog::Price;
use crate::ids::ProductSlug;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Totals derived from a cart's line items.
///
/// Always recomputed from the items; never stored alongside them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartTotals {
    /// Sum of all line quantities.
    pub total_items: i64,
    /// Number of distinct products.
    pub unique_items: usize,
    /// Sum of unit price times quantity over fixed-price lines.
    pub subtotal: Money,
    /// Lines that need a manual quote and are excluded from `subtotal`.
    pub quote_required: Vec<ProductSlug>,
}

impl CartTotals {
    /// Compute totals for `items` priced in `currency`.
    ///
    /// Lines priced on request, lines without a price snapshot, and lines
    /// priced in another currency all land in `quote_required`. Arithmetic
    /// saturates so totals never fail.
    pub fn compute(items: &[LineItem], currency: Currency) -> Self {
        let mut subtotal = Money::zero(currency);
        let mut quote_required = Vec::new();

        for item in items {
            let line_total = match item.unit_price {
                Some(Price::Fixed { amount }) => amount
                    .saturating_multiply(item.quantity)
                    .saturating_add(&subtotal),
                Some(Price::OnRequest) | None => None,
            };
            match line_total {
                Some(total) => subtotal = total,
                None => quote_required.push(item.product.clone()),
            }
        }

        Self {
            total_items: items.iter().map(|i| i.quantity).sum(),
            unique_items: items.len(),
            subtotal,
            quote_required,
        }
    }

    /// Check if any line needs a manual quote.
    pub fn has_quote_items(&self) -> bool {
        !self.quote_required.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced(slug: &str, quantity: i64, cents: i64, currency: Currency) -> LineItem {
        LineItem {
            unit_price: Some(Price::fixed(Money::new(cents, currency))),
            ..LineItem::new(slug, quantity)
        }
    }

    #[test]
    fn test_subtotal_sums_fixed_prices() {
        let items = vec![
            priced("a", 2, 1000, Currency::USD),
            priced("b", 1, 2000, Currency::USD),
        ];
        let totals = CartTotals::compute(&items, Currency::USD);
        assert_eq!(totals.subtotal.amount_cents, 4000);
        assert_eq!(totals.total_items, 3);
        assert_eq!(totals.unique_items, 2);
        assert!(!totals.has_quote_items());
    }

    #[test]
    fn test_on_request_lines_are_flagged() {
        let items = vec![
            priced("a", 2, 1000, Currency::USD),
            LineItem {
                unit_price: Some(Price::OnRequest),
                ..LineItem::new("engine-mount", 4)
            },
            LineItem::new("legacy", 1),
            priced("euro", 1, 500, Currency::EUR),
        ];
        let totals = CartTotals::compute(&items, Currency::USD);
        assert_eq!(totals.subtotal.amount_cents, 2000);
        assert_eq!(totals.total_items, 8);
        assert_eq!(
            totals.quote_required,
            vec![
                ProductSlug::new("engine-mount"),
                ProductSlug::new("legacy"),
                ProductSlug::new("euro"),
            ]
        );
    }

    #[test]
    fn test_subtotal_saturates() {
        let items = vec![
            priced("a", 9999, i64::MAX / 2, Currency::USD),
            priced("b", 1, 1, Currency::USD),
        ];
        let totals = CartTotals::compute(&items, Currency::USD);
        assert_eq!(totals.subtotal.amount_cents, i64::MAX);
    }
}
