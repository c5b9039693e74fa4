// Copyright 2025 Cowboy AI, LLC.

//! Read-side projections of the draft
//!
//! Projections are pure derivations: nothing here is stored, everything is
//! recomputed from the pairs and the catalog when read.

pub mod recap;
pub mod view;

pub use recap::{project, project_pair, LineItem, PairRecap, Recap};
pub use view::{draft_view, pair_view, DraftView, PairView};

use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount the way the storefront shows euros: `1 234,50 €`
///
/// Thousands are separated by a narrow no-break space and the currency
/// sign by a no-break space, as `Intl.NumberFormat('fr-FR')` does.
pub fn format_price(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 * 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('\u{202F}');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped},{frac_part}\u{00A0}€")
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Decimal::new(2500, 2), "25,00\u{a0}€" ; "whole euros")]
    #[test_case(Decimal::new(5, 1), "0,50\u{a0}€" ; "cents only")]
    #[test_case(Decimal::new(123450, 2), "1\u{202f}234,50\u{a0}€" ; "thousands")]
    #[test_case(Decimal::new(1234567, 0), "1\u{202f}234\u{202f}567,00\u{a0}€" ; "millions")]
    #[test_case(Decimal::new(-1999, 2), "-19,99\u{a0}€" ; "negative")]
    #[test_case(Decimal::new(10005, 3), "10,01\u{a0}€" ; "half rounds away")]
    fn test_format_price(amount: Decimal, expected: &str) {
        assert_eq!(format_price(amount), expected);
    }
}
