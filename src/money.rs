//! Rupiah amounts
//!
//! Every monetary value in the order and coupon domain is a [`Decimal`] holding whole rupiah.
//! Fractions only appear transiently while a percentage is applied, and are rounded half away
//! from zero before they are stored.

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Formatter, Money, Params, Position, iso};

/// Indonesian grouping: `.` between thousands, no minor units.
const RUPIAH_GROUPS: &[usize] = &[3, 3, 3, 3, 3];
const RUPIAH_POSITIONS: &[Position] = &[Position::Sign, Position::Symbol, Position::Amount];

/// Round an amount to whole rupiah, half away from zero.
pub fn round_rupiah(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Subtract `deduction` from `amount` without going below zero.
pub fn subtract_floored(amount: Decimal, deduction: Decimal) -> Decimal {
    (amount - deduction).max(Decimal::ZERO)
}

/// Format an amount as Indonesian rupiah for reports, e.g. `Rp187.829`.
pub fn format_rupiah(amount: Decimal) -> String {
    Formatter::money(
        &Money::from_decimal(round_rupiah(amount), iso::IDR),
        Params {
            digit_separator: '.',
            exponent_separator: ',',
            separator_pattern: RUPIAH_GROUPS,
            positions: RUPIAH_POSITIONS,
            rounding: Some(0),
            symbol: Some(iso::IDR.symbol),
            code: Some(iso::IDR.iso_alpha_code),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_rupiah(Decimal::new(125, 1)), Decimal::from(13));
        assert_eq!(round_rupiah(Decimal::new(124, 1)), Decimal::from(12));
        assert_eq!(round_rupiah(Decimal::new(-125, 1)), Decimal::from(-13));
    }

    #[test]
    fn subtract_floored_never_goes_negative() {
        assert_eq!(
            subtract_floored(Decimal::from(50_000), Decimal::from(75_000)),
            Decimal::ZERO
        );
        assert_eq!(
            subtract_floored(Decimal::from(200_000), Decimal::from(20_000)),
            Decimal::from(180_000)
        );
    }

    #[test]
    fn formats_with_indonesian_grouping() {
        assert_eq!(format_rupiah(Decimal::from(187_829)), "Rp187.829");
        assert_eq!(format_rupiah(Decimal::from(1_250_000_000)), "Rp1.250.000.000");
        assert_eq!(format_rupiah(Decimal::from(950)), "Rp950");
        assert_eq!(format_rupiah(Decimal::ZERO), "Rp0");
    }

    #[test]
    fn drops_minor_units_and_keeps_sign() {
        assert_eq!(format_rupiah(Decimal::new(2_000_049, 2)), "Rp20.000");
        assert_eq!(format_rupiah(Decimal::from(-5_000)), "-Rp5.000");
    }
}
