//! Order Pricing

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::money::{round_rupiah, subtract_floored};

/// Errors raised while pricing an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PricingError {
    /// Quantities start at one.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// A monetary input was negative.
    #[error("{0} cannot be negative")]
    NegativeAmount(&'static str),
}

/// Price snapshot of one order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinePrice {
    /// Catalog unit price at order time.
    pub unit_price: Decimal,

    /// Category discount per unit at order time.
    pub unit_discount: Decimal,

    /// Units ordered.
    pub quantity: u32,
}

impl LinePrice {
    /// Build a line, clamping the unit discount to the unit price.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError`] for a zero quantity or negative amounts.
    pub fn new(
        unit_price: Decimal,
        unit_discount: Decimal,
        quantity: u32,
    ) -> Result<Self, PricingError> {
        if quantity == 0 {
            return Err(PricingError::InvalidQuantity);
        }

        ensure_non_negative(unit_price, "unit price")?;
        ensure_non_negative(unit_discount, "unit discount")?;

        Ok(Self {
            unit_price,
            unit_discount: unit_discount.min(unit_price),
            quantity,
        })
    }

    /// `(unit_price - unit_discount) * quantity`
    pub fn subtotal(&self) -> Decimal {
        (self.unit_price - self.unit_discount) * Decimal::from(self.quantity)
    }
}

/// Money breakdown stored on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderCharges {
    /// Sum of line subtotals minus the coupon discount.
    pub product: Decimal,

    /// Shipping cost.
    pub shipping: Decimal,

    /// VAT on the discounted product cost.
    pub tax: Decimal,

    /// Any other fees.
    pub other: Decimal,

    /// Coupon discount actually deducted.
    pub coupon_discount: Decimal,
}

impl OrderCharges {
    /// `product + shipping + tax + other`
    pub fn total(&self) -> Decimal {
        self.product + self.shipping + self.tax + self.other
    }
}

/// Inputs for pricing an order beyond its lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChargeInputs {
    /// Shipping cost.
    pub shipping: Decimal,

    /// Any other fees.
    pub other: Decimal,

    /// VAT rate in percent points.
    pub tax_rate: Decimal,
}

/// Sum line subtotals.
pub fn lines_total<'a>(lines: impl IntoIterator<Item = &'a LinePrice>) -> Decimal {
    lines.into_iter().map(LinePrice::subtotal).sum()
}

/// Price an order from its line total and an already computed coupon discount.
///
/// # Errors
///
/// Returns [`PricingError::NegativeAmount`] for negative fees, rates or discounts.
pub fn price_order(
    lines_total: Decimal,
    coupon_discount: Decimal,
    inputs: ChargeInputs,
) -> Result<OrderCharges, PricingError> {
    ensure_non_negative(lines_total, "product cost")?;
    ensure_non_negative(coupon_discount, "coupon discount")?;
    ensure_non_negative(inputs.shipping, "shipping cost")?;
    ensure_non_negative(inputs.other, "other fees")?;
    ensure_non_negative(inputs.tax_rate, "tax rate")?;

    let product = subtract_floored(lines_total, coupon_discount);
    let tax = round_rupiah(Percentage::from(inputs.tax_rate / Decimal::ONE_HUNDRED) * product);

    Ok(OrderCharges {
        product,
        shipping: inputs.shipping,
        tax,
        other: inputs.other,
        coupon_discount: lines_total - product,
    })
}

fn ensure_non_negative(amount: Decimal, what: &'static str) -> Result<(), PricingError> {
    if amount < Decimal::ZERO {
        return Err(PricingError::NegativeAmount(what));
    }

    Ok(())
}
