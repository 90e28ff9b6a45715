use rust_decimal::Decimal;

use crate::core::money::HUNDRED;

/// Projected sell price: an algebraic sum of the program terms.
///
/// `discounts` is zero or negative. `finance_charges` is signed: a surcharge
/// raises the price, a credit lowers it.
pub fn calculate_projected_price(
    total_charge: Decimal,
    taxes: Decimal,
    finance_charges: Decimal,
    discounts: Decimal,
) -> Decimal {
    total_charge + taxes + finance_charges + discounts
}

/// Projected margin as a percentage of pre-tax revenue.
///
/// A negative finance charge is a rebate the business pays, so its magnitude
/// is added to cost instead of reducing revenue. A positive finance charge
/// leaves cost alone. Non-positive pre-tax revenue yields zero. The result can
/// be negative and is not clamped.
pub fn calculate_projected_margin(
    projected_price: Decimal,
    total_cost: Decimal,
    finance_charges: Decimal,
    taxes: Decimal,
) -> Decimal {
    let pre_tax_revenue = projected_price - taxes;
    if pre_tax_revenue <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let adjusted_cost = if finance_charges < Decimal::ZERO {
        total_cost + finance_charges.abs()
    } else {
        total_cost
    };

    (pre_tax_revenue - adjusted_cost) / pre_tax_revenue * HUNDRED
}
