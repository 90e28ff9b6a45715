mod price_calculator;

pub use price_calculator::{calculate_projected_margin, calculate_projected_price};
