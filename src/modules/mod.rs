pub mod payments;
pub mod pricing;
pub mod programs;
pub mod taxes;
