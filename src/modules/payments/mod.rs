pub mod models;
pub mod services;

pub use models::MemberProgramPayment;
pub use services::{
    evaluate_regeneration, should_regenerate_payments, PaymentTermsChange, RegenerationDecision,
    RegenerationTrigger,
};
