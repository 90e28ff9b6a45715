mod regeneration_policy;

pub use regeneration_policy::{
    evaluate_regeneration, should_regenerate_payments, PaymentTermsChange, RegenerationDecision,
    RegenerationTrigger,
};
