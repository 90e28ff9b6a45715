// Payment regeneration policy
//
// - unchanged terms with existing payments keep the schedule
// - any single changed term rebuilds it
// - no payments always rebuilds
// - sub-cent noise never rebuilds

use program_finance::payments::{evaluate_regeneration, RegenerationTrigger};
use program_finance::{should_regenerate_payments, PaymentTermsChange};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn cents(value: i64) -> Decimal {
    Decimal::new(value, 2)
}

fn steady(financing: Option<i64>, finance: Decimal, discounts: Decimal) -> PaymentTermsChange {
    PaymentTermsChange {
        payments_exist: true,
        original_financing_type_id: financing,
        next_financing_type_id: financing,
        original_finance_charges: finance,
        next_finance_charges: finance,
        original_discounts: discounts,
        next_discounts: discounts,
    }
}

#[test]
fn test_each_term_flips_decision() {
    let base = steady(Some(1), dec!(25), dec!(-100));
    assert!(!should_regenerate_payments(&base));

    let financing = PaymentTermsChange {
        next_financing_type_id: Some(2),
        ..base.clone()
    };
    let finance = PaymentTermsChange {
        next_finance_charges: dec!(25.01),
        ..base.clone()
    };
    let discounts = PaymentTermsChange {
        next_discounts: dec!(-90),
        ..base.clone()
    };

    assert_eq!(
        evaluate_regeneration(&financing).triggers,
        vec![RegenerationTrigger::FinancingTypeChanged]
    );
    assert_eq!(
        evaluate_regeneration(&finance).triggers,
        vec![RegenerationTrigger::FinanceChargesChanged]
    );
    assert_eq!(
        evaluate_regeneration(&discounts).triggers,
        vec![RegenerationTrigger::DiscountsChanged]
    );
}

#[test]
fn test_financing_type_set_from_null() {
    let change = PaymentTermsChange {
        original_financing_type_id: None,
        next_financing_type_id: Some(4),
        ..steady(None, dec!(0), dec!(0))
    };
    assert!(should_regenerate_payments(&change));
}

#[test]
fn test_trigger_names() {
    assert_eq!(RegenerationTrigger::NoPayments.to_string(), "no_payments");
    assert_eq!(
        serde_json::to_value(RegenerationTrigger::DiscountsChanged).unwrap(),
        "discounts_changed"
    );
}

proptest! {
    #[test]
    fn test_no_payments_always_regenerates(
        original_type in proptest::option::of(1i64..10),
        next_type in proptest::option::of(1i64..10),
        finance in -100_000i64..100_000,
        discount in 0i64..100_000
    ) {
        let change = PaymentTermsChange {
            payments_exist: false,
            original_financing_type_id: original_type,
            next_financing_type_id: next_type,
            original_finance_charges: cents(finance),
            next_finance_charges: cents(finance),
            original_discounts: -cents(discount),
            next_discounts: -cents(discount),
        };
        prop_assert!(should_regenerate_payments(&change));
    }

    #[test]
    fn test_sub_cent_noise_is_ignored(
        financing in proptest::option::of(1i64..10),
        finance in -100_000i64..100_000,
        discount in 0i64..100_000,
        noise in -4_999i64..=4_999
    ) {
        // noise below half a cent, in millionths of a dollar
        let jitter = Decimal::new(noise, 6);
        let change = PaymentTermsChange {
            next_finance_charges: cents(finance) + jitter,
            next_discounts: -cents(discount) - jitter,
            ..steady(financing, cents(finance), -cents(discount))
        };
        prop_assert!(!should_regenerate_payments(&change));
    }

    #[test]
    fn test_whole_cent_change_regenerates(
        finance in -100_000i64..100_000,
        delta in prop_oneof![-10_000i64..=-1, 1i64..=10_000]
    ) {
        let change = PaymentTermsChange {
            next_finance_charges: cents(finance + delta),
            ..steady(Some(1), cents(finance), dec!(-50))
        };
        prop_assert!(should_regenerate_payments(&change));
    }
}
