//! Price gate and output bounds.
//!
//! Quotes are destination tokens per one source unit. The price shown to
//! operators is the inverse: source tokens per destination token. Output
//! bounds stay in stroops; only the price gate uses floating point.

use shared_types::{Amount, STROOPS_PER_UNIT};

const BPS_DENOMINATOR: i64 = 10_000;

/// Source tokens per destination token, `None` for a zero or negative quote.
pub fn effective_price(quote_per_unit: Amount) -> Option<f64> {
    if !quote_per_unit.is_positive() {
        return None;
    }
    Some(1.0 / quote_per_unit.to_f64())
}

/// Destination amount for `balance` at `quote_per_unit`, truncated. `None`
/// if it does not fit an `Amount`.
pub fn expected_output(balance: Amount, quote_per_unit: Amount) -> Option<Amount> {
    balance.mul_div_floor(quote_per_unit.stroops(), STROOPS_PER_UNIT)
}

/// `expected` less `slippage_bps` basis points, truncated.
pub fn minimum_output(expected: Amount, slippage_bps: u32) -> Option<Amount> {
    let keep = BPS_DENOMINATOR - i64::from(slippage_bps).min(BPS_DENOMINATOR);
    expected.mul_div_floor(keep, BPS_DENOMINATOR)
}

/// Decision for one token balance.
#[derive(Clone, Debug, PartialEq)]
pub enum SwapPlan {
    /// Price above the threshold; leave the balance alone
    Skip { price: f64 },
    /// Price acceptable, but the output bound is not a positive amount
    /// (dust balance or overflow). Never submitted: a zero `dest_min` would
    /// accept any slippage.
    Unfillable { price: f64 },
    Execute {
        price: f64,
        expected: Amount,
        minimum: Amount,
    },
}

impl SwapPlan {
    /// Apply the price gate to a quote. `None` for an unusable quote.
    pub fn decide(
        balance: Amount,
        quote_per_unit: Amount,
        threshold: f64,
        slippage_bps: u32,
    ) -> Option<Self> {
        let price = effective_price(quote_per_unit)?;
        if price > threshold {
            return Some(SwapPlan::Skip { price });
        }
        let bounds = expected_output(balance, quote_per_unit)
            .and_then(|expected| Some((expected, minimum_output(expected, slippage_bps)?)));
        match bounds {
            Some((expected, minimum)) if minimum.is_positive() => Some(SwapPlan::Execute {
                price,
                expected,
                minimum,
            }),
            _ => Some(SwapPlan::Unfillable { price }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn amount(s: &str) -> Amount {
        Amount::parse(s).unwrap()
    }

    #[test]
    fn test_price_is_inverse_of_quote() {
        assert_eq!(effective_price(amount("0.05")), Some(20.0));
        assert_eq!(effective_price(Amount::ZERO), None);
    }

    #[test]
    fn test_below_threshold_executes_with_one_percent_slippage() {
        let plan = SwapPlan::decide(Amount::from_units(100), amount("0.05"), 25.0, 100).unwrap();
        assert_eq!(
            plan,
            SwapPlan::Execute {
                price: 20.0,
                expected: Amount::from_units(5),
                minimum: amount("4.95"),
            }
        );
    }

    #[test]
    fn test_above_threshold_is_skipped() {
        let plan = SwapPlan::decide(Amount::from_units(100), amount("0.02"), 25.0, 100).unwrap();
        assert_eq!(plan, SwapPlan::Skip { price: 50.0 });
    }

    #[test]
    fn test_price_equal_to_threshold_executes() {
        let plan = SwapPlan::decide(Amount::from_units(100), amount("0.04"), 25.0, 100).unwrap();
        assert!(matches!(plan, SwapPlan::Execute { .. }));
    }

    #[test]
    fn test_output_is_truncated_to_stroops() {
        // 1.0000001 * 0.3333333 = 0.33333333333333 -> 0.3333333
        assert_eq!(
            expected_output(amount("1.0000001"), amount("0.3333333")),
            Some(amount("0.3333333"))
        );
    }

    #[test]
    fn test_dust_balance_is_unfillable() {
        // 0.0000010 * 0.05 truncates to zero
        let plan = SwapPlan::decide(Amount::from_stroops(10), amount("0.05"), 25.0, 100).unwrap();
        assert_eq!(plan, SwapPlan::Unfillable { price: 20.0 });

        // Expected 0.0000001, minimum rounds down to zero
        let plan = SwapPlan::decide(Amount::from_stroops(20), amount("0.05"), 25.0, 100).unwrap();
        assert_eq!(plan, SwapPlan::Unfillable { price: 20.0 });
    }

    #[test]
    fn test_overflowing_output_is_unfillable() {
        let balance = Amount::from_stroops(i64::MAX);
        assert_eq!(expected_output(balance, amount("2")), None);

        let plan = SwapPlan::decide(balance, amount("2"), 25.0, 100).unwrap();
        assert_eq!(plan, SwapPlan::Unfillable { price: 0.5 });
    }

    proptest! {
        #[test]
        fn prop_minimum_never_exceeds_expected(stroops in 0i64..1_000_000_000_000, bps in 0u32..20_000) {
            let expected = Amount::from_stroops(stroops);
            let minimum = minimum_output(expected, bps).unwrap();
            prop_assert!(minimum <= expected);
            prop_assert!(minimum >= Amount::ZERO);
        }

        #[test]
        fn prop_executed_plans_have_positive_minimum(
            stroops in 0i64..i64::MAX,
            quote in 1i64..1_000_000_000,
            bps in 0u32..10_000,
        ) {
            let plan = SwapPlan::decide(Amount::from_stroops(stroops), Amount::from_stroops(quote), f64::MAX, bps);
            if let Some(SwapPlan::Execute { expected, minimum, .. }) = plan {
                prop_assert!(minimum.is_positive());
                prop_assert!(minimum <= expected);
            }
        }
    }
}
