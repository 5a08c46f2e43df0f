use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{BillingError, BillingResult};
use crate::models::BillingRecord;

/// Payment totals over a set of billing records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BillingSummary {
    /// Sum over records whose status is exactly "Paid"
    #[schema(value_type = String)]
    pub total_paid: Decimal,
    /// Sum over every other status, including refunds
    #[schema(value_type = String)]
    pub total_pending: Decimal,
    #[schema(value_type = String)]
    pub total_payments: Decimal,
}

/// Aggregate the totals of a record set. Pure; `paid + pending == payments`
/// always holds.
///
/// Fails with [`BillingError::AmountOverflow`] instead of panicking when a
/// sum leaves the `Decimal` range.
pub fn summarize(records: &[BillingRecord]) -> BillingResult<BillingSummary> {
    records.iter().try_fold(BillingSummary::default(), |mut acc, record| {
        let amount = record.total_amount;
        if record.is_paid() {
            acc.total_paid = checked_sum(acc.total_paid, amount)?;
        } else {
            acc.total_pending = checked_sum(acc.total_pending, amount)?;
        }
        acc.total_payments = checked_sum(acc.total_payments, amount)?;
        Ok(acc)
    })
}

fn checked_sum(total: Decimal, amount: Decimal) -> BillingResult<Decimal> {
    total
        .checked_add(amount)
        .ok_or(BillingError::AmountOverflow("billing summary"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{record_with, sample_record};
    use proptest::prelude::*;

    #[test]
    fn test_empty_set_is_zero() {
        assert_eq!(summarize(&[]).unwrap(), BillingSummary::default());
    }

    #[test]
    fn test_refunded_counts_as_pending() {
        let records = vec![
            record_with("Paid", Decimal::new(1000, 0)),
            record_with("Refunded", Decimal::new(250, 0)),
            record_with("paid", Decimal::new(50, 0)),
        ];
        let summary = summarize(&records).unwrap();
        assert_eq!(summary.total_paid, Decimal::new(1000, 0));
        assert_eq!(summary.total_pending, Decimal::new(300, 0));
        assert_eq!(summary.total_payments, Decimal::new(1300, 0));
    }

    #[test]
    fn test_summary_serializes_amounts_as_strings() {
        let summary = summarize(&[sample_record()]).unwrap();
        let json = serde_json::to_value(summary).unwrap();
        assert_eq!(json["totalPaid"], "1500.50");
        assert_eq!(json["totalPending"], "0");
    }

    #[test]
    fn test_overflowing_totals_fail_instead_of_panicking() {
        let records = vec![record_with("Paid", Decimal::MAX), record_with("Paid", Decimal::MAX)];
        let err = summarize(&records).unwrap_err();
        assert!(matches!(err, BillingError::AmountOverflow(_)));

        // Paid and pending sums fit separately, the grand total does not
        let records = vec![record_with("Paid", Decimal::MAX), record_with("Pending", Decimal::ONE)];
        assert!(matches!(summarize(&records), Err(BillingError::AmountOverflow(_))));
    }

    proptest! {
        #[test]
        fn prop_paid_plus_pending_is_total(
            entries in proptest::collection::vec((any::<bool>(), 1i64..10_000_000, 0u32..3), 0..40)
        ) {
            let records: Vec<_> = entries
                .into_iter()
                .map(|(paid, cents, status)| {
                    let status = match (paid, status) {
                        (true, _) => "Paid",
                        (false, 0) => "Pending",
                        (false, 1) => "Refunded",
                        (false, _) => "Partially Paid",
                    };
                    record_with(status, Decimal::new(cents, 2))
                })
                .collect();

            let summary = summarize(&records).unwrap();
            prop_assert_eq!(summary.total_paid + summary.total_pending, summary.total_payments);
        }
    }
}
