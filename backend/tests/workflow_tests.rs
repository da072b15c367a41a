//! Purchase-request workflow tests
//!
//! Tests for the lifecycle and reconciliation rules including:
//! - Only DRAFT requests can be edited or deleted
//! - Updates can submit (DRAFT -> PENDING) but never complete
//! - Deliveries apply once: PENDING applies, COMPLETED acknowledges
//! - References are canonical `PR` + zero-padded sequence
//! - Delivery lines aggregate per product without loss

use proptest::prelude::*;

use inventory_allocation_backend::{
    error::AppError,
    models::{
        aggregate_delivery, ensure_deletable, format_reference, parse_reference,
        plan_reconciliation, plan_status_change, DeliveryLine, PurchaseRequestStatus,
        Reconciliation, StatusChange, WorkflowError,
    },
};

use PurchaseRequestStatus::{Completed, Draft, Pending};

fn status_strategy() -> impl Strategy<Value = PurchaseRequestStatus> {
    prop_oneof![Just(Draft), Just(Pending), Just(Completed)]
}

fn line_strategy() -> impl Strategy<Value = DeliveryLine> {
    (1i32..20, 1i32..1_000).prop_map(|(product_id, quantity)| DeliveryLine {
        product_id,
        quantity,
    })
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Submitting a draft requires notifying the hub
    #[test]
    fn test_draft_submit() {
        assert_eq!(
            plan_status_change(Draft, Some(Pending)),
            Ok(StatusChange::Submit)
        );
    }

    /// Completing through an update is refused
    #[test]
    fn test_draft_to_completed_rejected() {
        assert_eq!(
            plan_status_change(Draft, Some(Completed)),
            Err(WorkflowError::IllegalTransition {
                from: Draft,
                to: Completed
            })
        );
    }

    /// Workflow errors surface as INVALID_STATE with the status in the message
    #[test]
    fn test_workflow_error_message() {
        let err = AppError::from(plan_status_change(Pending, None).unwrap_err());
        match err {
            AppError::InvalidState(msg) => assert_eq!(
                msg,
                "Cannot update purchase request. Only DRAFT status can be modified. Current status: PENDING"
            ),
            other => panic!("expected InvalidState, got {:?}", other),
        }
    }

    /// Delivery for a draft is refused
    #[test]
    fn test_delivery_for_draft_rejected() {
        assert_eq!(
            plan_reconciliation(Draft),
            Err(WorkflowError::NotPending(Draft))
        );
        assert_eq!(
            WorkflowError::NotPending(Draft).to_string(),
            "Purchase request status must be PENDING. Current status: DRAFT"
        );
    }

    /// References above the padding width keep growing
    #[test]
    fn test_reference_overflow_width() {
        assert_eq!(format_reference(1), "PR00001");
        assert_eq!(format_reference(99_999), "PR99999");
        assert_eq!(format_reference(100_000), "PR100000");
    }

    /// Repeated product lines accumulate
    #[test]
    fn test_duplicate_lines_accumulate() {
        let totals = aggregate_delivery(&[
            DeliveryLine { product_id: 1, quantity: 3 },
            DeliveryLine { product_id: 1, quantity: 2 },
        ]);
        assert_eq!(totals.get(&1), Some(&5));
        assert_eq!(totals.len(), 1);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Anything but DRAFT refuses every update
    #[test]
    fn prop_only_draft_is_editable(
        current in status_strategy(),
        requested in proptest::option::of(status_strategy()),
    ) {
        let result = plan_status_change(current, requested);
        if current != Draft {
            prop_assert_eq!(result, Err(WorkflowError::NotEditable(current)));
        } else {
            prop_assert_ne!(result, Err(WorkflowError::NotEditable(current)));
        }
    }

    /// An update never yields COMPLETED
    #[test]
    fn prop_update_never_completes(requested in proptest::option::of(status_strategy())) {
        match plan_status_change(Draft, requested) {
            Ok(StatusChange::Submit) => prop_assert_eq!(requested, Some(Pending)),
            Ok(StatusChange::Unchanged) => {
                prop_assert!(requested.is_none() || requested == Some(Draft))
            }
            Err(e) => prop_assert_eq!(
                e,
                WorkflowError::IllegalTransition { from: Draft, to: Completed }
            ),
        }
    }

    /// Deletion is allowed exactly for DRAFT
    #[test]
    fn prop_delete_only_draft(current in status_strategy()) {
        prop_assert_eq!(ensure_deletable(current).is_ok(), current == Draft);
    }

    /// Reconciliation applies for PENDING, acknowledges for COMPLETED
    #[test]
    fn prop_reconciliation_idempotent(current in status_strategy()) {
        let result = plan_reconciliation(current);
        match current {
            Pending => prop_assert_eq!(result, Ok(Reconciliation::Apply)),
            Completed => prop_assert_eq!(result, Ok(Reconciliation::AlreadyProcessed)),
            Draft => prop_assert!(result.is_err()),
        }
    }

    /// References parse back to their sequence value
    #[test]
    fn prop_reference_round_trip(sequence in 1i64..10_000_000) {
        let reference = format_reference(sequence);
        prop_assert!(reference.starts_with("PR"));
        prop_assert!(reference.len() >= 7);
        prop_assert_eq!(parse_reference(&reference), Some(sequence));
    }

    /// Distinct sequence values never share a reference
    #[test]
    fn prop_reference_injective(a in 1i64..1_000_000, b in 1i64..1_000_000) {
        prop_assume!(a != b);
        prop_assert_ne!(format_reference(a), format_reference(b));
    }

    /// Aggregation preserves the delivered total and per-product sums
    #[test]
    fn prop_aggregation_preserves_totals(lines in proptest::collection::vec(line_strategy(), 1..40)) {
        let totals = aggregate_delivery(&lines);

        let delivered: i64 = lines.iter().map(|l| i64::from(l.quantity)).sum();
        prop_assert_eq!(totals.values().sum::<i64>(), delivered);

        for (product_id, total) in &totals {
            let expected: i64 = lines
                .iter()
                .filter(|l| l.product_id == *product_id)
                .map(|l| i64::from(l.quantity))
                .sum();
            prop_assert_eq!(*total, expected);
        }

        for line in &lines {
            prop_assert!(totals.contains_key(&line.product_id));
        }
    }
}
