//! Billing page controller.
//!
//! A [`BillingBoard`] holds a disposable copy of one hospital's billing
//! records, applies the list filter, and drives the detail edit flow:
//!
//! ```text
//! Viewing --begin_edit--> Editing(draft) --save-----> Saved
//!                                        --discard--> Discarded
//!                                        --delete---> Deleted | Aborted
//! ```
//!
//! Only one record is edited at a time. Failed calls leave the loaded
//! records and the open draft untouched.

use async_trait::async_trait;
use database_layer::StaffContext;
use error_common::FieldErrors;
use logger_redacted::{redacted_error, redacted_info};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{BillingError, BillingResult};
use crate::filter::BillingFilter;
use crate::models::{BillingDraft, BillingRecord, ServiceLine};
use crate::summary::{summarize, BillingSummary};

/// Remote billing operations the board depends on
#[async_trait]
pub trait BillingGateway: Send + Sync {
    async fn fetch_for_hospital(&self, hospital_id: &str) -> BillingResult<Vec<BillingRecord>>;

    /// Full replacement; returns the stored record
    async fn update(&self, id: Uuid, draft: &BillingDraft) -> BillingResult<BillingRecord>;

    async fn delete(&self, id: Uuid) -> BillingResult<()>;
}

/// Asks the user to confirm a destructive action
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditState {
    #[default]
    Viewing,
    Editing {
        id: Uuid,
        draft: BillingDraft,
        errors: FieldErrors,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    Saved(BillingRecord),
    Discarded,
    Deleted(Uuid),
    /// The user declined the confirmation; nothing changed
    Aborted,
}

pub struct BillingBoard<G> {
    gateway: G,
    context: StaffContext,
    records: Vec<BillingRecord>,
    filter: BillingFilter,
    edit: EditState,
}

impl<G: BillingGateway> BillingBoard<G> {
    pub fn new(gateway: G, context: StaffContext) -> Self {
        Self {
            gateway,
            context,
            records: Vec::new(),
            filter: BillingFilter::default(),
            edit: EditState::Viewing,
        }
    }

    pub fn context(&self) -> &StaffContext {
        &self.context
    }

    /// Fetch the hospital's records, replacing the local copy.
    pub async fn load(&mut self) -> BillingResult<usize> {
        let hospital_id = self.context.hospital_id();
        match self.gateway.fetch_for_hospital(hospital_id).await {
            Ok(records) => {
                debug!(hospital_id, count = records.len(), "Loaded billing records");
                self.records = records;
                Ok(self.records.len())
            }
            Err(e) => {
                warn!(hospital_id, error = %e, "Failed to load billing records");
                Err(e)
            }
        }
    }

    pub fn records(&self) -> &[BillingRecord] {
        &self.records
    }

    pub fn record(&self, id: Uuid) -> Option<&BillingRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Totals over every loaded record, regardless of the filter
    pub fn summary(&self) -> BillingResult<BillingSummary> {
        summarize(&self.records)
    }

    pub fn filter(&self) -> &BillingFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: BillingFilter) {
        self.filter = filter;
    }

    pub fn visible(&self) -> Vec<&BillingRecord> {
        self.filter.apply(&self.records)
    }

    pub fn state(&self) -> &EditState {
        &self.edit
    }

    pub fn editing_id(&self) -> Option<Uuid> {
        match &self.edit {
            EditState::Editing { id, .. } => Some(*id),
            EditState::Viewing => None,
        }
    }

    /// Open a record for editing. Re-opening the record already being
    /// edited keeps its draft.
    pub fn begin_edit(&mut self, id: Uuid) -> BillingResult<&mut BillingDraft> {
        if let Some(open) = self.editing_id() {
            if open != id {
                return Err(BillingError::EditInProgress(open));
            }
        } else {
            let record = self.record(id).ok_or(BillingError::UnknownRecord(id))?;
            self.edit = EditState::Editing {
                id,
                draft: record.to_draft(),
                errors: FieldErrors::new(),
            };
        }
        self.draft_mut().ok_or(BillingError::NoActiveEdit)
    }

    pub fn draft(&self) -> Option<&BillingDraft> {
        match &self.edit {
            EditState::Editing { draft, .. } => Some(draft),
            EditState::Viewing => None,
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut BillingDraft> {
        match &mut self.edit {
            EditState::Editing { draft, .. } => Some(draft),
            EditState::Viewing => None,
        }
    }

    /// Errors from the last failed save or delete attempt
    pub fn errors(&self) -> Option<&FieldErrors> {
        match &self.edit {
            EditState::Editing { errors, .. } => Some(errors),
            EditState::Viewing => None,
        }
    }

    pub fn add_service_line(&mut self) -> BillingResult<()> {
        let draft = self.draft_mut().ok_or(BillingError::NoActiveEdit)?;
        draft.service_details.push(ServiceLine::blank());
        Ok(())
    }

    /// Remove the line at `index`; out-of-range indices are a no-op.
    pub fn remove_service_line(&mut self, index: usize) -> BillingResult<Option<ServiceLine>> {
        let draft = self.draft_mut().ok_or(BillingError::NoActiveEdit)?;
        if index < draft.service_details.len() {
            Ok(Some(draft.service_details.remove(index)))
        } else {
            Ok(None)
        }
    }

    /// Validate the draft and send it as a full replacement. On success the
    /// returned record replaces the local one and the session closes.
    pub async fn save(&mut self) -> BillingResult<EditOutcome> {
        let (id, draft) = self.checked_draft()?;

        match self.gateway.update(id, &draft).await {
            Ok(saved) => {
                if let Some(slot) = self.records.iter_mut().find(|r| r.id == id) {
                    *slot = saved.clone();
                }
                self.edit = EditState::Viewing;
                redacted_info!("Saved billing record {} for {}", saved.bill_no, saved.patient_email);
                Ok(EditOutcome::Saved(saved))
            }
            Err(e) => {
                warn!(%id, error = %e, "Billing update failed");
                self.remember_errors(&e);
                Err(e)
            }
        }
    }

    /// Close the session without sending anything
    pub fn discard(&mut self) -> BillingResult<EditOutcome> {
        if self.editing_id().is_none() {
            return Err(BillingError::NoActiveEdit);
        }
        self.edit = EditState::Viewing;
        Ok(EditOutcome::Discarded)
    }

    /// Delete the record being edited.
    ///
    /// The draft must validate and the user must confirm. A declined
    /// confirmation returns [`EditOutcome::Aborted`] and keeps the session
    /// open.
    pub async fn delete(&mut self, confirm: &dyn Confirm) -> BillingResult<EditOutcome> {
        let (id, draft) = self.checked_draft()?;

        let bill_no = draft.bill_no.as_deref().unwrap_or_default();
        let prompt = format!("Are you sure you want to delete bill {bill_no}?");
        if !confirm.confirm(&prompt) {
            debug!(%id, "Billing delete declined");
            return Ok(EditOutcome::Aborted);
        }

        match self.gateway.delete(id).await {
            Ok(()) => {
                self.records.retain(|r| r.id != id);
                self.edit = EditState::Viewing;
                Ok(EditOutcome::Deleted(id))
            }
            Err(e) => {
                redacted_error!("Failed to delete billing record {} ({}): {}", id, draft.patient_email, e);
                Err(e)
            }
        }
    }

    fn checked_draft(&mut self) -> BillingResult<(Uuid, BillingDraft)> {
        let EditState::Editing { id, draft, errors } = &mut self.edit else {
            return Err(BillingError::NoActiveEdit);
        };
        *errors = draft.validate();
        if errors.is_empty() {
            Ok((*id, draft.clone()))
        } else {
            Err(BillingError::Validation(errors.clone()))
        }
    }

    fn remember_errors(&mut self, error: &BillingError) {
        if let (BillingError::Validation(found), EditState::Editing { errors, .. }) =
            (error, &mut self.edit)
        {
            *errors = found.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_record;
    use parking_lot::Mutex;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    /// In-process gateway over a shared vector, with switchable failures
    #[derive(Clone, Default)]
    struct FakeGateway {
        records: Arc<Mutex<Vec<BillingRecord>>>,
        fail: Arc<Mutex<bool>>,
        updates: Arc<Mutex<Vec<BillingDraft>>>,
    }

    impl FakeGateway {
        fn with(records: Vec<BillingRecord>) -> Self {
            let gateway = Self::default();
            *gateway.records.lock() = records;
            gateway
        }

        fn set_failing(&self, fail: bool) {
            *self.fail.lock() = fail;
        }
    }

    #[async_trait]
    impl BillingGateway for FakeGateway {
        async fn fetch_for_hospital(&self, hospital_id: &str) -> BillingResult<Vec<BillingRecord>> {
            if *self.fail.lock() {
                return Err(BillingError::Network("connection refused".to_string()));
            }
            Ok(self
                .records
                .lock()
                .iter()
                .filter(|r| r.hospital_id == hospital_id)
                .cloned()
                .collect())
        }

        async fn update(&self, id: Uuid, draft: &BillingDraft) -> BillingResult<BillingRecord> {
            if *self.fail.lock() {
                return Err(BillingError::Network("connection refused".to_string()));
            }
            self.updates.lock().push(draft.clone());
            let mut records = self.records.lock();
            let slot = records
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| BillingError::NotFound(id.to_string()))?;
            let mut updated = slot.apply_draft(draft)?;
            updated.version += 1;
            *slot = updated.clone();
            Ok(updated)
        }

        async fn delete(&self, id: Uuid) -> BillingResult<()> {
            if *self.fail.lock() {
                return Err(BillingError::Network("connection refused".to_string()));
            }
            let mut records = self.records.lock();
            let before = records.len();
            records.retain(|r| r.id != id);
            if records.len() == before {
                return Err(BillingError::NotFound(id.to_string()));
            }
            Ok(())
        }
    }

    fn board_with(records: Vec<BillingRecord>) -> (BillingBoard<FakeGateway>, FakeGateway) {
        let gateway = FakeGateway::with(records);
        let board = BillingBoard::new(gateway.clone(), StaffContext::new("HOS-001"));
        (board, gateway)
    }

    #[tokio::test]
    async fn test_paid_to_pending_moves_amount() {
        let record = sample_record();
        let id = record.id;
        let (mut board, _) = board_with(vec![record]);
        board.load().await.unwrap();

        let before = board.summary().unwrap();
        assert_eq!(before.total_paid, Decimal::new(150_050, 2));
        assert_eq!(before.total_pending, Decimal::ZERO);

        board.begin_edit(id).unwrap().payment_status = "Pending".to_string();
        let outcome = board.save().await.unwrap();
        assert!(matches!(outcome, EditOutcome::Saved(ref r) if r.payment_status == "Pending"));
        assert_eq!(board.state(), &EditState::Viewing);

        let after = board.summary().unwrap();
        assert_eq!(after.total_paid, Decimal::ZERO);
        assert_eq!(after.total_pending, Decimal::new(150_050, 2));
        assert_eq!(after.total_payments, before.total_payments);
    }

    #[tokio::test]
    async fn test_save_sends_read_version() {
        let record = sample_record();
        let id = record.id;
        let (mut board, gateway) = board_with(vec![record]);
        board.load().await.unwrap();

        board.begin_edit(id).unwrap();
        board.save().await.unwrap();
        assert_eq!(gateway.updates.lock()[0].version, Some(1));
        assert_eq!(board.record(id).unwrap().version, 2);
    }

    #[tokio::test]
    async fn test_invalid_draft_blocks_save() {
        let record = sample_record();
        let id = record.id;
        let (mut board, gateway) = board_with(vec![record]);
        board.load().await.unwrap();

        board.begin_edit(id).unwrap().contact_number = "071-123-4567".to_string();
        let err = board.save().await.unwrap_err();
        assert!(matches!(err, BillingError::Validation(_)));
        assert!(board.errors().unwrap().contains("contactNumber"));
        assert_eq!(board.editing_id(), Some(id));
        assert!(gateway.updates.lock().is_empty());
    }

    #[tokio::test]
    async fn test_failed_save_keeps_state() {
        let record = sample_record();
        let id = record.id;
        let (mut board, gateway) = board_with(vec![record.clone()]);
        board.load().await.unwrap();

        board.begin_edit(id).unwrap().payment_status = "Pending".to_string();
        gateway.set_failing(true);
        let err = board.save().await.unwrap_err();
        assert!(matches!(err, BillingError::Network(_)));
        assert_eq!(board.records(), &[record]);
        assert_eq!(board.draft().unwrap().payment_status, "Pending");
    }

    #[tokio::test]
    async fn test_failed_load_keeps_records() {
        let (mut board, gateway) = board_with(vec![sample_record()]);
        board.load().await.unwrap();
        gateway.set_failing(true);
        assert!(board.load().await.is_err());
        assert_eq!(board.records().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_declined_keeps_record() {
        let record = sample_record();
        let id = record.id;
        let (mut board, gateway) = board_with(vec![record]);
        board.load().await.unwrap();

        board.begin_edit(id).unwrap();
        let outcome = board.delete(&|_: &str| false).await.unwrap();
        assert_eq!(outcome, EditOutcome::Aborted);
        assert_eq!(board.records().len(), 1);
        assert_eq!(gateway.records.lock().len(), 1);
        assert_eq!(board.editing_id(), Some(id));
    }

    #[tokio::test]
    async fn test_delete_confirmed_removes_everywhere() {
        let record = sample_record();
        let id = record.id;
        let bill_no = record.bill_no.clone();
        let (mut board, _) = board_with(vec![record, sample_record()]);
        board.load().await.unwrap();

        board.begin_edit(id).unwrap();
        let outcome = board
            .delete(&|prompt: &str| prompt.contains(&bill_no))
            .await
            .unwrap();
        assert_eq!(outcome, EditOutcome::Deleted(id));
        assert_eq!(board.records().len(), 1);

        board.load().await.unwrap();
        assert!(board.record(id).is_none());
        assert_eq!(board.records().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_requires_valid_draft() {
        let record = sample_record();
        let id = record.id;
        let (mut board, _) = board_with(vec![record]);
        board.load().await.unwrap();

        board.begin_edit(id).unwrap().patient_name.clear();
        let err = board.delete(&|_: &str| true).await.unwrap_err();
        assert!(matches!(err, BillingError::Validation(_)));
        assert_eq!(board.records().len(), 1);
    }

    #[tokio::test]
    async fn test_single_edit_session() {
        let first = sample_record();
        let second = sample_record();
        let (first_id, second_id) = (first.id, second.id);
        let (mut board, _) = board_with(vec![first, second]);
        board.load().await.unwrap();

        board.begin_edit(first_id).unwrap().patient_name = "Edited".to_string();
        assert!(matches!(
            board.begin_edit(second_id),
            Err(BillingError::EditInProgress(open)) if open == first_id
        ));
        assert_eq!(board.begin_edit(first_id).unwrap().patient_name, "Edited");

        assert_eq!(board.discard().unwrap(), EditOutcome::Discarded);
        assert_eq!(board.record(first_id).unwrap().patient_name, "Nimal Perera");
        assert!(board.begin_edit(second_id).is_ok());
        assert!(matches!(board.begin_edit(Uuid::new_v4()), Err(BillingError::EditInProgress(_))));
    }

    #[tokio::test]
    async fn test_service_lines() {
        let record = sample_record();
        let id = record.id;
        let (mut board, _) = board_with(vec![record]);
        board.load().await.unwrap();

        assert!(matches!(board.add_service_line(), Err(BillingError::NoActiveEdit)));
        board.begin_edit(id).unwrap();
        board.add_service_line().unwrap();
        board.add_service_line().unwrap();
        assert_eq!(board.draft().unwrap().service_details, vec![ServiceLine::blank(); 2]);

        assert_eq!(board.remove_service_line(5).unwrap(), None);
        assert_eq!(board.remove_service_line(0).unwrap(), Some(ServiceLine::blank()));
        assert_eq!(board.draft().unwrap().service_details.len(), 1);
    }

    #[test]
    fn test_unknown_record() {
        let (mut board, _) = board_with(Vec::new());
        assert!(matches!(board.begin_edit(Uuid::new_v4()), Err(BillingError::UnknownRecord(_))));
        assert!(matches!(board.discard(), Err(BillingError::NoActiveEdit)));
        let outcome = tokio_test::block_on(board.save());
        assert!(matches!(outcome, Err(BillingError::NoActiveEdit)));
    }
}
