//! Appointment list controller.
//!
//! The board fetches a hospital's appointments of one kind once and
//! re-partitions them in memory whenever the tab changes. Only
//! [`AppointmentBoard::refresh`] goes back to the server.

use async_trait::async_trait;
use database_layer::StaffContext;
use logger_redacted::Redacted;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{AppointmentError, AppointmentResult};
use crate::models::{Appointment, AppointmentKind, AppointmentStatus};
use crate::partition::{partition, DEFAULT_TAB};

#[async_trait]
pub trait AppointmentGateway: Send + Sync {
    async fn fetch_for_hospital(
        &self,
        kind: AppointmentKind,
        hospital_id: &str,
    ) -> AppointmentResult<Vec<Appointment>>;

    async fn update_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
        version: Option<u64>,
    ) -> AppointmentResult<Appointment>;
}

pub struct AppointmentBoard<G> {
    gateway: G,
    context: StaffContext,
    kind: AppointmentKind,
    records: Vec<Appointment>,
    tab: String,
    loaded: bool,
}

impl<G: AppointmentGateway> AppointmentBoard<G> {
    pub fn new(gateway: G, kind: AppointmentKind, context: StaffContext) -> Self {
        Self {
            gateway,
            context,
            kind,
            records: Vec::new(),
            tab: DEFAULT_TAB.to_string(),
            loaded: false,
        }
    }

    pub fn kind(&self) -> AppointmentKind {
        self.kind
    }

    pub fn tab(&self) -> &str {
        &self.tab
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Fetch on first use; later calls reuse the loaded records
    pub async fn load(&mut self) -> AppointmentResult<usize> {
        if self.loaded {
            return Ok(self.records.len());
        }
        self.refresh().await
    }

    /// Re-fetch unconditionally. A failure keeps the previous records.
    pub async fn refresh(&mut self) -> AppointmentResult<usize> {
        let hospital_id = self.context.hospital_id();
        match self.gateway.fetch_for_hospital(self.kind, hospital_id).await {
            Ok(records) => {
                debug!(hospital_id, kind = %self.kind, count = records.len(), "Loaded appointments");
                self.records = records;
                self.loaded = true;
                Ok(self.records.len())
            }
            Err(e) => {
                warn!(hospital_id, kind = %self.kind, error = %e, "Failed to load appointments");
                Err(e)
            }
        }
    }

    /// Switch tabs. The key is stored lowercased, the way tab labels map
    /// onto statuses.
    pub fn select_tab(&mut self, tab: &str) {
        self.tab = tab.trim().to_lowercase();
    }

    pub fn records(&self) -> &[Appointment] {
        &self.records
    }

    pub fn visible(&self) -> Vec<&Appointment> {
        partition(&self.records, &self.tab)
    }

    /// Move an appointment forward and merge the stored result in place
    pub async fn advance(&mut self, id: Uuid, next: AppointmentStatus) -> AppointmentResult<&Appointment> {
        let index = self
            .records
            .iter()
            .position(|a| a.id == id)
            .ok_or(AppointmentError::UnknownRecord(id))?;
        let current = self.records.get(index).ok_or(AppointmentError::UnknownRecord(id))?;
        current.transition(next)?;
        let version = Some(current.version);

        let updated = self.gateway.update_status(id, next, version).await?;
        info!(
            %id,
            status = %updated.status,
            contact = %Redacted(&updated.contact_number),
            "Appointment status changed"
        );
        let slot = self.records.get_mut(index).ok_or(AppointmentError::UnknownRecord(id))?;
        *slot = updated;
        Ok(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use parking_lot::Mutex;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Log sink shared between the subscriber and the test
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct FakeGateway {
        records: Arc<Mutex<Vec<Appointment>>>,
        fetches: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl AppointmentGateway for FakeGateway {
        async fn fetch_for_hospital(
            &self,
            kind: AppointmentKind,
            hospital_id: &str,
        ) -> AppointmentResult<Vec<Appointment>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .records
                .lock()
                .iter()
                .filter(|a| a.kind == kind && a.hospital_id == hospital_id)
                .cloned()
                .collect())
        }

        async fn update_status(
            &self,
            id: Uuid,
            status: AppointmentStatus,
            version: Option<u64>,
        ) -> AppointmentResult<Appointment> {
            let mut records = self.records.lock();
            let slot = records
                .iter_mut()
                .find(|a| a.id == id)
                .ok_or_else(|| AppointmentError::NotFound(id.to_string()))?;
            if version.is_some_and(|v| v != slot.version) {
                return Err(AppointmentError::Conflict(id.to_string()));
            }
            let mut updated = slot.transition(status)?;
            updated.version += 1;
            *slot = updated.clone();
            Ok(updated)
        }
    }

    fn appointment(kind: AppointmentKind, status: AppointmentStatus) -> Appointment {
        let now = Utc::now();
        Appointment {
            id: Uuid::new_v4(),
            kind,
            status,
            hospital_id: "H001".to_string(),
            patient_name: "Kamala Silva".to_string(),
            patient_id: "P-200".to_string(),
            contact_number: "0771234567".to_string(),
            doctor_name: None,
            appointment_date: now,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    fn seeded() -> FakeGateway {
        use AppointmentKind::*;
        use AppointmentStatus::*;
        let gateway = FakeGateway::default();
        *gateway.records.lock() = vec![
            appointment(Channeling, Pending),
            appointment(Channeling, Approved),
            appointment(Clinic, Pending),
            appointment(Channeling, Completed),
            appointment(Channeling, Pending),
        ];
        gateway
    }

    #[tokio::test]
    async fn test_tabs_switch_without_refetching() {
        let gateway = seeded();
        let mut board = AppointmentBoard::new(gateway.clone(), AppointmentKind::Channeling, StaffContext::new("H001"));

        assert_eq!(board.load().await.unwrap(), 4);
        assert_eq!(board.tab(), "pending");
        assert_eq!(board.visible().len(), 2);

        board.select_tab("Approved");
        assert_eq!(board.visible().len(), 1);
        board.select_tab("Completed");
        assert_eq!(board.visible().len(), 1);
        board.load().await.unwrap();
        assert_eq!(gateway.fetches.load(Ordering::SeqCst), 1);

        board.refresh().await.unwrap();
        assert_eq!(gateway.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_advance_merges_in_place() {
        let gateway = seeded();
        let mut board = AppointmentBoard::new(gateway, AppointmentKind::Channeling, StaffContext::new("H001"));
        board.load().await.unwrap();

        let id = board.visible()[0].id;
        let updated = board.advance(id, AppointmentStatus::Approved).await.unwrap();
        assert_eq!(updated.status, AppointmentStatus::Approved);
        assert_eq!(updated.version, 2);

        assert_eq!(board.visible().len(), 1);
        board.select_tab("approved");
        assert_eq!(board.visible().len(), 2);
        assert_eq!(board.records()[0].id, id);
    }

    #[tokio::test]
    async fn test_backward_move_rejected_locally() {
        let gateway = seeded();
        let mut board = AppointmentBoard::new(gateway, AppointmentKind::Channeling, StaffContext::new("H001"));
        board.load().await.unwrap();

        board.select_tab("completed");
        let id = board.visible()[0].id;
        let err = board.advance(id, AppointmentStatus::Pending).await.unwrap_err();
        assert!(matches!(err, AppointmentError::InvalidTransition { .. }));
        assert!(matches!(
            board.advance(Uuid::new_v4(), AppointmentStatus::Approved).await,
            Err(AppointmentError::UnknownRecord(_))
        ));
    }

    #[tokio::test]
    async fn test_status_change_log_masks_contact_number() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let gateway = seeded();
        let mut board = AppointmentBoard::new(gateway, AppointmentKind::Channeling, StaffContext::new("H001"));
        board.load().await.unwrap();
        let id = board.visible()[0].id;
        board.advance(id, AppointmentStatus::Approved).await.unwrap();

        let output = String::from_utf8(logs.0.lock().clone()).unwrap();
        assert!(output.contains("Appointment status changed"));
        assert!(!output.contains("0771234567"));
    }
}
