use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};

use appointment_service::{
    AppointmentBoard, AppointmentError, AppointmentKind, AppointmentStatus, NewAppointment,
};
use billing_service::{
    BillingBoard, BillingDraft, BillingError, BillingFilter, EditOutcome, ServiceLine,
};
use chrono::Utc;
use database_layer::StaffContext;
use medilink_client::{AppointmentClient, BillingClient, ClientConfig};
use medilink_server::{create_app, MedilinkServer, ServerConfig};
use rust_decimal::Decimal;

/// Serve a fresh in-memory server on an ephemeral port
async fn spawn_server() -> (MedilinkServer, ClientConfig) {
    let server = MedilinkServer::in_memory(ServerConfig::default());
    let app = create_app(server.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (server, ClientConfig::new(format!("http://{addr}")))
}

fn draft(hospital: &str, patient: &str, amount: &str, status: &str) -> BillingDraft {
    let amount = Decimal::from_str(amount).unwrap();
    BillingDraft {
        hospital_id: hospital.to_string(),
        billing_type: "Scan".to_string(),
        patient_name: patient.to_string(),
        patient_id: format!("P-{patient}"),
        contact_number: "0711234567".to_string(),
        patient_email: "patient@example.lk".to_string(),
        total_amount: amount,
        payment_method: "Card".to_string(),
        payment_status: status.to_string(),
        service_details: vec![ServiceLine {
            description: "MRI".to_string(),
            quantity: 1,
            cost: amount,
        }],
        ..BillingDraft::default()
    }
}

async fn seed(server: &MedilinkServer, draft: BillingDraft) {
    let record = draft.into_record(Utc::now()).unwrap();
    server.billing.insert(record).await.unwrap();
}

#[tokio::test]
async fn test_marking_paid_bill_pending_moves_totals() {
    let (server, config) = spawn_server().await;
    seed(&server, draft("H001", "Nimal", "1500.50", "Paid")).await;

    let mut board = BillingBoard::new(BillingClient::new(config).unwrap(), StaffContext::new("H001"));
    assert_eq!(board.load().await.unwrap(), 1);
    assert_eq!(board.summary().unwrap().total_paid, Decimal::from_str("1500.50").unwrap());

    let id = board.records()[0].id;
    board.begin_edit(id).unwrap().payment_status = "Pending".to_string();
    let outcome = board.save().await.unwrap();
    assert!(matches!(outcome, EditOutcome::Saved(ref r) if r.version == 2));

    let summary = board.summary().unwrap();
    assert_eq!(summary.total_paid, Decimal::ZERO);
    assert_eq!(summary.total_pending, Decimal::from_str("1500.50").unwrap());
    assert_eq!(summary.total_payments, Decimal::from_str("1500.50").unwrap());

    // The server agrees after a reload
    board.load().await.unwrap();
    assert_eq!(board.records()[0].payment_status, "Pending");
}

#[tokio::test]
async fn test_delete_needs_confirmation() {
    let (server, config) = spawn_server().await;
    seed(&server, draft("H001", "Nimal", "800", "Paid")).await;
    seed(&server, draft("H001", "Kamala", "200", "Pending")).await;

    let mut board = BillingBoard::new(BillingClient::new(config).unwrap(), StaffContext::new("H001"));
    board.load().await.unwrap();
    let id = board.records()[0].id;
    board.begin_edit(id).unwrap();

    let prompts = AtomicUsize::new(0);
    let decline = |_: &str| {
        prompts.fetch_add(1, Ordering::SeqCst);
        false
    };
    assert_eq!(board.delete(&decline).await.unwrap(), EditOutcome::Aborted);
    assert_eq!(board.editing_id(), Some(id));
    assert_eq!(server.billing.list_by_scope("H001").await.unwrap().len(), 2);

    let accept = |prompt: &str| prompt.starts_with("Are you sure you want to delete bill BN-");
    assert_eq!(board.delete(&accept).await.unwrap(), EditOutcome::Deleted(id));
    assert_eq!(prompts.load(Ordering::SeqCst), 1);
    assert_eq!(board.records().len(), 1);
    assert!(server.billing.get(id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_stale_edit_is_rejected() {
    let (server, config) = spawn_server().await;
    seed(&server, draft("H001", "Nimal", "1000", "Pending")).await;

    let mut board = BillingBoard::new(BillingClient::new(config).unwrap(), StaffContext::new("H001"));
    board.load().await.unwrap();
    let id = board.records()[0].id;

    // Someone else updates the record after this board loaded it
    let current = server.billing.get(id).await.unwrap().unwrap();
    let mut other = current.to_draft();
    other.payment_status = "Paid".to_string();
    let changed = current.apply_draft(&other).unwrap();
    server.billing.replace(changed, Some(1)).await.unwrap();

    board.begin_edit(id).unwrap().payment_method = "Cash".to_string();
    let err = board.save().await.unwrap_err();
    assert!(matches!(err, BillingError::Conflict(_)));
    assert_eq!(board.editing_id(), Some(id));
}

#[tokio::test]
async fn test_filters_apply_to_loaded_records() {
    let (server, config) = spawn_server().await;
    seed(&server, draft("H001", "Nimal Perera", "100", "Paid")).await;
    seed(&server, draft("H001", "Kamala Silva", "200", "Pending")).await;
    seed(&server, draft("H002", "Sunil", "300", "Paid")).await;

    let mut board = BillingBoard::new(BillingClient::new(config).unwrap(), StaffContext::new("H001"));
    assert_eq!(board.load().await.unwrap(), 2);

    board.set_filter(BillingFilter::default().with_search("silva"));
    let visible = board.visible();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].patient_name, "Kamala Silva");
}

#[tokio::test]
async fn test_hospital_ids_are_sent_as_one_segment() {
    let (server, config) = spawn_server().await;
    seed(&server, draft("H 001/B", "Nimal", "100", "Paid")).await;
    seed(&server, draft("H 001", "Kamala", "200", "Paid")).await;

    let mut board = BillingBoard::new(BillingClient::new(config).unwrap(), StaffContext::new("H 001/B"));
    assert_eq!(board.load().await.unwrap(), 1);
    assert_eq!(board.records()[0].patient_name, "Nimal");
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let config = ClientConfig::new("http://127.0.0.1:1");
    let mut board = BillingBoard::new(BillingClient::new(config).unwrap(), StaffContext::new("H001"));
    assert!(matches!(board.load().await, Err(BillingError::Network(_))));
}

#[tokio::test]
async fn test_appointment_board_moves_forward_only() {
    let (server, config) = spawn_server().await;
    for patient in ["A", "B"] {
        let request = NewAppointment {
            kind: "clinic".to_string(),
            hospital_id: "H001".to_string(),
            patient_name: patient.to_string(),
            patient_id: format!("P-{patient}"),
            contact_number: "0771234567".to_string(),
            appointment_date: Some(Utc::now()),
            ..NewAppointment::default()
        };
        let appointment = request.into_appointment(Utc::now()).unwrap();
        server.appointments.insert(appointment).await.unwrap();
    }

    let mut board = AppointmentBoard::new(
        AppointmentClient::new(config).unwrap(),
        AppointmentKind::Clinic,
        StaffContext::new("H001"),
    );
    board.load().await.unwrap();
    assert_eq!(board.visible().len(), 2);

    let id = board.records()[0].id;
    let moved = board.advance(id, AppointmentStatus::Approved).await.unwrap();
    assert_eq!(moved.status, AppointmentStatus::Approved);
    assert_eq!(board.visible().len(), 1);

    board.select_tab("approved");
    assert_eq!(board.visible().len(), 1);

    let err = board.advance(id, AppointmentStatus::Pending).await.unwrap_err();
    assert!(matches!(
        err,
        AppointmentError::InvalidTransition { .. } | AppointmentError::Conflict(_)
    ));
}
