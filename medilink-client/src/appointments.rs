use appointment_service::{
    Appointment, AppointmentGateway, AppointmentKind, AppointmentResult, AppointmentStatus, StatusChange,
};
use async_trait::async_trait;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::http::ApiClient;

/// Appointment API over HTTP
#[derive(Debug, Clone)]
pub struct AppointmentClient {
    api: ApiClient,
}

impl AppointmentClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        Ok(Self {
            api: ApiClient::new(config)?,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        self.api.config()
    }
}

#[async_trait]
impl AppointmentGateway for AppointmentClient {
    async fn fetch_for_hospital(
        &self,
        kind: AppointmentKind,
        hospital_id: &str,
    ) -> AppointmentResult<Vec<Appointment>> {
        let kind = kind.to_string();
        let request = self.api.get(&[
            "api",
            "appointment",
            "hospitalappointments",
            &kind,
            hospital_id,
        ])?;
        Ok(self.api.send_json(request).await?)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
        version: Option<u64>,
    ) -> AppointmentResult<Appointment> {
        let id = id.to_string();
        let request = self
            .api
            .patch(&["api", "appointment", &id, "status"])?
            .json(&StatusChange { status, version });
        Ok(self.api.send_json(request).await?)
    }
}
