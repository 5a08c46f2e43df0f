use async_trait::async_trait;
use billing_service::{BillingDraft, BillingGateway, BillingRecord, BillingResult};
use tracing::info;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::http::ApiClient;

/// Billing API over HTTP
#[derive(Debug, Clone)]
pub struct BillingClient {
    api: ApiClient,
}

impl BillingClient {
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
impl BillingGateway for BillingClient {
    async fn fetch_for_hospital(&self, hospital_id: &str) -> BillingResult<Vec<BillingRecord>> {
        let request = self
            .api
            .get(&["api", "payment", "billing", "hospital", hospital_id])?;
        let records: Vec<BillingRecord> = self.api.send_json(request).await?;
        info!(hospital_id, count = records.len(), "Fetched billing records");
        Ok(records)
    }

    async fn update(&self, id: Uuid, draft: &BillingDraft) -> BillingResult<BillingRecord> {
        let id = id.to_string();
        let request = self.api.put(&["api", "payment", "billing", &id])?.json(draft);
        Ok(self.api.send_json(request).await?)
    }

    async fn delete(&self, id: Uuid) -> BillingResult<()> {
        let request = self.api.delete(&["api", "payment", "billing", &id.to_string()])?;
        self.api.send(request).await?;
        info!(%id, "Deleted billing record");
        Ok(())
    }
}
