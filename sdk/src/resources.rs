//! Typed endpoint wrappers.
//!
//! Each method is a thin shim over the dispatcher: resolve the path, attach
//! pagination where the endpoint supports it, pick strict or lenient
//! extraction. No per-endpoint logic lives here beyond that.

use reqwest::Method;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::client::Client;
use crate::error::Result;
use crate::http::Request;
use crate::page::{PageMeta, PageOptions};
use crate::types::{Alert, DiskIoSample, HealthReport, RegisterServer, Server};

impl Client {
    pub async fn list_servers(
        &self,
        options: Option<PageOptions>,
        cancel: &CancellationToken,
    ) -> Result<(Vec<Server>, Option<PageMeta>)> {
        let mut query = Vec::new();
        if let Some(options) = options {
            options.apply_to(&mut query);
        }
        let req = Request::new(Method::GET, "/api/v1/servers").with_query(query);
        self.fetch_list(req, cancel).await
    }

    pub async fn get_server(&self, id: Uuid, cancel: &CancellationToken) -> Result<Server> {
        let req = Request::new(Method::GET, &format!("/api/v1/servers/{id}"));
        self.fetch_one(req, cancel).await
    }

    pub async fn register_server(
        &self,
        input: &RegisterServer,
        cancel: &CancellationToken,
    ) -> Result<Server> {
        self.send_json(Method::POST, "/api/v1/servers", input, cancel)
            .await
    }

    pub async fn delete_server(&self, id: Uuid, cancel: &CancellationToken) -> Result<()> {
        let req = Request::new(Method::DELETE, &format!("/api/v1/servers/{id}"));
        self.execute(req, cancel).await
    }

    pub async fn list_alerts(
        &self,
        options: Option<PageOptions>,
        cancel: &CancellationToken,
    ) -> Result<(Vec<Alert>, Option<PageMeta>)> {
        let mut query = Vec::new();
        if let Some(options) = options {
            options.apply_to(&mut query);
        }
        let req = Request::new(Method::GET, "/api/v1/alerts").with_query(query);
        self.fetch_list(req, cancel).await
    }

    pub async fn acknowledge_alert(&self, id: Uuid, cancel: &CancellationToken) -> Result<Alert> {
        let req = Request::new(Method::PUT, &format!("/api/v1/alerts/{id}/ack"));
        self.fetch_one(req, cancel).await
    }

    pub async fn submit_health_report(
        &self,
        report: &HealthReport,
        cancel: &CancellationToken,
    ) -> Result<HealthReport> {
        self.send_json(Method::POST, "/api/v1/health", report, cancel)
            .await
    }

    pub async fn submit_disk_io(
        &self,
        sample: &DiskIoSample,
        cancel: &CancellationToken,
    ) -> Result<DiskIoSample> {
        self.send_json(Method::POST, "/api/v1/metrics/disk-io", sample, cancel)
            .await
    }
}
