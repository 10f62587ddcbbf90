//! Domain DTOs for the Vigil API.
//!
//! # Design
//! Flat attribute bags mirroring the server's JSON shapes, defined
//! independently from the mock-server crate; integration tests catch schema
//! drift. Entities are owned transiently by the caller once returned — the
//! server remains the source of truth, and no referential integrity is
//! enforced client-side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::convert;
use crate::error::Result;

/// A monitored server as reported by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Server {
    pub id: Uuid,
    pub hostname: String,
    pub os: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Request payload for registering a new server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterServer {
    pub hostname: String,
    pub os: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// An alert raised for a monitored server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Alert {
    pub id: Uuid,
    pub server_id: Uuid,
    pub severity: String,
    pub message: String,
    pub acknowledged: bool,
    pub created_at: DateTime<Utc>,
}

/// Status of one service inside a health report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceHealth {
    pub name: String,
    pub state: String,
    pub sub_state: String,
    pub restarts: u32,
    pub memory_bytes: u64,
}

/// Health report submitted by an agent for one host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthReport {
    pub hostname: String,
    pub reported_at: DateTime<Utc>,
    pub services: Vec<ServiceHealth>,
}

/// One disk-I/O sample submitted by an agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiskIoSample {
    pub device: String,
    pub read_bytes: u64,
    pub write_bytes: u64,
    pub read_ops: u64,
    pub write_ops: u64,
    pub busy_time_ns: u64,
}

impl DiskIoSample {
    /// Build a sample from platform-reported counters.
    ///
    /// Byte counters are converted strictly — a negative value is a platform
    /// bug worth surfacing. Operation counters are clamped to zero instead,
    /// since some platforms report -1 for "unsupported". The busy time must
    /// fit the signed 64-bit nanosecond range the API accepts.
    pub fn from_counters(
        device: &str,
        read_bytes: i64,
        write_bytes: i64,
        read_ops: i64,
        write_ops: i64,
        busy_time_ns: u64,
    ) -> Result<Self> {
        let busy = convert::duration_from_nanos(busy_time_ns)?;
        Ok(Self {
            device: device.to_string(),
            read_bytes: convert::unsigned_from_signed(read_bytes)?,
            write_bytes: convert::unsigned_from_signed(write_bytes)?,
            read_ops: convert::unsigned_from_signed_clamped(read_ops),
            write_ops: convert::unsigned_from_signed_clamped(write_ops),
            busy_time_ns: busy.as_nanos() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn server_roundtrips_through_json() {
        let server = Server {
            id: Uuid::new_v4(),
            hostname: "web-1".to_string(),
            os: "linux".to_string(),
            last_seen: None,
            tags: vec!["prod".to_string()],
        };
        let json = serde_json::to_string(&server).unwrap();
        let back: Server = serde_json::from_str(&json).unwrap();
        assert_eq!(back, server);
    }

    #[test]
    fn server_tolerates_missing_optional_fields() {
        let raw = format!(
            r#"{{"id":"{}","hostname":"db-1","os":"linux"}}"#,
            Uuid::nil()
        );
        let server: Server = serde_json::from_str(&raw).unwrap();
        assert!(server.last_seen.is_none());
        assert!(server.tags.is_empty());
    }

    #[test]
    fn disk_sample_from_valid_counters() {
        let sample =
            DiskIoSample::from_counters("nvme0n1", 1_024, 2_048, 10, 20, 1_000_000).unwrap();
        assert_eq!(sample.read_bytes, 1_024);
        assert_eq!(sample.write_bytes, 2_048);
        assert_eq!(sample.read_ops, 10);
        assert_eq!(sample.write_ops, 20);
        assert_eq!(sample.busy_time_ns, 1_000_000);
    }

    #[test]
    fn disk_sample_rejects_negative_byte_counters() {
        let err = DiskIoSample::from_counters("sda", -1, 0, 0, 0, 0).unwrap_err();
        assert!(matches!(err, Error::Range { target: "u64", .. }));
        assert!(DiskIoSample::from_counters("sda", 0, -1, 0, 0, 0).is_err());
    }

    #[test]
    fn disk_sample_clamps_negative_op_counters() {
        let sample = DiskIoSample::from_counters("sda", 0, 0, -1, -1, 0).unwrap();
        assert_eq!(sample.read_ops, 0);
        assert_eq!(sample.write_ops, 0);
    }

    #[test]
    fn disk_sample_rejects_busy_time_overflow() {
        let err = DiskIoSample::from_counters("sda", 0, 0, 0, 0, u64::MAX).unwrap_err();
        assert!(matches!(err, Error::Range { target: "duration", .. }));
    }
}
