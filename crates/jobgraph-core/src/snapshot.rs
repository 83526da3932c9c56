//! Decoding of the scheduler tool's job listing (`viz --mode json`).
//!
//! Three payload shapes are accepted:
//! - the listing object `{ "jobs": [...], "stats": {...}, "count": n }`,
//! - a bare job array,
//! - the web server envelope `{ "success": bool, "stdout": "<listing>", "stderr": "..." }`.

use crate::error::{Error, Result};
use crate::job::Job;
use crate::summary::StatusCounts;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::Read;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobSnapshot {
    pub jobs: Vec<Job>,
    pub stats: StatusCounts,
    pub count: usize,
}

#[derive(Deserialize)]
struct Listing {
    jobs: Vec<Job>,
    #[serde(default)]
    stats: Option<StatusCounts>,
    #[serde(default)]
    count: Option<usize>,
}

impl JobSnapshot {
    pub fn from_jobs(jobs: Vec<Job>) -> Self {
        let stats = StatusCounts::from_jobs(&jobs);
        Self {
            count: jobs.len(),
            stats,
            jobs,
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    pub fn from_reader(mut reader: impl Read) -> Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::from_json_str(&text)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(_) => {
                let jobs: Vec<Job> = serde_json::from_value(value)?;
                tracing::debug!(jobs = jobs.len(), "decoded bare job array");
                Ok(Self::from_jobs(jobs))
            }
            Value::Object(map) if map.contains_key("jobs") => Self::from_listing(map),
            Value::Object(map) if map.contains_key("stdout") => Self::from_envelope(map),
            Value::Object(_) => Err(Error::InvalidSnapshot {
                message: "expected a `jobs` field".to_string(),
            }),
            other => Err(Error::InvalidSnapshot {
                message: format!("expected an object or array, got {}", type_name(&other)),
            }),
        }
    }

    fn from_listing(map: serde_json::Map<String, Value>) -> Result<Self> {
        let listing: Listing = serde_json::from_value(Value::Object(map))?;
        let derived = StatusCounts::from_jobs(&listing.jobs);
        let stats = listing.stats.unwrap_or(derived);
        if stats.total != listing.jobs.len() {
            tracing::warn!(
                reported = stats.total,
                actual = listing.jobs.len(),
                "scheduler stats disagree with the job list"
            );
        }
        tracing::debug!(jobs = listing.jobs.len(), "decoded job listing");
        Ok(Self {
            count: listing.count.unwrap_or(listing.jobs.len()),
            stats,
            jobs: listing.jobs,
        })
    }

    fn from_envelope(map: serde_json::Map<String, Value>) -> Result<Self> {
        let success = map.get("success").and_then(Value::as_bool).unwrap_or(true);
        if !success {
            let stderr = map
                .get("stderr")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or("scheduler command failed");
            return Err(Error::InvalidSnapshot {
                message: stderr.to_string(),
            });
        }
        let stdout = map.get("stdout").and_then(Value::as_str).unwrap_or_default();
        if stdout.trim().is_empty() {
            return Ok(Self::default());
        }
        match serde_json::from_str::<Value>(stdout)? {
            Value::Object(inner) if inner.contains_key("stdout") => Err(Error::InvalidSnapshot {
                message: "nested scheduler envelope".to_string(),
            }),
            inner => Self::from_value(inner),
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
