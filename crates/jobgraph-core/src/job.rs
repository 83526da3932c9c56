//! Job records as reported by the scheduler.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

pub type JobId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum JobStatus {
    Running,
    Completed,
    Pending,
    Failed,
    Cancelled,
    Blocked,
    Timeout,
    /// Anything the scheduler reports that is not one of the known states. The raw value is
    /// kept for display.
    Unknown(String),
}

impl Default for JobStatus {
    fn default() -> Self {
        Self::Unknown(String::new())
    }
}

/// Visual bucket a status is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusCategory {
    Success,
    Active,
    Waiting,
    Failure,
    Neutral,
}

impl JobStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "RUNNING" => Self::Running,
            "COMPLETED" => Self::Completed,
            "PENDING" => Self::Pending,
            "FAILED" => Self::Failed,
            "CANCELLED" => Self::Cancelled,
            "BLOCKED" => Self::Blocked,
            "TIMEOUT" => Self::Timeout,
            _ => Self::Unknown(raw.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Running => "RUNNING",
            Self::Completed => "COMPLETED",
            Self::Pending => "PENDING",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
            Self::Blocked => "BLOCKED",
            Self::Timeout => "TIMEOUT",
            Self::Unknown(raw) if raw.is_empty() => "UNKNOWN",
            Self::Unknown(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /// FAILED and CANCELLED both count as failures when summarising a group.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed | Self::Cancelled)
    }

    pub fn category(&self) -> StatusCategory {
        match self {
            Self::Completed => StatusCategory::Success,
            Self::Running => StatusCategory::Active,
            Self::Pending | Self::Blocked => StatusCategory::Waiting,
            Self::Failed | Self::Cancelled | Self::Timeout => StatusCategory::Failure,
            Self::Unknown(_) => StatusCategory::Neutral,
        }
    }

    /// Dashboard legend color.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Completed => "#22c55e",
            Self::Running => "#3b82f6",
            Self::Pending => "#f59e0b",
            Self::Failed | Self::Timeout => "#ef4444",
            Self::Cancelled => "#d946ef",
            Self::Blocked => "#8b5cf6",
            Self::Unknown(_) => "#6b7280",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Completed => "✅",
            Self::Failed | Self::Cancelled => "❌",
            Self::Pending => "⏸️",
            Self::Running => "▶️",
            Self::Timeout => "⌛",
            Self::Blocked | Self::Unknown(_) => "?",
        }
    }
}

impl From<Option<String>> for JobStatus {
    fn from(value: Option<String>) -> Self {
        value.as_deref().map(Self::parse).unwrap_or_default()
    }
}

impl From<JobStatus> for String {
    fn from(value: JobStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accelerator counters; only meaningful while a job is running.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct JobStats {
    #[serde(default)]
    pub gpu_memory_used_mb: Option<f64>,
    #[serde(default)]
    pub gpu_memory_total_mb: Option<f64>,
    #[serde(default)]
    pub gpu_count: Option<u32>,
}

impl JobStats {
    /// Used / total GPU memory in percent, when both counters are present and total is
    /// non-zero.
    pub fn gpu_memory_percent(&self) -> Option<f64> {
        let used = self.gpu_memory_used_mb?;
        let total = self.gpu_memory_total_mb?;
        (total > 0.0).then(|| used / total * 100.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Job {
    #[serde(rename = "job_id", alias = "id", deserialize_with = "de::job_id")]
    pub id: JobId,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default, deserialize_with = "de::string_or_null")]
    pub command: String,
    #[serde(default, deserialize_with = "de::string_or_null")]
    pub preamble: String,
    #[serde(
        default,
        alias = "groupName",
        deserialize_with = "de::string_or_null"
    )]
    pub group_name: String,
    #[serde(default, alias = "dependsOn", deserialize_with = "de::id_list")]
    pub depends_on: Vec<String>,
    #[serde(default, alias = "inactiveDeps", deserialize_with = "de::id_list")]
    pub inactive_deps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<JobStats>,
}

impl Job {
    pub fn new(id: JobId, status: JobStatus) -> Self {
        Self {
            id,
            status,
            ..Default::default()
        }
    }

    pub fn with_depends_on<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on = deps.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_group_name(mut self, name: impl Into<String>) -> Self {
        self.group_name = name.into();
        self
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    /// The node key this job is known by in dependency lists.
    pub fn key(&self) -> String {
        self.id.to_string()
    }

    /// `depends_on` entries that name no job in `present`, in declaration order.
    pub fn inactive_dependencies<'a>(&'a self, present: &BTreeSet<String>) -> Vec<&'a str> {
        self.depends_on
            .iter()
            .filter(|dep| !present.contains(dep.as_str()))
            .map(String::as_str)
            .collect()
    }
}

/// Lenient field decoders. The scheduler tool has emitted ids both as numbers and as strings
/// across versions, and nulls where empty strings were meant.
mod de {
    use super::JobId;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdRepr {
        Num(u64),
        Str(String),
    }

    impl IdRepr {
        fn into_string(self) -> String {
            match self {
                IdRepr::Num(n) => n.to_string(),
                IdRepr::Str(s) => s.trim().to_string(),
            }
        }
    }

    pub(super) fn job_id<'de, D>(deserializer: D) -> Result<JobId, D::Error>
    where
        D: Deserializer<'de>,
    {
        match IdRepr::deserialize(deserializer)? {
            IdRepr::Num(n) => Ok(n),
            IdRepr::Str(s) => s
                .trim()
                .parse::<JobId>()
                .map_err(|_| serde::de::Error::custom(format!("job id is not numeric: {s:?}"))),
        }
    }

    pub(super) fn id_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<Vec<IdRepr>> = Option::deserialize(deserializer)?;
        Ok(raw
            .unwrap_or_default()
            .into_iter()
            .map(IdRepr::into_string)
            .filter(|s| !s.is_empty())
            .collect())
    }

    pub(super) fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
    }
}
