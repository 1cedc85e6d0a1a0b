use crate::shared::null_as_default;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub resource_id: String,
    /// Readings are nullable in stored history; `None` is an absent reading.
    #[serde(default)]
    pub cpu: Option<f64>,
    #[serde(default)]
    pub memory: Option<f64>,
    #[serde(default)]
    pub disk: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl Metric {
    pub fn new(resource_id: impl Into<String>, cpu: f64, memory: f64, disk: f64) -> Self {
        Self {
            id: None,
            resource_id: resource_id.into(),
            cpu: Some(cpu),
            memory: Some(memory),
            disk: Some(disk),
            timestamp: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resource_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub recommendation_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub resource_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_cpu: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_memory: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle_hours: Option<f64>,
}

impl AnalyzeRequest {
    /// Non-finite readings are dropped rather than sent.
    pub fn new(
        resource_id: impl Into<String>,
        avg_cpu: Option<f64>,
        avg_memory: Option<f64>,
        idle_hours: Option<f64>,
    ) -> Self {
        Self {
            resource_id: resource_id.into(),
            avg_cpu: avg_cpu.filter(|v| v.is_finite()),
            avg_memory: avg_memory.filter(|v| v.is_finite()),
            idle_hours: idle_hours.filter(|v| v.is_finite()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSimulationRequest {
    pub current_instance_type: String,
    pub recommended_instance_type: String,
    pub action: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSimulationResult {
    pub current_monthly_cost: f64,
    pub projected_monthly_cost: f64,
    pub monthly_savings: f64,
    pub savings_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WhatIfRequest {
    pub current_instance_type: String,
    pub candidates: Vec<String>,
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WhatIfEntry {
    pub recommended_instance_type: String,
    pub result: CostSimulationResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsSummary {
    pub total_savings: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AlertRequest {
    pub recipient: String,
    pub message: String,
    pub severity: String,
}

/// Metrics lookups may answer with a list or a single record.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum MetricsPayload {
    Many(Vec<Metric>),
    One(Metric),
}

impl MetricsPayload {
    pub(crate) fn into_vec(self) -> Vec<Metric> {
        match self {
            Self::Many(metrics) => metrics,
            Self::One(metric) => vec![metric],
        }
    }
}
