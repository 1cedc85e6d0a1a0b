use super::client::{ApiClient, ApiRequest};
use super::error::RequestError;
use super::types::{
    AlertRequest, AnalyzeRequest, CostSimulationRequest, CostSimulationResult, Metric,
    MetricsPayload, Recommendation, SavingsSummary, WhatIfEntry, WhatIfRequest,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decodes a required payload into one expected shape.
pub(crate) fn decode<T: DeserializeOwned>(
    payload: Option<Value>,
    expected: &'static str,
) -> Result<T, RequestError> {
    let value = payload.ok_or(RequestError::Decode { expected })?;
    serde_json::from_value(value).map_err(|_| RequestError::Decode { expected })
}

/// Decodes a payload that may legitimately be empty or `null`.
pub(crate) fn decode_optional<T: DeserializeOwned>(
    payload: Option<Value>,
    expected: &'static str,
) -> Result<Option<T>, RequestError> {
    match payload {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|_| RequestError::Decode { expected }),
    }
}

fn resource_path(prefix: &str, resource_id: &str) -> String {
    format!("{prefix}/{}", urlencoding::encode(resource_id))
}

impl ApiClient {
    pub fn get_resources(&self) -> Result<Vec<String>, RequestError> {
        let payload = self.send(ApiRequest::get("/api/metrics/resources"))?;
        Ok(decode_optional(payload, "resource id list")?.unwrap_or_default())
    }

    pub fn get_metrics(&self, resource_id: &str) -> Result<Vec<Metric>, RequestError> {
        let payload = self.send(ApiRequest::get(resource_path("/api/metrics", resource_id)))?;
        Ok(decode_optional::<MetricsPayload>(payload, "metric list")?
            .map(MetricsPayload::into_vec)
            .unwrap_or_default())
    }

    pub fn collect_metric(&self, metric: &Metric) -> Result<Metric, RequestError> {
        let payload = self.send(ApiRequest::post("/api/metrics/collect", metric)?)?;
        decode(payload, "metric")
    }

    pub fn get_recommendations(
        &self,
        resource_id: &str,
    ) -> Result<Vec<Recommendation>, RequestError> {
        let payload = self.send(ApiRequest::get(resource_path("/api/optimize", resource_id)))?;
        Ok(decode_optional(payload, "recommendation list")?.unwrap_or_default())
    }

    pub fn analyze_usage(
        &self,
        request: &AnalyzeRequest,
    ) -> Result<Option<Recommendation>, RequestError> {
        let payload = self.send(ApiRequest::post("/api/optimize/analyze", request)?)?;
        decode_optional(payload, "recommendation")
    }

    pub fn latest_recommendation(&self) -> Result<Option<Recommendation>, RequestError> {
        let payload = self.send(ApiRequest::get("/api/optimize/latest"))?;
        decode_optional(payload, "recommendation")
    }

    pub fn simulate_cost(
        &self,
        request: &CostSimulationRequest,
    ) -> Result<CostSimulationResult, RequestError> {
        let payload = self.send(ApiRequest::post("/api/cost/simulate", request)?)?;
        decode(payload, "cost simulation result")
    }

    pub fn cost_what_if(&self, request: &WhatIfRequest) -> Result<Vec<WhatIfEntry>, RequestError> {
        let payload = self.send(ApiRequest::post("/api/cost/whatif", request)?)?;
        Ok(decode_optional(payload, "what-if result list")?.unwrap_or_default())
    }

    pub fn savings_summary(&self) -> Result<SavingsSummary, RequestError> {
        let payload = self.send(ApiRequest::get("/api/cost/history/summary"))?;
        decode(payload, "savings summary")
    }

    /// Same call, but an empty body is an accepted answer rather than a
    /// decode error. Used to check a credential.
    pub fn savings_summary_or_empty(&self) -> Result<Option<SavingsSummary>, RequestError> {
        let payload = self.send(ApiRequest::get("/api/cost/history/summary"))?;
        decode_optional(payload, "savings summary")
    }

    /// Returns the server acknowledgement; an empty body yields an empty string.
    pub fn send_alert(&self, request: &AlertRequest) -> Result<String, RequestError> {
        let payload = self.send(ApiRequest::post("/api/alerts/send", request)?)?;
        Ok(decode_optional(payload, "acknowledgement")?.unwrap_or_default())
    }
}
