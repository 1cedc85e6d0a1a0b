pub mod client;
pub mod endpoints;
pub mod error;
pub mod normalize;
pub mod types;

pub use client::{ApiClient, ApiRequest, Method};
pub use error::{RequestError, GENERIC_ERROR_MESSAGE, SERVICE_UNAVAILABLE_MESSAGE};
pub use normalize::{humanize, normalize_response, sanitize_error_message, unwrap_envelope};
pub use types::{
    AlertRequest, AnalyzeRequest, CostSimulationRequest, CostSimulationResult, Metric,
    Recommendation, SavingsSummary, WhatIfEntry, WhatIfRequest,
};
