use super::session::DashboardSnapshot;
use crate::api::{CostSimulationResult, Metric, Recommendation, WhatIfEntry};
use crate::workflow::{WorkflowState, ALL_STAGES};

const LIST_LIMIT: usize = 10;

pub fn format_money(value: f64) -> String {
    if value < 0.0 {
        format!("-${:.2}", -value)
    } else {
        format!("${value:.2}")
    }
}

pub fn render_workflow(state: &WorkflowState) -> String {
    let stages = ALL_STAGES
        .iter()
        .map(|stage| {
            let marker = if !state.can_go(*stage) {
                "locked"
            } else if *stage == state.active {
                "active"
            } else {
                "unlocked"
            };
            format!("stage.{}={marker}", stage.as_str())
        })
        .collect::<Vec<_>>();
    let mut lines = vec![
        format!("active_stage={}", state.active),
        format!("watermark={}", state.watermark()),
    ];
    lines.extend(stages);
    lines.join("\n")
}

pub fn render_dashboard(snapshot: &DashboardSnapshot) -> String {
    let mut lines = vec![format!("resources_monitored={}", snapshot.resources.len())];
    match &snapshot.latest_recommendation {
        Some(rec) => {
            lines.push(format!("latest_recommendation={}", rec.recommendation_type));
            lines.push(format!("latest_description={}", rec.description));
            lines.push(format!(
                "latest_confidence={:.2}",
                rec.confidence.unwrap_or(0.0)
            ));
        }
        None => lines.push("latest_recommendation=none".to_string()),
    }
    lines.push(format!(
        "total_savings={}",
        format_money(snapshot.savings.map(|s| s.total_savings).unwrap_or(0.0))
    ));
    lines.join("\n")
}

pub fn render_metric(metric: &Metric) -> String {
    format!(
        "resource={} cpu={} memory={} disk={} time={}",
        metric.resource_id,
        reading(metric.cpu),
        reading(metric.memory),
        reading(metric.disk),
        metric.timestamp.as_deref().unwrap_or("")
    )
}

fn reading(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

pub fn render_metrics(metrics: &[Metric]) -> String {
    if metrics.is_empty() {
        return "No metrics found".to_string();
    }
    metrics
        .iter()
        .take(LIST_LIMIT)
        .map(render_metric)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_recommendation(rec: &Recommendation) -> String {
    format!(
        "type={} confidence={:.2} resource={} description={}",
        rec.recommendation_type,
        rec.confidence.unwrap_or(0.0),
        rec.resource_id,
        rec.description
    )
}

pub fn render_recommendations(recs: &[Recommendation]) -> String {
    if recs.is_empty() {
        return "No recommendations available".to_string();
    }
    recs.iter()
        .take(LIST_LIMIT)
        .map(render_recommendation)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_cost_result(result: &CostSimulationResult) -> String {
    [
        format!("current_monthly={}", format_money(result.current_monthly_cost)),
        format!(
            "projected_monthly={}",
            format_money(result.projected_monthly_cost)
        ),
        format!("monthly_savings={}", format_money(result.monthly_savings)),
        format!("savings_percentage={:.2}%", result.savings_percentage),
    ]
    .join("\n")
}

pub fn render_what_if(entries: &[WhatIfEntry]) -> String {
    if entries.is_empty() {
        return "No what-if results".to_string();
    }
    entries
        .iter()
        .map(|entry| {
            format!(
                "instance_type={} current_monthly={} projected_monthly={} monthly_savings={} savings_percentage={:.2}%",
                entry.recommended_instance_type,
                format_money(entry.result.current_monthly_cost),
                format_money(entry.result.projected_monthly_cost),
                format_money(entry.result.monthly_savings),
                entry.result.savings_percentage
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
