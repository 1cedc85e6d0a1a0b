use serde::{Deserialize, Serialize};

/// Workspace stages in their fixed progression order. The derived ordering is
/// the declaration order and drives all gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Dashboard,
    Metrics,
    Recommendations,
    Cost,
    Alerts,
}

pub const ALL_STAGES: [Stage; 5] = [
    Stage::Dashboard,
    Stage::Metrics,
    Stage::Recommendations,
    Stage::Cost,
    Stage::Alerts,
];

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Metrics => "metrics",
            Self::Recommendations => "recommendations",
            Self::Cost => "cost",
            Self::Alerts => "alerts",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Metrics => "Metrics",
            Self::Recommendations => "Recommendations",
            Self::Cost => "Cost Simulation",
            Self::Alerts => "Alerts",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "dashboard" => Ok(Self::Dashboard),
            "metrics" => Ok(Self::Metrics),
            "recommendations" => Ok(Self::Recommendations),
            "cost" => Ok(Self::Cost),
            "alerts" => Ok(Self::Alerts),
            _ => Err(
                "stage must be one of: dashboard, metrics, recommendations, cost, alerts"
                    .to_string(),
            ),
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Dashboard => 0,
            Self::Metrics => 1,
            Self::Recommendations => 2,
            Self::Cost => 3,
            Self::Alerts => 4,
        }
    }

    pub fn first() -> Self {
        ALL_STAGES[0]
    }

    pub fn next(self) -> Option<Self> {
        ALL_STAGES.get(self.index() + 1).copied()
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
