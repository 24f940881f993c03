use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a consolidation scenario. Transitions are linear;
/// no regression transitions are modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStatus {
    Proposed,
    Approved,
    InProgress,
    Completed,
}

impl ScenarioStatus {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "proposed" => Ok(ScenarioStatus::Proposed),
            "approved" => Ok(ScenarioStatus::Approved),
            "in_progress" => Ok(ScenarioStatus::InProgress),
            "completed" => Ok(ScenarioStatus::Completed),
            other => Err(Error::Validation(format!(
                "unknown scenario status: {other}"
            ))),
        }
    }

    fn ordinal(self) -> u8 {
        match self {
            ScenarioStatus::Proposed => 0,
            ScenarioStatus::Approved => 1,
            ScenarioStatus::InProgress => 2,
            ScenarioStatus::Completed => 3,
        }
    }

    /// A transition is legal only to the immediate next state.
    pub fn can_transition(self, to: ScenarioStatus) -> bool {
        to.ordinal() == self.ordinal() + 1
    }
}

/// A proposed merge of several source suppliers' volume into one target
/// supplier.
///
/// ROI and net benefit are intentionally absent as stored fields: both are
/// pure functions of the projected savings and implementation cost and are
/// recomputed at every read to rule out drift against edited inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidationScenario {
    pub scenario_id: String,
    pub name: String,
    pub source_suppliers: Vec<String>,
    pub target_supplier: String,
    pub parts_affected: u32,
    pub projected_savings: f64,
    pub implementation_cost: f64,
    pub status: ScenarioStatus,
}

impl ConsolidationScenario {
    /// Validates the financial inputs the derived metrics depend on.
    pub fn validate(&self) -> Result<()> {
        if self.scenario_id.trim().is_empty() {
            return Err(Error::Validation("scenario_id must not be empty".into()));
        }
        if self.implementation_cost <= 0.0 {
            return Err(Error::Validation(format!(
                "scenario {}: implementation_cost must be positive",
                self.scenario_id
            )));
        }
        if self.projected_savings < 0.0 {
            return Err(Error::Validation(format!(
                "scenario {}: projected_savings must not be negative",
                self.scenario_id
            )));
        }
        Ok(())
    }

    /// `(savings - cost) / cost * 100`, recomputed from stored inputs.
    pub fn roi_pct(&self) -> f64 {
        (self.projected_savings - self.implementation_cost) / self.implementation_cost * 100.0
    }

    pub fn net_benefit(&self) -> f64 {
        self.projected_savings - self.implementation_cost
    }

    /// Advance the lifecycle by one step.
    pub fn advance(&mut self, to: ScenarioStatus) -> Result<()> {
        if !self.status.can_transition(to) {
            return Err(Error::Validation(format!(
                "scenario {}: illegal status transition {:?} -> {:?}",
                self.scenario_id, self.status, to
            )));
        }
        self.status = to;
        Ok(())
    }
}
