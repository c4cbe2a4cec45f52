//! Subscription plans and threshold lookup

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A subscription plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub name: String,
    /// Monthly price
    pub price: f64,
    /// Largest quantity the plan covers
    pub capacity: f64,
}

impl Plan {
    pub fn new(name: impl Into<String>, price: f64, capacity: f64) -> Self {
        Self {
            name: name.into(),
            price,
            capacity,
        }
    }

    /// Lowercase, dash-separated name for links, e.g. `enterprise-basic`
    pub fn slug(&self) -> String {
        self.name
            .split(|c: char| !c.is_alphanumeric())
            .filter(|part| !part.is_empty())
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join("-")
    }
}

/// Non-empty plan list, ascending by capacity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Plan>", into = "Vec<Plan>")]
pub struct PlanTable {
    plans: Vec<Plan>,
}

impl PlanTable {
    pub fn new(plans: Vec<Plan>) -> Result<Self, ConfigError> {
        if plans.is_empty() {
            return Err(ConfigError::EmptyPlanTable);
        }
        for pair in plans.windows(2) {
            if pair[1].capacity < pair[0].capacity {
                return Err(ConfigError::PlansNotAscending {
                    name: pair[1].name.clone(),
                    capacity: pair[1].capacity,
                });
            }
        }
        Ok(Self { plans })
    }

    /// First plan whose capacity covers `quantity`, else the largest plan
    pub fn select(&self, quantity: f64) -> &Plan {
        self.plans
            .iter()
            .find(|plan| quantity <= plan.capacity)
            .unwrap_or_else(|| self.largest())
    }

    pub fn largest(&self) -> &Plan {
        &self.plans[self.plans.len() - 1]
    }

    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }
}

impl Default for PlanTable {
    fn default() -> Self {
        Self {
            plans: vec![
                Plan::new("Lite", 100.0, 500.0),
                Plan::new("Basic", 350.0, 1_000.0),
                Plan::new("Core", 600.0, 2_000.0),
                Plan::new("Business", 1_250.0, 5_000.0),
                Plan::new("Enterprise Basic", 2_950.0, 15_000.0),
                Plan::new("Enterprise Advanced", 5_900.0, 30_000.0),
            ],
        }
    }
}

impl TryFrom<Vec<Plan>> for PlanTable {
    type Error = ConfigError;

    fn try_from(plans: Vec<Plan>) -> Result<Self, Self::Error> {
        Self::new(plans)
    }
}

impl From<PlanTable> for Vec<Plan> {
    fn from(table: PlanTable) -> Self {
        table.plans
    }
}
