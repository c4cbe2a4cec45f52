//! Savings formulas

use serde::{Deserialize, Serialize};

use super::inputs::{CalculatorInputs, InputField};
use super::plans::{Plan, PlanTable};

/// Share of the inventory value saved per month
pub const INVENTORY_SAVINGS_RATE: f64 = 0.35;

/// Share of the monthly salary saved per month
pub const SALARY_SAVINGS_RATE: f64 = 0.30;

/// Figures derived from one inputs snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct RoiResults {
    pub inventory_value: f64,
    pub monthly_salary: f64,
    pub savings: f64,
    pub plan: Plan,
    pub monthly_savings: f64,
}

/// A pluggable ROI formula
pub trait SavingsModel: Send + Sync {
    fn compute(&self, inputs: &CalculatorInputs, plans: &PlanTable) -> RoiResults;
}

/// Which input decides the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlanBasis {
    #[default]
    Transactions,
    SkuCount,
}

impl PlanBasis {
    pub fn field(self) -> InputField {
        match self {
            PlanBasis::Transactions => InputField::Transactions,
            PlanBasis::SkuCount => InputField::SkuCount,
        }
    }
}

/// `savings = inventory_rate * sku_count * item_value + salary_rate * monthly_salary`,
/// optionally with the salary share multiplied by the operator count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardSavingsModel {
    pub inventory_rate: f64,
    pub salary_rate: f64,
    pub plan_basis: PlanBasis,
    pub per_operator_salary: bool,
}

impl Default for StandardSavingsModel {
    fn default() -> Self {
        Self {
            inventory_rate: INVENTORY_SAVINGS_RATE,
            salary_rate: SALARY_SAVINGS_RATE,
            plan_basis: PlanBasis::Transactions,
            per_operator_salary: false,
        }
    }
}

impl SavingsModel for StandardSavingsModel {
    fn compute(&self, inputs: &CalculatorInputs, plans: &PlanTable) -> RoiResults {
        let inventory_value = inputs.get(InputField::SkuCount) * inputs.get(InputField::ItemValue);
        let monthly_salary = inputs.monthly_salary();

        let mut salary_savings = self.salary_rate * monthly_salary;
        if self.per_operator_salary {
            salary_savings *= inputs.get(InputField::Operators);
        }

        let savings = self.inventory_rate * inventory_value + salary_savings;
        let plan = plans.select(inputs.get(self.plan_basis.field())).clone();
        let monthly_savings = savings - plan.price;

        RoiResults {
            inventory_value,
            monthly_salary,
            savings,
            plan,
            monthly_savings,
        }
    }
}
