//! ROI calculation: inputs, plan table and savings formulas

mod inputs;
mod model;
mod plans;

pub use inputs::{CalculatorInputs, InputField, SalaryPeriod};
pub use model::{
    PlanBasis, RoiResults, SavingsModel, StandardSavingsModel, INVENTORY_SAVINGS_RATE,
    SALARY_SAVINGS_RATE,
};
pub use plans::{Plan, PlanTable};
