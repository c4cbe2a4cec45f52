//! Calculator input fields

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Named calculator inputs. The kebab-case name doubles as the element role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputField {
    SkuCount,
    ItemValue,
    Salary,
    Transactions,
    Operators,
}

impl InputField {
    pub const ALL: [InputField; 5] = [
        InputField::SkuCount,
        InputField::ItemValue,
        InputField::Salary,
        InputField::Transactions,
        InputField::Operators,
    ];

    /// Role attribute value of the slider feeding this field
    pub fn role(self) -> &'static str {
        match self {
            InputField::SkuCount => "sku-count",
            InputField::ItemValue => "item-value",
            InputField::Salary => "salary",
            InputField::Transactions => "transactions",
            InputField::Operators => "operators",
        }
    }

    pub fn from_role(role: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.role() == role)
    }

    /// Value used until a slider reports one
    pub fn default_value(self) -> f64 {
        match self {
            InputField::SkuCount => 1_000.0,
            InputField::ItemValue => 100.0,
            InputField::Salary => 2_000.0,
            InputField::Transactions => 1_000.0,
            InputField::Operators => 1.0,
        }
    }
}

/// Period the salary input is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SalaryPeriod {
    #[default]
    Monthly,
    Yearly,
}

impl SalaryPeriod {
    /// Parse a radio value such as `monthly` or `yearly`
    pub fn from_value(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "monthly" | "month" => Some(SalaryPeriod::Monthly),
            "yearly" | "annual" | "year" => Some(SalaryPeriod::Yearly),
            _ => None,
        }
    }

    /// Convert an amount in this period to a monthly amount
    pub fn to_monthly(self, amount: f64) -> f64 {
        match self {
            SalaryPeriod::Monthly => amount,
            SalaryPeriod::Yearly => amount / 12.0,
        }
    }
}

/// Current calculator inputs, defaulted per field
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CalculatorInputs {
    values: AHashMap<InputField, f64>,
    pub salary_period: SalaryPeriod,
}

impl CalculatorInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: InputField) -> f64 {
        self.values
            .get(&field)
            .copied()
            .unwrap_or_else(|| field.default_value())
    }

    pub fn set(&mut self, field: InputField, value: f64) {
        self.values.insert(field, value);
    }

    pub fn with(mut self, field: InputField, value: f64) -> Self {
        self.set(field, value);
        self
    }

    pub fn with_salary_period(mut self, period: SalaryPeriod) -> Self {
        self.salary_period = period;
        self
    }

    pub fn monthly_salary(&self) -> f64 {
        self.salary_period.to_monthly(self.get(InputField::Salary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_overrides() {
        let inputs = CalculatorInputs::new();
        assert_eq!(inputs.get(InputField::SkuCount), 1_000.0);
        assert_eq!(inputs.get(InputField::Operators), 1.0);

        let inputs = inputs.with(InputField::SkuCount, 42.0);
        assert_eq!(inputs.get(InputField::SkuCount), 42.0);
    }

    #[test]
    fn test_roles_round_trip() {
        for field in InputField::ALL {
            assert_eq!(InputField::from_role(field.role()), Some(field));
        }
        assert_eq!(InputField::from_role("unidentified"), None);
    }

    #[test]
    fn test_yearly_salary_is_normalized() {
        let inputs = CalculatorInputs::new()
            .with(InputField::Salary, 36_000.0)
            .with_salary_period(SalaryPeriod::Yearly);
        assert_eq!(inputs.monthly_salary(), 3_000.0);
        assert_eq!(SalaryPeriod::from_value(" Yearly "), Some(SalaryPeriod::Yearly));
        assert_eq!(SalaryPeriod::from_value("weekly"), None);
    }
}
