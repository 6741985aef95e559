//! Financial-profile document types.
//!
//! The document is structurally validated once, at upload time; afterwards it
//! is read permissively. Every known field is optional, field names are
//! accepted in both PascalCase and camelCase (uploaders mix the two), and
//! unknown fields are preserved through the flattened maps so the stored
//! document round-trips unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialProfile {
    #[serde(
        rename = "MonthlyIncome",
        alias = "monthlyIncome",
        skip_serializing_if = "Option::is_none"
    )]
    pub monthly_income: Option<f64>,

    #[serde(
        rename = "MonthlyExpend",
        alias = "monthlyExpend",
        skip_serializing_if = "Option::is_none"
    )]
    pub monthly_expend: Option<f64>,

    #[serde(
        rename = "LoanRequest",
        alias = "loanRequest",
        skip_serializing_if = "Option::is_none"
    )]
    pub loan_request: Option<f64>,

    #[serde(
        rename = "OutstandingDebt",
        alias = "outstandingDebt",
        skip_serializing_if = "Option::is_none"
    )]
    pub outstanding_debt: Option<f64>,

    #[serde(
        rename = "TotalAssets",
        alias = "totalAssets",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_assets: Option<f64>,

    #[serde(
        rename = "TotalLiabilities",
        alias = "totalLiabilities",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_liabilities: Option<f64>,

    #[serde(
        rename = "LoanHistory",
        alias = "loanHistory",
        skip_serializing_if = "Option::is_none"
    )]
    pub loan_history: Option<Vec<LoanRecord>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One prior-loan entry. Only `status` is interpreted; anything else the
/// uploader attached rides along in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanRecord {
    #[serde(alias = "Status", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LoanRecord {
    #[must_use]
    pub fn is_paid(&self) -> bool {
        self.status.as_deref() == Some("paid")
    }
}

/// Response-facing projection of the profile's headline numbers.
#[derive(Debug, Clone, Serialize)]
pub struct FinancialSummary {
    pub monthly_income: Option<f64>,
    pub monthly_expend: Option<f64>,
    pub loan_request: Option<f64>,
    pub outstanding_debt: Option<f64>,
    pub total_assets: Option<f64>,
    pub total_liabilities: Option<f64>,
}

impl From<&FinancialProfile> for FinancialSummary {
    fn from(profile: &FinancialProfile) -> Self {
        Self {
            monthly_income: profile.monthly_income,
            monthly_expend: profile.monthly_expend,
            loan_request: profile.loan_request,
            outstanding_debt: profile.outstanding_debt,
            total_assets: profile.total_assets,
            total_liabilities: profile.total_liabilities,
        }
    }
}
