//! Validates uploaded bytes as a financial-profile document.

use serde_json::Value;
use thiserror::Error;

use crate::models::profile::FinancialProfile;

#[derive(Debug, Error)]
pub enum ProfileParseError {
    #[error("document is not valid JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("document root must be a JSON object")]
    NotAnObject,
}

/// Parses raw uploaded bytes into a [`FinancialProfile`].
///
/// Rejection is all-or-nothing: malformed input never yields a partial
/// document. Beyond well-formedness no field is required; downstream readers
/// tolerate whatever is absent.
pub fn parse_profile(raw: &[u8]) -> Result<FinancialProfile, ProfileParseError> {
    let value: Value = serde_json::from_slice(raw)?;

    if !value.is_object() {
        return Err(ProfileParseError::NotAnObject);
    }

    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pascal_case_fields() {
        let profile = parse_profile(br#"{"MonthlyIncome":5000,"TotalAssets":12000}"#).unwrap();
        assert_eq!(profile.monthly_income, Some(5000.0));
        assert_eq!(profile.total_assets, Some(12000.0));
        assert!(profile.loan_history.is_none());
    }

    #[test]
    fn parses_camel_case_aliases() {
        let raw = br#"{"monthlyIncome":5000,"loanHistory":[{"status":"paid"},{"status":"unpaid"}]}"#;
        let profile = parse_profile(raw).unwrap();
        assert_eq!(profile.monthly_income, Some(5000.0));

        let history = profile.loan_history.unwrap();
        assert_eq!(history.len(), 2);
        assert!(history[0].is_paid());
        assert!(!history[1].is_paid());
    }

    #[test]
    fn empty_object_is_well_formed() {
        let profile = parse_profile(b"{}").unwrap();
        assert_eq!(profile, FinancialProfile::default());
    }

    #[test]
    fn preserves_unknown_fields() {
        let raw = br#"{"MonthlyIncome":1,"Employer":"ACME","LoanHistory":[{"status":"paid","amount":300}]}"#;
        let profile = parse_profile(raw).unwrap();
        assert_eq!(profile.extra.get("Employer"), Some(&serde_json::json!("ACME")));

        let history = profile.loan_history.as_ref().unwrap();
        assert_eq!(history[0].extra.get("amount"), Some(&serde_json::json!(300)));

        // Round-trip keeps the extras.
        let rendered = serde_json::to_string(&profile).unwrap();
        assert!(rendered.contains("Employer"));
        assert!(rendered.contains("amount"));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            parse_profile(b"{not json"),
            Err(ProfileParseError::Syntax(_))
        ));
    }

    #[test]
    fn rejects_non_object_documents() {
        assert!(matches!(
            parse_profile(b"[1,2,3]"),
            Err(ProfileParseError::NotAnObject)
        ));
        assert!(matches!(
            parse_profile(br#""just a string""#),
            Err(ProfileParseError::NotAnObject)
        ));
    }
}
