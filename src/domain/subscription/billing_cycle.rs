//! Billing cycle definitions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// How often a subscription charges its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl BillingCycle {
    /// Returns the storage/wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingCycle::Weekly => "weekly",
            BillingCycle::Monthly => "monthly",
            BillingCycle::Quarterly => "quarterly",
            BillingCycle::Yearly => "yearly",
        }
    }

    /// Returns the capitalized name shown in notifications.
    pub fn display_name(&self) -> &'static str {
        match self {
            BillingCycle::Weekly => "Weekly",
            BillingCycle::Monthly => "Monthly",
            BillingCycle::Quarterly => "Quarterly",
            BillingCycle::Yearly => "Yearly",
        }
    }
}

impl std::fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for BillingCycle {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Ok(BillingCycle::Weekly),
            "monthly" => Ok(BillingCycle::Monthly),
            "quarterly" => Ok(BillingCycle::Quarterly),
            // "annual" is what older clients wrote
            "yearly" | "annual" | "annually" => Ok(BillingCycle::Yearly),
            other => Err(ValidationError::invalid_format(
                "billing_cycle",
                format!("unknown value '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_values_case_insensitively() {
        assert_eq!("Monthly".parse::<BillingCycle>().unwrap(), BillingCycle::Monthly);
        assert_eq!("weekly".parse::<BillingCycle>().unwrap(), BillingCycle::Weekly);
        assert_eq!(" QUARTERLY ".parse::<BillingCycle>().unwrap(), BillingCycle::Quarterly);
        assert_eq!("annual".parse::<BillingCycle>().unwrap(), BillingCycle::Yearly);
    }

    #[test]
    fn rejects_unknown_value() {
        assert!("daily".parse::<BillingCycle>().is_err());
    }

    #[test]
    fn display_is_capitalized() {
        assert_eq!(BillingCycle::Yearly.to_string(), "Yearly");
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&BillingCycle::Quarterly).unwrap();
        assert_eq!(json, "\"quarterly\"");
    }
}
