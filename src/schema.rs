//! Feature schema and label encoding tables frozen at training time.
//!
//! The classifier was trained on exactly the ten fields listed in
//! [`FEATURES`], in that order. Categorical fields use the integer codes
//! assigned during training; the code for a value is its index in the
//! field's vocabulary slice. These tables never change at runtime.

/// Number of fields in the feature schema.
pub const FEATURE_COUNT: usize = 10;

/// Declared type of a schema field.
#[derive(Debug, Clone, Copy)]
pub enum FeatureKind {
    /// Fixed vocabulary; the training-time code is the index in the slice.
    Categorical(&'static [&'static str]),
    /// Coerced to a floating-point number.
    Numeric,
}

/// One named field of the feature schema.
#[derive(Debug, Clone, Copy)]
pub struct FeatureSpec {
    /// Field name, exactly as it appears in request records.
    pub name: &'static str,
    /// Declared type of the field.
    pub kind: FeatureKind,
}

const YES_NO: &[&str] = &["No", "Yes"];
const CONTRACT: &[&str] = &["Month-to-month", "One year", "Two year"];
const PAYMENT_METHOD: &[&str] = &[
    "Electronic Check",
    "Mailed Check",
    "Bank Transfer",
    "Credit Card",
];

/// Ordered feature schema the classifier expects.
pub const FEATURES: [FeatureSpec; FEATURE_COUNT] = [
    FeatureSpec {
        name: "Contract",
        kind: FeatureKind::Categorical(CONTRACT),
    },
    FeatureSpec {
        name: "Monthly Charge",
        kind: FeatureKind::Numeric,
    },
    FeatureSpec {
        name: "Number of Referrals",
        kind: FeatureKind::Numeric,
    },
    FeatureSpec {
        name: "Dependents",
        kind: FeatureKind::Categorical(YES_NO),
    },
    FeatureSpec {
        name: "Avg Monthly GB Download",
        kind: FeatureKind::Numeric,
    },
    FeatureSpec {
        name: "Tenure in Months",
        kind: FeatureKind::Numeric,
    },
    FeatureSpec {
        name: "Payment Method",
        kind: FeatureKind::Categorical(PAYMENT_METHOD),
    },
    FeatureSpec {
        name: "Online Backup",
        kind: FeatureKind::Categorical(YES_NO),
    },
    FeatureSpec {
        name: "Online Security",
        kind: FeatureKind::Categorical(YES_NO),
    },
    FeatureSpec {
        name: "Premium Tech Support",
        kind: FeatureKind::Categorical(YES_NO),
    },
];

/// Look up the training-time integer code for a categorical value.
///
/// Returns `None` when the value is absent from the vocabulary; codes are
/// stable across requests.
pub fn encode(vocabulary: &[&str], value: &str) -> Option<u32> {
    vocabulary
        .iter()
        .position(|candidate| *candidate == value)
        .map(|index| index as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_has_ten_ordered_fields() {
        assert_eq!(FEATURES.len(), FEATURE_COUNT);
        assert_eq!(FEATURES[0].name, "Contract");
        assert_eq!(FEATURES[9].name, "Premium Tech Support");
    }

    #[test]
    fn encode_matches_training_codes() {
        assert_eq!(encode(CONTRACT, "Month-to-month"), Some(0));
        assert_eq!(encode(CONTRACT, "One year"), Some(1));
        assert_eq!(encode(CONTRACT, "Two year"), Some(2));
        assert_eq!(encode(PAYMENT_METHOD, "Electronic Check"), Some(0));
        assert_eq!(encode(PAYMENT_METHOD, "Credit Card"), Some(3));
        assert_eq!(encode(YES_NO, "No"), Some(0));
        assert_eq!(encode(YES_NO, "Yes"), Some(1));
    }

    #[test]
    fn encode_rejects_unknown_values() {
        assert_eq!(encode(CONTRACT, "Quarterly"), None);
        assert_eq!(encode(YES_NO, "yes"), None);
        assert_eq!(encode(PAYMENT_METHOD, ""), None);
    }
}
