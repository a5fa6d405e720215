//! Experiment variant attribution.
//!
//! Every request is attributed to exactly one [`Variant`], so per-variant
//! metric families never carry an "unknown" label value.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Inbound header carrying the experiment group (`"A"` or `"B"`).
pub const EXPERIMENT_HEADER: &str = "x-experiment-group";

/// Outbound header telling the model service which variant served the request.
pub const MODEL_VARIANT_HEADER: &str = "x-model-variant";

/// An experiment bucket a request is attributed to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Control group.
    #[default]
    V1,
    /// Treatment group.
    V2,
}

impl Variant {
    /// All variants, in label order.
    pub const ALL: [Variant; 2] = [Variant::V1, Variant::V2];

    /// Resolve an experiment selector into a variant.
    ///
    /// Only the exact selector `"B"` maps to [`Variant::V2`]; anything else,
    /// including an absent header, falls back to [`Variant::V1`].
    pub fn resolve(selector: Option<&str>) -> Self {
        match selector {
            Some("B") => Variant::V2,
            _ => Variant::V1,
        }
    }

    /// Canonical label value (`"v1"` / `"v2"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::V1 => "v1",
            Variant::V2 => "v2",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn b_selects_v2() {
        assert_eq!(Variant::resolve(Some("B")), Variant::V2);
    }

    #[test]
    fn everything_else_selects_v1() {
        for selector in [None, Some("A"), Some(""), Some("b"), Some(" B"), Some("B "), Some("v2")] {
            assert_eq!(Variant::resolve(selector), Variant::V1, "selector {selector:?}");
        }
    }

    #[test]
    fn serializes_as_label_value() {
        assert_eq!(serde_json::to_string(&Variant::V2).unwrap(), "\"v2\"");
        assert_eq!(Variant::V1.to_string(), "v1");
    }
}
