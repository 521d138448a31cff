//! Analyzer configuration

use serde::{Deserialize, Serialize};

use crate::agreement::naming::SuffixNaming;

/// Naming and output conventions for an [`AgreementAnalyzer`](crate::AgreementAnalyzer).
///
/// Deserializes from any serde format; absent fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgreementConfig {
    /// Separator before the annotator key in column names.
    pub separator: char,
    /// Appended to the labels passed to the majority selector.
    pub output_suffix: String,
}

impl Default for AgreementConfig {
    fn default() -> Self {
        Self {
            separator: '_',
            output_suffix: "_all".to_string(),
        }
    }
}

impl AgreementConfig {
    pub fn naming(&self) -> SuffixNaming {
        SuffixNaming {
            separator: self.separator,
        }
    }
}
