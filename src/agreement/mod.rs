//! Agreement statistics over annotator columns.
//!
//! ```text
//!  columns ──► naming ──► AnnotatorGroups
//!                              │
//!        table ──► annotations (one RowAnnotations per item)
//!                   │                 │                 │
//!                   ▼                 ▼                 ▼
//!                fleiss            majority           cohen
//!            (+ codes: pe)    (writes *_all cols)   (per pair)
//! ```

pub mod annotations;
pub mod codes;
pub mod cohen;
pub mod fleiss;
pub mod majority;
pub mod naming;

use std::collections::BTreeSet;

use crate::config::AgreementConfig;
use crate::data::model::{CodeValue, CodingTable};
use crate::error::Result;

use cohen::PairwiseKappa;
use fleiss::KappaReport;
use majority::MajorityColumns;
use naming::{AnnotatorGroups, AnnotatorNaming, SuffixNaming};

/// Entry point bundling a naming rule with the majority selector's output suffix.
#[derive(Debug, Clone)]
pub struct AgreementAnalyzer<N = SuffixNaming> {
    naming: N,
    output_suffix: String,
}

impl Default for AgreementAnalyzer {
    fn default() -> Self {
        Self::from_config(&AgreementConfig::default())
    }
}

impl AgreementAnalyzer {
    pub fn from_config(config: &AgreementConfig) -> Self {
        Self {
            naming: config.naming(),
            output_suffix: config.output_suffix.clone(),
        }
    }
}

impl<N: AnnotatorNaming> AgreementAnalyzer<N> {
    /// Replace the naming rule, keeping the output suffix.
    pub fn with_naming<M: AnnotatorNaming>(self, naming: M) -> AgreementAnalyzer<M> {
        AgreementAnalyzer {
            naming,
            output_suffix: self.output_suffix,
        }
    }

    pub fn naming(&self) -> &N {
        &self.naming
    }

    pub fn output_suffix(&self) -> &str {
        &self.output_suffix
    }

    pub fn group_columns<S: AsRef<str>>(&self, columns: &[S]) -> AnnotatorGroups {
        AnnotatorGroups::from_columns(columns, &self.naming)
    }

    pub fn codes<S: AsRef<str>>(
        &self,
        table: &CodingTable,
        columns: &[S],
    ) -> Result<BTreeSet<CodeValue>> {
        codes::code_universe(table, columns)
    }

    pub fn kappa_report<S: AsRef<str>>(
        &self,
        table: &CodingTable,
        columns: &[S],
    ) -> Result<KappaReport> {
        fleiss::kappa_report(table, columns, &self.naming)
    }

    pub fn fleiss_kappa<S: AsRef<str>>(&self, table: &CodingTable, columns: &[S]) -> Result<f64> {
        Ok(self.kappa_report(table, columns)?.kappa)
    }

    pub fn select_highest_agreement_code<S: AsRef<str>>(
        &self,
        table: &mut CodingTable,
        columns: &[S],
        primary_label: &str,
        secondary_label: Option<&str>,
    ) -> Result<MajorityColumns> {
        majority::select_highest_agreement_code(
            table,
            columns,
            &self.naming,
            &self.output_suffix,
            primary_label,
            secondary_label,
        )
    }

    pub fn pairwise_cohen_kappa<S: AsRef<str>>(
        &self,
        table: &CodingTable,
        columns: &[S],
    ) -> Result<Vec<PairwiseKappa>> {
        cohen::pairwise_cohen_kappa(table, columns, &self.naming)
    }
}

// ---------------------------------------------------------------------------
// Default-convention shortcuts
// ---------------------------------------------------------------------------

/// Group columns by the suffix after their last `_`.
pub fn group_columns_by_annotator<S: AsRef<str>>(columns: &[S]) -> AnnotatorGroups {
    AgreementAnalyzer::default().group_columns(columns)
}

/// Fleiss' kappa for `columns` under the default naming convention.
pub fn fleiss_kappa<S: AsRef<str>>(table: &CodingTable, columns: &[S]) -> Result<f64> {
    AgreementAnalyzer::default().fleiss_kappa(table, columns)
}

/// Majority code columns (`{label}_all`) under the default conventions.
pub fn select_highest_agreement_code<S: AsRef<str>>(
    table: &mut CodingTable,
    columns: &[S],
    primary_label: &str,
    secondary_label: Option<&str>,
) -> Result<MajorityColumns> {
    AgreementAnalyzer::default().select_highest_agreement_code(
        table,
        columns,
        primary_label,
        secondary_label,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_naming_changes_groups() {
        let table = CodingTable::from_rows(
            &["ann:theme", "bob:theme"],
            vec![vec!["X", "X"], vec!["Y", "X"]],
        )
        .unwrap();

        let by_prefix = AgreementAnalyzer::default()
            .with_naming(|col: &str| col.split(':').next().unwrap_or(col).to_string());
        let groups = by_prefix.group_columns(table.column_names());
        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["ann", "bob"]);

        let report = by_prefix.kappa_report(&table, table.column_names()).unwrap();
        assert_eq!(report.concordant_pairs, 1);
    }

    #[test]
    fn test_configured_suffix() {
        let config = AgreementConfig {
            separator: '-',
            output_suffix: "_majority".to_string(),
        };
        let analyzer = AgreementAnalyzer::from_config(&config);
        let mut table = CodingTable::from_rows(
            &["t-a", "t-b", "u-a"],
            vec![vec![CodeValue::from("X"), "X".into(), "Y".into()]],
        )
        .unwrap();

        assert_eq!(analyzer.group_columns(&["t-a", "t-b", "u-a"]).len(), 2);
        let written = analyzer
            .select_highest_agreement_code(&mut table, &["t-a", "t-b", "u-a"], "theme", None)
            .unwrap();
        assert_eq!(written.primary, "theme_majority");
        // annotator a answers with t-a before u-a
        assert_eq!(table.cell(0, "theme_majority"), &CodeValue::from("X"));
    }

    #[test]
    fn test_shortcuts_use_default_convention() {
        let groups = group_columns_by_annotator(&["q1_ann", "q2_ann", "q1_bob"]);
        assert_eq!(groups.len(), 2);
    }
}
