use log::{debug, warn};
use serde::Serialize;

use super::annotations::row_annotations;
use super::codes::{code_universe, CodeFrequencies};
use super::naming::{AnnotatorGroups, AnnotatorNaming};
use crate::data::model::{CodeValue, CodingTable};
use crate::error::{AgreementError, Result};

/// Relative frequency of one code across the stacked annotator columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeShare {
    pub code: CodeValue,
    pub proportion: f64,
}

/// Every intermediate quantity behind a Fleiss' kappa value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KappaReport {
    /// Rows in the table, coded or not.
    pub total_items: usize,
    /// Number of annotator groups (`G`).
    pub annotator_groups: usize,
    /// Agreeing annotator pairs summed over rows with at least two responders.
    pub concordant_pairs: usize,
    /// `total_items * G * (G - 1) / 2`.
    pub total_pairs: usize,
    /// Rows where some, but not all, annotators responded. These still count
    /// for the full `G * (G - 1) / 2` pairs in `total_pairs`.
    pub partial_rows: usize,
    /// `pbar`
    pub observed_agreement: f64,
    /// `pe`
    pub chance_agreement: f64,
    pub kappa: f64,
    /// Marginal proportion of each code in the code universe.
    pub marginals: Vec<CodeShare>,
}

/// Compute Fleiss' kappa and its ingredients for `columns`.
///
/// Chance agreement comes from the marginal code distribution over all
/// selected columns; observed agreement counts agreeing annotator pairs per row
/// against `G * (G - 1) / 2` pairs for every row.
pub fn kappa_report<S, N>(
    table: &CodingTable,
    columns: &[S],
    naming: &N,
) -> Result<KappaReport>
where
    S: AsRef<str>,
    N: AnnotatorNaming + ?Sized,
{
    table.require_columns(columns)?;

    let groups = AnnotatorGroups::from_columns(columns, naming);
    let universe = code_universe(table, columns)?;
    let total_items = table.len();
    let g = groups.len();

    let mut concordant_pairs = 0;
    let mut partial_rows = 0;
    for row in row_annotations(table, &groups)? {
        let responders = row.responders();
        if responders > 0 && responders < g {
            partial_rows += 1;
        }
        if responders > 1 {
            concordant_pairs += row.concordant_pairs();
        }
    }

    let total_pairs = total_items * g * g.saturating_sub(1) / 2;
    if total_pairs == 0 {
        warn!("no annotator pairs to compare: {total_items} items, {g} annotator groups");
        return Err(AgreementError::NoItemPairs {
            items: total_items,
            groups: g,
        });
    }

    let freq = CodeFrequencies::from_columns(table, columns)?;
    if freq.total() == 0 {
        warn!("no codes in {} annotator columns", columns.len());
        return Err(AgreementError::NoCodedValues);
    }

    let pe = freq.chance_agreement(&universe);
    if 1.0 - pe <= f64::EPSILON {
        warn!("a single code covers every annotation, chance agreement is 1");
        return Err(AgreementError::ChanceAgreementIsOne);
    }

    let pbar = concordant_pairs as f64 / total_pairs as f64;
    let kappa = (pbar - pe) / (1.0 - pe);
    debug!(
        "fleiss kappa: groups={g} items={total_items} concordant={concordant_pairs}/{total_pairs} \
         partial_rows={partial_rows} pbar={pbar:.4} pe={pe:.4} kappa={kappa:.4}"
    );

    let marginals = freq
        .proportions()
        .map(|(code, proportion)| CodeShare {
            code: code.clone(),
            proportion,
        })
        .collect();

    Ok(KappaReport {
        total_items,
        annotator_groups: g,
        concordant_pairs,
        total_pairs,
        partial_rows,
        observed_agreement: pbar,
        chance_agreement: pe,
        kappa,
        marginals,
    })
}
