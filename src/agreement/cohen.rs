use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;

use super::annotations::{row_annotations, RowAnnotations};
use super::naming::{AnnotatorGroups, AnnotatorNaming};
use crate::data::model::{CodeValue, CodingTable};
use crate::error::Result;

/// Cohen's kappa between two annotators over the items both coded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairwiseKappa {
    pub first: String,
    pub second: String,
    /// Items coded by both annotators.
    pub shared_items: usize,
    pub observed_agreement: f64,
    pub chance_agreement: f64,
    /// `None` when undefined: no shared items, or both annotators used one
    /// and the same code throughout.
    pub kappa: Option<f64>,
}

fn cohen_kappa(rows: &[RowAnnotations<'_>], a: usize, b: usize) -> (usize, f64, f64, Option<f64>) {
    let mut shared = 0usize;
    let mut agree = 0usize;
    let mut marginal_a: BTreeMap<&CodeValue, usize> = BTreeMap::new();
    let mut marginal_b: BTreeMap<&CodeValue, usize> = BTreeMap::new();

    for row in rows {
        if let (Some(x), Some(y)) = (row.slots()[a], row.slots()[b]) {
            shared += 1;
            if x == y {
                agree += 1;
            }
            *marginal_a.entry(x).or_default() += 1;
            *marginal_b.entry(y).or_default() += 1;
        }
    }

    if shared == 0 {
        return (0, 0.0, 0.0, None);
    }
    let n = shared as f64;
    let po = agree as f64 / n;
    let pe: f64 = marginal_a
        .iter()
        .map(|(code, &ca)| {
            let cb = marginal_b.get(code).copied().unwrap_or(0);
            (ca as f64 / n) * (cb as f64 / n)
        })
        .sum();
    let kappa = if 1.0 - pe <= f64::EPSILON {
        None
    } else {
        Some((po - pe) / (1.0 - pe))
    };
    (shared, po, pe, kappa)
}

/// Cohen's kappa for every unordered pair of annotator groups, in group order.
pub fn pairwise_cohen_kappa<S, N>(
    table: &CodingTable,
    columns: &[S],
    naming: &N,
) -> Result<Vec<PairwiseKappa>>
where
    S: AsRef<str>,
    N: AnnotatorNaming + ?Sized,
{
    table.require_columns(columns)?;
    let groups = AnnotatorGroups::from_columns(columns, naming);
    let rows = row_annotations(table, &groups)?;
    let keys: Vec<&str> = groups.keys().collect();

    let mut pairs = Vec::new();
    for a in 0..keys.len() {
        for b in a + 1..keys.len() {
            let (shared_items, po, pe, kappa) = cohen_kappa(&rows, a, b);
            debug!(
                "cohen kappa {}~{}: shared={shared_items} po={po:.4} pe={pe:.4} kappa={kappa:?}",
                keys[a], keys[b]
            );
            pairs.push(PairwiseKappa {
                first: keys[a].to_string(),
                second: keys[b].to_string(),
                shared_items,
                observed_agreement: po,
                chance_agreement: pe,
                kappa,
            });
        }
    }
    Ok(pairs)
}

/// Average of the defined pairwise kappas (Light's kappa).
pub fn mean_pairwise_kappa(pairs: &[PairwiseKappa]) -> Option<f64> {
    let defined: Vec<f64> = pairs.iter().filter_map(|p| p.kappa).collect();
    if defined.is_empty() {
        None
    } else {
        Some(defined.iter().sum::<f64>() / defined.len() as f64)
    }
}
