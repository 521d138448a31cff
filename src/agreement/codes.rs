use std::collections::{BTreeMap, BTreeSet};

use crate::data::model::{CodeValue, CodingTable};
use crate::error::Result;

/// Distinct codes across `columns`, missing values excluded.
pub fn code_universe<S: AsRef<str>>(
    table: &CodingTable,
    columns: &[S],
) -> Result<BTreeSet<CodeValue>> {
    let mut codes = BTreeSet::new();
    for col in columns {
        codes.extend(table.unique_values(col.as_ref())?);
    }
    Ok(codes)
}

// ---------------------------------------------------------------------------
// CodeFrequencies – marginal distribution over the flattened columns
// ---------------------------------------------------------------------------

/// How often each code occurs when every selected column is stacked into one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodeFrequencies {
    counts: BTreeMap<CodeValue, usize>,
    total: usize,
}

impl CodeFrequencies {
    pub fn from_columns<S: AsRef<str>>(table: &CodingTable, columns: &[S]) -> Result<Self> {
        let mut freq = CodeFrequencies::default();
        for col in columns {
            for value in table.column(col.as_ref())? {
                if let Some(code) = value.as_code() {
                    *freq.counts.entry(code.clone()).or_default() += 1;
                    freq.total += 1;
                }
            }
        }
        Ok(freq)
    }

    /// Number of non-missing cells counted.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn count(&self, code: &CodeValue) -> usize {
        self.counts.get(code).copied().unwrap_or(0)
    }

    /// Relative frequency `p_j`; zero for unseen codes or an empty table.
    pub fn proportion(&self, code: &CodeValue) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.count(code) as f64 / self.total as f64
        }
    }

    /// Codes with their relative frequencies, in code order.
    pub fn proportions(&self) -> impl Iterator<Item = (&CodeValue, f64)> {
        self.counts.keys().map(|code| (code, self.proportion(code)))
    }

    /// `pe = Σ p_j²` over `universe`.
    pub fn chance_agreement<'a>(&self, universe: impl IntoIterator<Item = &'a CodeValue>) -> f64 {
        universe
            .into_iter()
            .map(|code| self.proportion(code).powi(2))
            .sum()
    }
}
