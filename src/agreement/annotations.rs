use log::trace;

use super::naming::AnnotatorGroups;
use crate::data::model::{CodeValue, CodedItem, CodingTable};
use crate::error::Result;

/// One item's answers, one slot per annotator group in group order.
///
/// A slot holds the first non-missing value among that group's columns, or
/// `None` when the annotator left the item uncoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowAnnotations<'t> {
    slots: Vec<Option<&'t CodeValue>>,
}

impl<'t> RowAnnotations<'t> {
    pub fn from_item(item: &'t CodedItem, groups: &AnnotatorGroups) -> Self {
        let slots = groups
            .iter()
            .map(|group| {
                group
                    .columns
                    .iter()
                    .find_map(|col| item.get(col).as_code())
            })
            .collect();
        RowAnnotations { slots }
    }

    pub fn slots(&self) -> &[Option<&'t CodeValue>] {
        &self.slots
    }

    /// The row annotation vector: responding annotators' codes only.
    pub fn values(&self) -> Vec<&'t CodeValue> {
        self.slots.iter().flatten().copied().collect()
    }

    /// Number of annotators that coded the item.
    pub fn responders(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Unordered pairs of responding annotators that gave the same code.
    pub fn concordant_pairs(&self) -> usize {
        let values = self.values();
        let mut agree = 0;
        for (i, a) in values.iter().enumerate() {
            agree += values[i + 1..].iter().filter(|b| *b == a).count();
        }
        agree
    }
}

/// Build every row's annotations in a single pass over the table.
///
/// Fails if any grouped column is absent from the table.
pub fn row_annotations<'t>(
    table: &'t CodingTable,
    groups: &AnnotatorGroups,
) -> Result<Vec<RowAnnotations<'t>>> {
    for group in groups {
        table.require_columns(&group.columns)?;
    }
    let rows: Vec<RowAnnotations<'t>> = table
        .items()
        .iter()
        .map(|item| RowAnnotations::from_item(item, groups))
        .collect();
    trace!(
        "built annotations for {} rows across {} annotator groups",
        rows.len(),
        groups.len()
    );
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agreement::naming::SuffixNaming;

    fn table() -> CodingTable {
        CodingTable::from_rows(
            &["theme_ann", "alt_ann", "theme_bob", "theme_cy"],
            vec![
                vec![CodeValue::Null, "X".into(), "X".into(), "Y".into()],
                vec!["Y".into(), "Z".into(), CodeValue::Null, CodeValue::Float(f64::NAN)],
                vec!["X".into(), CodeValue::Null, "X".into(), "X".into()],
            ],
        )
        .unwrap()
    }

    fn groups(table: &CodingTable) -> AnnotatorGroups {
        AnnotatorGroups::from_columns(table.column_names(), &SuffixNaming::default())
    }

    #[test]
    fn test_first_non_missing_value_wins() {
        let table = table();
        let groups = groups(&table);
        let rows = row_annotations(&table, &groups).unwrap();

        let (x, y) = (CodeValue::from("X"), CodeValue::from("Y"));
        assert_eq!(rows[0].values(), vec![&x, &x, &y]);
        assert_eq!(rows[1].values(), vec![&y]);
        assert_eq!(rows[1].slots()[1], None);
        assert_eq!(rows[1].responders(), 1);
    }

    #[test]
    fn test_concordant_pairs() {
        let table = table();
        let groups = groups(&table);
        let rows = row_annotations(&table, &groups).unwrap();

        assert_eq!(rows[0].concordant_pairs(), 1);
        assert_eq!(rows[1].concordant_pairs(), 0);
        assert_eq!(rows[2].concordant_pairs(), 3);
    }

    #[test]
    fn test_missing_grouped_column() {
        let table = table();
        let groups =
            AnnotatorGroups::from_columns(&["theme_ann", "theme_dee"], &SuffixNaming::default());
        let err = row_annotations(&table, &groups).unwrap_err();
        assert!(err.is_missing_column());
    }
}
