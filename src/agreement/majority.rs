use log::info;
use serde::Serialize;

use super::annotations::row_annotations;
use super::naming::{AnnotatorGroups, AnnotatorNaming};
use crate::data::model::{CodeValue, CodingTable};
use crate::error::{AgreementError, Result};

/// Columns written by [`select_highest_agreement_code`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MajorityColumns {
    pub primary: String,
    pub secondary: Option<String>,
    /// Rows with at least two responding annotators.
    pub filled_rows: usize,
}

/// Code frequencies in order of first appearance.
fn tally<'a>(values: &[&'a CodeValue]) -> Vec<(&'a CodeValue, usize)> {
    let mut counts: Vec<(&CodeValue, usize)> = Vec::new();
    for &value in values {
        match counts.iter_mut().find(|(code, _)| *code == value) {
            Some((_, n)) => *n += 1,
            None => counts.push((value, 1)),
        }
    }
    // Stable: equal counts keep first-seen order.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Write each row's most frequent annotator code into `{primary_label}{suffix}`
/// and, when `secondary_label` is given, the runner-up into
/// `{secondary_label}{suffix}`.
///
/// The table is modified in place. Both output columns are reset to missing
/// before being filled, so running this twice overwrites the earlier result.
/// Rows with fewer than two responding annotators stay missing, as does the
/// runner-up when every responder gave the same code. All columns are
/// validated before anything is written.
pub fn select_highest_agreement_code<S, N>(
    table: &mut CodingTable,
    columns: &[S],
    naming: &N,
    suffix: &str,
    primary_label: &str,
    secondary_label: Option<&str>,
) -> Result<MajorityColumns>
where
    S: AsRef<str>,
    N: AnnotatorNaming + ?Sized,
{
    let primary_column = format!("{primary_label}{suffix}");
    let secondary_column = secondary_label.map(|label| format!("{label}{suffix}"));
    if secondary_column.as_deref() == Some(primary_column.as_str()) {
        return Err(AgreementError::ConflictingOutputColumns(primary_column));
    }

    table.require_columns(columns)?;
    let groups = AnnotatorGroups::from_columns(columns, naming);

    let mut primary = vec![CodeValue::Null; table.len()];
    let mut secondary = vec![CodeValue::Null; table.len()];
    let mut filled_rows = 0;

    for (idx, row) in row_annotations(table, &groups)?.iter().enumerate() {
        let values = row.values();
        if values.len() < 2 {
            continue;
        }
        let counts = tally(&values);
        primary[idx] = counts[0].0.clone();
        if let Some((runner_up, _)) = counts.get(1) {
            secondary[idx] = (*runner_up).clone();
        }
        filled_rows += 1;
    }

    table.set_column(&primary_column, primary)?;
    if let Some(column) = &secondary_column {
        table.set_column(column, secondary)?;
    }
    info!(
        "wrote {primary_column}{} for {filled_rows} of {} rows",
        secondary_column
            .as_deref()
            .map(|c| format!(" and {c}"))
            .unwrap_or_default(),
        table.len()
    );

    Ok(MajorityColumns {
        primary: primary_column,
        secondary: secondary_column,
        filled_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agreement::naming::SuffixNaming;

    fn table() -> CodingTable {
        CodingTable::from_rows(
            &["doc", "t_1", "t_2", "t_3"],
            vec![
                vec![CodeValue::from("d1"), "X".into(), "X".into(), "Y".into()],
                vec![CodeValue::from("d2"), "Y".into(), CodeValue::Null, CodeValue::Null],
                vec![CodeValue::from("d3"), "Z".into(), "Z".into(), "Z".into()],
                vec![CodeValue::from("d4"), "Y".into(), "X".into(), CodeValue::Null],
            ],
        )
        .unwrap()
    }

    const CODERS: [&str; 3] = ["t_1", "t_2", "t_3"];

    #[test]
    fn test_majority_and_runner_up() {
        let mut table = table();
        let written = select_highest_agreement_code(
            &mut table,
            &CODERS,
            &SuffixNaming::default(),
            "_all",
            "top",
            Some("second"),
        )
        .unwrap();

        assert_eq!(written.primary, "top_all");
        assert_eq!(written.secondary.as_deref(), Some("second_all"));
        assert_eq!(written.filled_rows, 3);

        assert_eq!(table.cell(0, "top_all"), &CodeValue::from("X"));
        assert_eq!(table.cell(0, "second_all"), &CodeValue::from("Y"));
        // single responder
        assert!(table.cell(1, "top_all").is_missing());
        assert!(table.cell(1, "second_all").is_missing());
        // unanimous: no runner-up
        assert_eq!(table.cell(2, "top_all"), &CodeValue::from("Z"));
        assert!(table.cell(2, "second_all").is_missing());
    }

    #[test]
    fn test_ties_follow_annotator_order() {
        let mut table = table();
        select_highest_agreement_code(
            &mut table,
            &CODERS,
            &SuffixNaming::default(),
            "_all",
            "top",
            Some("second"),
        )
        .unwrap();

        assert_eq!(table.cell(3, "top_all"), &CodeValue::from("Y"));
        assert_eq!(table.cell(3, "second_all"), &CodeValue::from("X"));
    }

    #[test]
    fn test_primary_only() {
        let mut table = table();
        let naming = SuffixNaming::default();
        let written =
            select_highest_agreement_code(&mut table, &CODERS, &naming, "_all", "top", None)
                .unwrap();
        assert_eq!(written.secondary, None);
        assert_eq!(table.column_names().len(), 5);
        assert_eq!(table.cell(0, "doc"), &CodeValue::from("d1"));
    }

    #[test]
    fn test_rerun_overwrites_columns() {
        let mut table = table();
        let naming = SuffixNaming::default();
        for _ in 0..2 {
            select_highest_agreement_code(
                &mut table,
                &CODERS,
                &naming,
                "_all",
                "top",
                Some("second"),
            )
            .unwrap();
        }

        let names = table.column_names();
        assert_eq!(names.len(), 6);
        assert_eq!(names.iter().filter(|c| *c == "top_all").count(), 1);
        assert_eq!(table.cell(0, "top_all"), &CodeValue::from("X"));
    }

    #[test]
    fn test_integer_and_float_codes_tally_together() {
        let mut table = CodingTable::from_rows(
            &["n_1", "n_2"],
            vec![
                vec![CodeValue::Float(1.0), CodeValue::Integer(1)],
                vec![CodeValue::Float(2.0), CodeValue::Integer(1)],
            ],
        )
        .unwrap();
        select_highest_agreement_code(
            &mut table,
            &["n_1", "n_2"],
            &SuffixNaming::default(),
            "_all",
            "top",
            Some("second"),
        )
        .unwrap();

        assert_eq!(table.cell(0, "top_all"), &CodeValue::Integer(1));
        assert!(table.cell(0, "second_all").is_missing());
        assert_eq!(table.cell(1, "top_all"), &CodeValue::Integer(2));
        assert_eq!(table.cell(1, "second_all"), &CodeValue::Integer(1));
    }

    #[test]
    fn test_missing_column_leaves_table_untouched() {
        let mut table = table();
        let err = select_highest_agreement_code(
            &mut table,
            &["t_1", "t_9"],
            &SuffixNaming::default(),
            "_all",
            "top",
            None,
        )
        .unwrap_err();
        assert!(err.is_missing_column());
        assert!(!table.has_column("top_all"));
    }

    #[test]
    fn test_conflicting_labels() {
        let mut table = table();
        let err = select_highest_agreement_code(
            &mut table,
            &CODERS,
            &SuffixNaming::default(),
            "_all",
            "top",
            Some("top"),
        )
        .unwrap_err();
        assert_eq!(
            err,
            AgreementError::ConflictingOutputColumns("top_all".to_string())
        );
    }
}
