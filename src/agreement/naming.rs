use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Naming rule: column name → annotator key
// ---------------------------------------------------------------------------

/// Maps a column name to the key of the annotator who filled it.
///
/// Any `Fn(&str) -> String` is a rule, so ad-hoc schemes don't need a type.
pub trait AnnotatorNaming {
    fn annotator_key(&self, column: &str) -> String;
}

impl<F> AnnotatorNaming for F
where
    F: Fn(&str) -> String,
{
    fn annotator_key(&self, column: &str) -> String {
        self(column)
    }
}

/// The token after the last `separator` names the annotator: `theme_ann` → `ann`.
/// A name without the separator is its own key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuffixNaming {
    pub separator: char,
}

impl Default for SuffixNaming {
    fn default() -> Self {
        Self { separator: '_' }
    }
}

impl AnnotatorNaming for SuffixNaming {
    fn annotator_key(&self, column: &str) -> String {
        column
            .rsplit(self.separator)
            .next()
            .unwrap_or(column)
            .to_string()
    }
}

// ---------------------------------------------------------------------------
// AnnotatorGroups – ordered key → columns mapping
// ---------------------------------------------------------------------------

/// Columns filled by one annotator, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatorGroup {
    pub key: String,
    pub columns: Vec<String>,
}

/// Annotator groups in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotatorGroups {
    groups: Vec<AnnotatorGroup>,
}

impl AnnotatorGroups {
    /// Partition `columns` by annotator key.
    pub fn from_columns<S, N>(columns: &[S], naming: &N) -> Self
    where
        S: AsRef<str>,
        N: AnnotatorNaming + ?Sized,
    {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut groups: Vec<AnnotatorGroup> = Vec::new();

        for col in columns {
            let col = col.as_ref();
            let key = naming.annotator_key(col);
            let slot = *index.entry(key.clone()).or_insert_with(|| {
                groups.push(AnnotatorGroup {
                    key,
                    columns: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot].columns.push(col.to_string());
        }

        AnnotatorGroups { groups }
    }

    /// Number of annotator groups (`G`).
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AnnotatorGroup> {
        self.groups.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.key.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&AnnotatorGroup> {
        self.groups.iter().find(|g| g.key == key)
    }
}

impl<'a> IntoIterator for &'a AnnotatorGroups {
    type Item = &'a AnnotatorGroup;
    type IntoIter = std::slice::Iter<'a, AnnotatorGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}
