use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use crate::error::{AgreementError, Result};

// ---------------------------------------------------------------------------
// CodeValue – a single cell in a coding column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common Pandas dtypes.
///
/// `Null` and `Float(NaN)` are both treated as *missing*; every other value is a
/// code. Codes live in `BTreeMap` / `BTreeSet` downstream so `CodeValue` must be
/// `Ord`, and equality follows that ordering. `Integer` and `Float` share one
/// numeric order, so `Integer(1) == Float(1.0)` and `-0.0 == 0.0`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CodeValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

/// 2^63: the first float above every `i64`.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// NaN sorts above every number and equals every other NaN.
fn cmp_floats(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Exact comparison; `a as f64` would round for large integers.
fn cmp_int_float(a: i64, b: f64) -> Ordering {
    if b.is_nan() || b >= I64_BOUND {
        return Ordering::Less;
    }
    if b < -I64_BOUND {
        return Ordering::Greater;
    }
    let whole = b.trunc();
    a.cmp(&(whole as i64))
        .then_with(|| cmp_floats(0.0, b - whole))
}

/// The float as an `i64` when it is a whole number in range.
fn whole_float(v: f64) -> Option<i64> {
    (v.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(&v)).then_some(v as i64)
}

impl CodeValue {
    fn type_rank(&self) -> u8 {
        match self {
            CodeValue::Null => 0,
            CodeValue::Bool(_) => 1,
            CodeValue::Integer(_) | CodeValue::Float(_) => 2,
            CodeValue::String(_) => 3,
        }
    }
}

// -- Manual Eq/Ord so we can put CodeValue in BTreeSet --

impl PartialEq for CodeValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CodeValue {}

impl PartialOrd for CodeValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CodeValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use CodeValue::*;
        let ra = self.type_rank();
        let rb = other.type_rank();
        if ra != rb {
            return ra.cmp(&rb);
        }
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => cmp_floats(*a, *b),
            (Integer(a), Float(b)) => cmp_int_float(*a, *b),
            (Float(a), Integer(b)) => cmp_int_float(*b, *a).reverse(),
            (String(a), String(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CodeValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.type_rank().hash(state);
        match self {
            CodeValue::String(s) => s.hash(state),
            CodeValue::Integer(i) => i.hash(state),
            CodeValue::Float(f) => match whole_float(*f) {
                Some(i) => i.hash(state),
                None if f.is_nan() => f64::NAN.to_bits().hash(state),
                None => f.to_bits().hash(state),
            },
            CodeValue::Bool(b) => b.hash(state),
            CodeValue::Null => {}
        }
    }
}

impl fmt::Display for CodeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeValue::String(s) => write!(f, "{s}"),
            CodeValue::Integer(i) => write!(f, "{i}"),
            CodeValue::Float(v) => write!(f, "{v}"),
            CodeValue::Bool(b) => write!(f, "{b}"),
            CodeValue::Null => write!(f, "<missing>"),
        }
    }
}

impl From<&str> for CodeValue {
    fn from(s: &str) -> Self {
        CodeValue::String(s.to_string())
    }
}

impl From<String> for CodeValue {
    fn from(s: String) -> Self {
        CodeValue::String(s)
    }
}

impl From<i64> for CodeValue {
    fn from(i: i64) -> Self {
        CodeValue::Integer(i)
    }
}

impl From<f64> for CodeValue {
    fn from(v: f64) -> Self {
        CodeValue::Float(v)
    }
}

impl From<bool> for CodeValue {
    fn from(b: bool) -> Self {
        CodeValue::Bool(b)
    }
}

impl<T: Into<CodeValue>> From<Option<T>> for CodeValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(CodeValue::Null, Into::into)
    }
}

impl CodeValue {
    /// `true` for `Null` and for a NaN float, the two spellings of "no answer".
    pub fn is_missing(&self) -> bool {
        match self {
            CodeValue::Null => true,
            CodeValue::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    /// The value itself, or `None` when it is missing.
    pub fn as_code(&self) -> Option<&CodeValue> {
        if self.is_missing() {
            None
        } else {
            Some(self)
        }
    }
}

/// Shared stand-in for cells a row does not carry.
static MISSING: CodeValue = CodeValue::Null;

// ---------------------------------------------------------------------------
// CodedItem – one row of the coding table
// ---------------------------------------------------------------------------

/// A single coded item (one row of the source DataFrame).
#[derive(Debug, Clone, Default)]
pub struct CodedItem {
    /// Dynamic columns: column_name → value. Absent columns read as missing.
    pub cells: BTreeMap<String, CodeValue>,
}

impl CodedItem {
    /// Value of `column` for this item; absent cells are reported as missing.
    pub fn get(&self, column: &str) -> &CodeValue {
        self.cells.get(column).unwrap_or(&MISSING)
    }
}

impl<K: Into<String>, V: Into<CodeValue>> FromIterator<(K, V)> for CodedItem {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        CodedItem {
            cells: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// CodingTable – the complete table of items × columns
// ---------------------------------------------------------------------------

/// Rows of coded items plus the ordered list of known column names.
#[derive(Debug, Clone, Default)]
pub struct CodingTable {
    /// All items (rows), in insertion order.
    items: Vec<CodedItem>,
    /// Ordered, duplicate-free list of column names.
    column_names: Vec<String>,
}

impl CodingTable {
    /// Build a table from positional rows laid out like `columns`.
    pub fn from_rows<S, R, V>(columns: &[S], rows: R) -> Result<Self>
    where
        S: AsRef<str>,
        R: IntoIterator<Item = Vec<V>>,
        V: Into<CodeValue>,
    {
        let mut column_names: Vec<String> = Vec::with_capacity(columns.len());
        for col in columns {
            let col = col.as_ref();
            if !column_names.iter().any(|c| c == col) {
                column_names.push(col.to_string());
            }
        }

        let mut items = Vec::new();
        for (row_no, row) in rows.into_iter().enumerate() {
            if row.len() != columns.len() {
                return Err(AgreementError::RowWidthMismatch {
                    row: row_no,
                    expected: columns.len(),
                    found: row.len(),
                });
            }
            let mut cells = BTreeMap::new();
            for (col, value) in columns.iter().zip(row) {
                cells.insert(col.as_ref().to_string(), value.into());
            }
            items.push(CodedItem { cells });
        }

        Ok(CodingTable {
            items,
            column_names,
        })
    }

    /// Build column indices from already-keyed items.
    ///
    /// Column order follows first appearance across the items.
    pub fn from_items(items: Vec<CodedItem>) -> Self {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let mut column_names = Vec::new();
        for item in &items {
            for col in item.cells.keys() {
                if seen.insert(col.as_str()) {
                    column_names.push(col.clone());
                }
            }
        }
        CodingTable {
            items,
            column_names,
        }
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the table has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Ordered list of column names.
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn items(&self) -> &[CodedItem] {
        &self.items
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_names.iter().any(|c| c == column)
    }

    /// Fail with [`AgreementError::MissingColumn`] on the first unknown name.
    pub fn require_columns<S: AsRef<str>>(&self, columns: &[S]) -> Result<()> {
        match columns.iter().find(|c| !self.has_column(c.as_ref())) {
            Some(missing) => Err(AgreementError::MissingColumn(missing.as_ref().to_string())),
            None => Ok(()),
        }
    }

    /// Value at (`row`, `column`). Rows past the end and absent cells read as missing.
    pub fn cell(&self, row: usize, column: &str) -> &CodeValue {
        self.items.get(row).map_or(&MISSING, |item| item.get(column))
    }

    /// Every value of `column`, missing ones included, in row order.
    pub fn column(&self, column: &str) -> Result<Vec<&CodeValue>> {
        self.require_columns(&[column])?;
        Ok(self.items.iter().map(|item| item.get(column)).collect())
    }

    /// Sorted set of the non-missing values of `column`.
    pub fn unique_values(&self, column: &str) -> Result<BTreeSet<CodeValue>> {
        Ok(self
            .column(column)?
            .into_iter()
            .filter_map(CodeValue::as_code)
            .cloned()
            .collect())
    }

    /// Write `values` into `column`, replacing it if it already exists.
    ///
    /// Existing column positions are kept; new columns are appended.
    pub fn set_column(&mut self, column: &str, values: Vec<CodeValue>) -> Result<()> {
        if values.len() != self.items.len() {
            return Err(AgreementError::ColumnLengthMismatch {
                column: column.to_string(),
                expected: self.items.len(),
                found: values.len(),
            });
        }
        if !self.has_column(column) {
            self.column_names.push(column.to_string());
        }
        for (item, value) in self.items.iter_mut().zip(values) {
            item.cells.insert(column.to_string(), value);
        }
        Ok(())
    }
}
