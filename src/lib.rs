//! code-agreement: inter-annotator agreement for qualitative coding tables.
//!
//! Several coders label the same items; each coder's labels live in columns
//! whose name ends with the coder's key (`theme_ann`, `theme_bob`, ...). The
//! crate scores how well the coders agree (Fleiss' kappa, pairwise Cohen's
//! kappa) and writes the per-item majority code back into the table.
//! No IO: build a [`CodingTable`] however you like and hand it over.
//!
//! # Quick start
//!
//! ```rust
//! use code_agreement::{fleiss_kappa, select_highest_agreement_code, CodeValue, CodingTable};
//!
//! let mut table = CodingTable::from_rows(
//!     &["theme_ann", "theme_bob", "theme_cy"],
//!     vec![
//!         vec!["praise", "praise", "complaint"],
//!         vec!["complaint", "complaint", "complaint"],
//!         vec!["question", "praise", "question"],
//!     ],
//! )?;
//! let coders = ["theme_ann", "theme_bob", "theme_cy"];
//!
//! let kappa = fleiss_kappa(&table, &coders)?;
//! assert!(kappa > 0.0 && kappa < 1.0);
//!
//! select_highest_agreement_code(&mut table, &coders, "theme", Some("theme2"))?;
//! assert_eq!(table.cell(0, "theme_all"), &CodeValue::from("praise"));
//! assert_eq!(table.cell(0, "theme2_all"), &CodeValue::from("complaint"));
//! # Ok::<(), code_agreement::AgreementError>(())
//! ```

pub mod agreement;
pub mod config;
pub mod data;
pub mod error;

// Re-export primary public API at crate root.
pub use agreement::cohen::{mean_pairwise_kappa, PairwiseKappa};
pub use agreement::fleiss::{CodeShare, KappaReport};
pub use agreement::majority::MajorityColumns;
pub use agreement::naming::{AnnotatorGroup, AnnotatorGroups, AnnotatorNaming, SuffixNaming};
pub use agreement::{
    fleiss_kappa, group_columns_by_annotator, select_highest_agreement_code, AgreementAnalyzer,
};
pub use config::AgreementConfig;
pub use data::model::{CodeValue, CodedItem, CodingTable};
pub use error::{AgreementError, Result};
