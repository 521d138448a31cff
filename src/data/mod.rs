//! Data layer: cell values, the coding table, and in-memory conversions.
//!
//! Architecture:
//! ```text
//!  JSON records / raw text cells / positional rows
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ records   │  convert → CodeValue, CodedItem
//!   └──────────┘
//!        │
//!        ▼
//!   ┌─────────────┐
//!   │ CodingTable  │  Vec<CodedItem>, ordered column names
//!   └─────────────┘
//! ```

pub mod model;
pub mod records;
