//! Matrix decomposition of the actor × entity incidence table.
//!
//! [`ContingencyTable`] cross-tabulates relations; [`CorrespondenceAnalysis`]
//! decomposes its chi-square standardized residuals into jointly
//! interpretable row and column coordinates.
//!
//! # Example
//!
//! ```
//! use follownet::decomposition::{ContingencyTable, CorrespondenceAnalysis, SvdMethod};
//! use follownet::relation::RelationSet;
//!
//! let set = RelationSet::from_pairs(&[
//!     ("a", "x"), ("a", "y"), ("b", "y"), ("b", "z"), ("c", "z"), ("c", "x"), ("d", "x"),
//! ]);
//! let table = ContingencyTable::from_relations(&set).expect("non-empty input");
//! let ca = CorrespondenceAnalysis::new(2)
//!     .with_method(SvdMethod::Full)
//!     .fit(&table)
//!     .expect("table is at least 2x2");
//!
//! assert_eq!(ca.row_coordinates.shape(), (4, 2));
//! assert!(ca.inertia_percent.iter().sum::<f64>() <= 100.0 + 1e-9);
//! ```

mod contingency;
mod correspondence;

pub use contingency::ContingencyTable;
pub use correspondence::{CaResult, CorrespondenceAnalysis, SvdMethod};
