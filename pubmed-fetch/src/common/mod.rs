//! Shared identifier types for the two NCBI numbering schemes

pub mod ids;

pub use ids::{PmcId, Pmid};
