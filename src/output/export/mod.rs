//! Data export for external analysis
//!
//! # Available Formats
//!
//! - **CSV**: time series as delimited text ([`csv`] submodule)
//!
//! The persisted case format (materials, silos, parameters, cached result)
//! belongs to an external file-handling collaborator; this module only
//! performs one-way export of computed series.

pub mod csv;

pub use csv::{
    export_composition_csv,
    export_flow_csv,
    export_series_csv,
    CsvConfig,
    CsvMetadata,
};
