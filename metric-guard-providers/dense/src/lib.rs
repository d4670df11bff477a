//! Lookup-table preprocessors backed by dense `f32` rows loaded from Arrow
//! arrays or Parquet columns.

mod errors;
mod ingest;
mod table;

pub use errors::DenseLookupTableError;
pub use table::DenseLookupTable;

#[cfg(test)]
mod tests;
