pub(crate) use super::{DenseLookupTable, DenseLookupTableError};

mod support;
mod table;
