//! Report types for analysis output

mod result;

pub use result::{Directionality, FieldReport, PointReport};
