//! Level 7: net realisable value.
//!
//! An assessment receives the cost per kilogram as a plain [`Decimal`] and
//! returns a fresh value. It never borrows a Level 6 result, so no write-back
//! path into the costed levels exists.
//!
//! [`Decimal`]: rust_decimal::Decimal

#![deny(missing_docs)]

mod nrv;

pub use nrv::{assess_nrv, assess_sku, NrvAssessment, NrvInput};
