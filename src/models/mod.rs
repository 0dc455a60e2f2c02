//! Record model
//!
//! Character records, their validation rules and the derived sheet view.

pub mod character;
pub mod sheet;
pub mod validation;

pub use character::*;
pub use sheet::*;
pub use validation::{FieldViolation, Validatable, ValidationErrors, ValidationResult};
