// src/validate/mod.rs

//! Recipe validation
//!
//! Validators convert recipes into temporary Gradle projects and run the
//! tasks declared in their descriptor.

mod executor;
mod internal_ci;
mod min_max;
mod working_copy;

pub use executor::GradleTasksExecutor;
pub use internal_ci::InternalCiValidator;
pub use min_max::MinMaxValidator;
pub use working_copy::WorkingCopyValidator;
