//! Continuous-integration configuration: which tasks exist on which runners
//! and how they are written to `.bazelci/presubmit.yml`.

pub mod matrix;
pub mod platform;
pub mod presubmit;

pub use matrix::{CiMatrix, CiMatrixBuilder, CiTask};
pub use platform::{CiRunner, Platform, should_run};
