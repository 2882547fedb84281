//! Command implementations.

mod run;
mod validate;

pub use run::run_notify;
pub use validate::run_validate;
