//! CLI subcommand implementations.

pub mod day;
pub mod month;
pub mod range;
pub mod status;
pub mod util;
pub mod validate;
pub mod week;
