// Policy vocabulary and decision matrices — the leaves of the engine.

mod error;
pub mod matrix;
mod types;

pub use self::error::ParseError;
pub use self::matrix::Strategy;
pub use self::types::*;
