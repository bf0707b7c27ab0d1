// Masking — replacement patterns and the objects they are applied to.

pub mod pattern;
pub mod replaceable;

pub use self::pattern::ReplacementPattern;
pub use self::replaceable::Replaceable;
