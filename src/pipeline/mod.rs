// Read paths: the caller side of the visibility engine.

pub mod feed;
pub mod profiles;
