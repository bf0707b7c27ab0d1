// Shroud: content-visibility policy engine
//
// This is the library root. Each module corresponds to a layer of the
// engine, from the policy vocabulary up to the read paths that use it.

pub mod composer;
pub mod config;
pub mod db;
pub mod explain;
pub mod interaction;
pub mod masking;
pub mod output;
pub mod pipeline;
pub mod policy;
pub mod specs;
pub mod status;
