//! Bucketcast types

mod event;
pub mod json;
mod record;
mod topic;

pub use event::*;
pub use record::*;
pub use topic::*;
