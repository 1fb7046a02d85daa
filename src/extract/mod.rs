//! GPS track extraction: filter, de-duplicate and annotate fixes from a log

pub mod dedup;
pub mod extractor;
pub mod filter;
pub mod localize;

pub use dedup::*;
pub use extractor::*;
pub use filter::*;
pub use localize::*;
