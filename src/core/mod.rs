pub mod domain;
pub mod normalize;
pub mod report;
