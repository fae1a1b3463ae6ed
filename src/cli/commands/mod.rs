pub mod catalog;
pub mod migrate;
pub mod trainer;
