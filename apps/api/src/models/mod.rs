pub mod interview;
pub mod learning;
pub mod profile;
