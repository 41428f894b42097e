pub mod catalog;
pub mod plant;
