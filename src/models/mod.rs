pub mod cache;
pub mod quote;
