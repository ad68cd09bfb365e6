pub mod entity;
pub mod filter;

pub use entity::*;
pub use filter::*;
