#![doc = include_str!("../README.md")]
pub mod error;
pub mod groups;
pub mod output;
pub mod rating;
pub mod records;
pub mod registry;
pub mod reports;

pub use error::Error;
pub use groups::Groups;
pub use output::{Output, Value};
pub use rating::Rating;
pub use records::{load, Record};
pub use registry::{Handler, Registry};
