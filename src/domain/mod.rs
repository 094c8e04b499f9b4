mod aggregate;
mod bucket;
mod budget;
mod catalog;
mod expense;
mod money;

pub use aggregate::*;
pub use bucket::*;
pub use budget::*;
pub use catalog::*;
pub use expense::*;
pub use money::*;
