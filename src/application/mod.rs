// Application layer: the ledger and the reports built on top of it.
// Callers (the CLI, tests) go through `Ledger`; nothing here knows about
// presentation.

pub mod error;
pub mod ledger;
pub mod reporting;

pub use error::*;
pub use ledger::*;
pub use reporting::*;
