mod chain;
mod transaction;

pub use chain::*;
pub use transaction::*;
