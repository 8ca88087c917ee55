mod polling;
pub use polling::*;

mod transaction;
pub use transaction::*;
