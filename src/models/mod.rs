mod token;
pub use token::*;

mod plan;
pub use plan::*;

mod error;
pub use error::*;
