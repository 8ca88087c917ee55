mod pool;
pub use pool::*;

mod token;
pub use token::*;
