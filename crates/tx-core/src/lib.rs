pub mod error;
pub mod segment;
pub mod token;

pub use error::*;
pub use segment::*;
pub use token::*;
