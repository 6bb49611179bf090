pub mod error;
pub mod id_generator;
pub mod keys;
pub mod result;

pub use error::*;
pub use id_generator::*;
pub use keys::*;
pub use result::*;
