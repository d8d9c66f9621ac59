pub mod domain;
pub mod error;
pub mod event;
pub mod record;
pub mod value;

pub use domain::*;
pub use error::{Error, Result};
pub use event::*;
pub use record::*;
pub use value::*;
