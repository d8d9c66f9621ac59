pub mod breakpoint;
pub mod exec;
pub mod frame;
pub mod thread_group;
pub mod variable;

pub use breakpoint::*;
pub use exec::*;
pub use frame::*;
pub use thread_group::*;
pub use variable::*;
