pub mod collector;
pub mod registry;
pub mod timelock;
pub mod vault;

pub use collector::*;
pub use registry::*;
pub use timelock::*;
pub use vault::*;
