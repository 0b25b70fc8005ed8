pub mod measurement;
pub mod time;

pub use measurement::*;
pub use time::*;
