#![doc = "Process-wide elapsed-time clock with resettable origin and blocking sleep."]

pub mod clock;
pub mod sleep;
pub mod source;

pub use clock::*;
pub use sleep::*;
pub use source::*;
