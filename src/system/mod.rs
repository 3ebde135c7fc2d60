pub mod collector;
pub mod counters;
pub mod enumerate;
pub mod kernel;
pub mod platform;
pub mod process;
pub mod snapshot;
pub mod source;
pub mod tracker;
