#[macro_use]
mod log;

pub use log::*;
