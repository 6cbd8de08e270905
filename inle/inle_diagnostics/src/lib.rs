#![warn(clippy::all)]
#![allow(clippy::new_without_default)]
#![allow(non_camel_case_types)]
#![cfg_attr(debug_assertions, allow(dead_code))]

#[macro_use]
extern crate lazy_static;

#[macro_use]
pub mod prelude;

pub mod log;

pub use prelude::*;
