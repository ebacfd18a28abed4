#![doc = include_str!("../README.md")]

mod base32;
mod error;
mod generator;
mod id;
mod source;
mod time;

pub use crate::base32::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::source::*;
pub use crate::time::*;
