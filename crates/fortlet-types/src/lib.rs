#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]
#![forbid(unsafe_code)]

mod ops;
mod types;

pub use ops::OpClass;
pub use types::Type;
