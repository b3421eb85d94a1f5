#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]

pub mod console;
pub mod env;
pub mod error;
pub mod eval;
pub mod load;
pub mod program;
mod stack;
pub mod value;

pub use error::EvalError;
pub use program::{Method, Program, RunConfig};
pub use value::Value;
