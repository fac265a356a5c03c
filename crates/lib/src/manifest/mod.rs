//! The typed manifest record derived from a parsed SOPM document.
//!
//! The model is a read-only snapshot: it is recomputed in full from the
//! document tree after every mutation and never patched by hand, so it cannot
//! drift from the tree it was derived from.

mod parse;
mod types;

pub use types::*;
