//! A bounded, sliding in-memory window over a logically unbounded sequence of records.
//!
//! For the asynchronous side (fetch coordination, delivery, the list-adapter facade), see the
//! `pagewin-adapter` crate.
//!
//! This crate is the pure bookkeeping half: which logical range is materialized, how an incoming
//! range is placed (replace, append, prepend, overwrite), which records fall out of the window,
//! and when rendering a position should ask for more data.
//!
//! It is thread-agnostic and never blocks. The owner is expected to:
//! - apply fetched ranges in order via [`Window::apply`]
//! - release the records returned in [`Applied`]
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod options;
pub mod plan;
mod state;
mod types;
mod window;


pub use options::WindowOptions;
pub use plan::Plan;
pub use state::WindowState;
pub use types::{Entry, LoadKind, LoadRequest, Placement, RequestToken};
pub use window::{Applied, Window};
