//! Asynchronous loading on top of the `pagewin` window.
//!
//! `pagewin` only does the bookkeeping of a bounded window over a large data set. This crate
//! adds the moving parts needed by a list view backed by a slow store (database, network):
//!
//! - a [`FetchCoordinator`] that issues at most one fetch at a time and tags it with a
//!   generation, so superseded results are discarded on delivery
//! - a delivery channel carrying results from worker threads back to the interaction thread
//! - scroll anchoring, so prepending records does not make the list jump
//! - the [`WindowAdapter`] facade that ties these together for a renderer
//!
//! Data sources implement [`DataProvider`]; [`VecProvider`] covers the in-memory case.
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod adapter;
mod anchor;
mod coordinator;
pub mod delivery;
mod error;
mod executor;
mod options;
mod provider;
mod request;

#[cfg(test)]
mod tests;

pub use adapter::{AdapterState, WindowAdapter};
pub use anchor::{HeadlessViewport, ScrollAnchor, Viewport};
pub use coordinator::FetchCoordinator;
pub use delivery::Waker;
pub use error::{BoxError, Error, Result};
pub use executor::{Executor, FetchJob, QueueExecutor, ThreadExecutor};
pub use options::{AdapterOptions, OnFailedCallback, OnProvidedCallback, OnRequestCallback};
pub use provider::{DataProvider, Fetched, VecProvider};
pub use request::{FetchRequest, FetchResult, FetchStatus};

pub use pagewin::{Entry, LoadKind, LoadRequest, RequestToken, WindowOptions, WindowState};
