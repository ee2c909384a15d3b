//! Reusable observers for fixpoint solvers.
//!
//! This crate provides [`Observer`] implementations and the capability traits
//! they are written against, so the same observer can watch any solver whose
//! events and actions implement those traits.
//!
//! # Modules
//!
//! - [`traits`] — capability traits ([`HasIterate`], [`HasStepError`],
//!   [`CanStopEarly`])
//! - [`TracingObserver`] — logs each step through `tracing`
//! - [`StallGuard`] — stops a solve whose step error stops shrinking
//!
//! # Features
//!
//! - `plot` — Enables [`PlotObserver`] for visualizing solver behavior via egui.
//!   This feature adds dependencies on `eframe` and `egui_plot`.
//!
//! [`Observer`]: fixpoint_core::Observer
//! [`HasIterate`]: traits::HasIterate
//! [`HasStepError`]: traits::HasStepError
//! [`CanStopEarly`]: traits::CanStopEarly

pub mod traits;

mod log;
mod stall;

#[cfg(feature = "plot")]
mod plot;

pub use log::TracingObserver;
pub use stall::StallGuard;

#[cfg(feature = "plot")]
pub use plot::{PlotObserver, Plottable, ShowConfig};
