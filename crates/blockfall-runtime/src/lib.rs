//! Terminal event loop for games driven by a variable tick interval.
//!
//! The [`Runtime`] owns the terminal and alternates between three kinds of
//! work for an [`App`]: ticking game logic, handling terminal input, and
//! drawing. The app reports its tick interval on every loop iteration, so a
//! game whose speed changes (level ups, soft drop) is ticked at the rate it
//! currently asks for.

pub use self::{app::App, event_loop::RenderMode, runtime::Runtime};

mod app;
mod event;
mod event_loop;
mod runtime;
