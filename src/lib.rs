//! # Floem Breakpoints
//! Reactive responsive-breakpoint queries built on Floem's fine-grained
//! reactive runtime.
//!
//! A [`BreakpointMap`] names width conditions such as `"md"` or `"tablet"`.
//! [`create_breakpoints`] turns it into a [`Breakpoints`] value with three
//! primitives:
//!
//! - [`query`](Breakpoints::query) returns a `ReadSignal<bool>` that tracks
//!   whether the viewport satisfies a breakpoint.
//! - [`on_query_change`](Breakpoints::on_query_change) runs a callback with
//!   the current match when the breakpoint is first observed and when the
//!   observed breakpoint changes.
//! - [`select`](Breakpoints::select) picks one of two values by the match,
//!   memoized.
//!
//! ## Example
//! ```rust
//! use std::rc::Rc;
//!
//! use floem_breakpoints::{BreakpointMap, Breakpoints, Viewport};
//! use floem_reactive::SignalGet;
//!
//! let viewport = Viewport::new(640.0);
//! let screens = BreakpointMap::tailwind();
//! let breakpoints = Breakpoints::with_environment(screens, Rc::new(viewport.clone()));
//!
//! let md = breakpoints.query("md", false);
//! let columns = breakpoints.select("md", 3, 1);
//! assert!(!md.get());
//! assert_eq!(columns.get(), 1);
//!
//! viewport.set_width(1024.0);
//! assert!(md.get());
//! assert_eq!(columns.get(), 3);
//! ```
//!
//! ## Media environments
//!
//! Matching is delegated to a [`MediaEnvironment`]. In the browser that is
//! `window.matchMedia` (`BrowserMedia`, wasm32 only). Native windows have
//! no media queries, so the host drives a [`Viewport`] with the window width
//! instead. [`Headless`] reports no capability at all, and every query keeps
//! its default.
//!
//! ## Ownership
//!
//! Primitives belong to the current [`Scope`](floem_reactive::Scope).
//! Disposing the scope releases the media subscription. When the name of a
//! reactive query changes, the old subscription is released before the new
//! one is made.
//!
//! A breakpoint whose predicate is empty (a range with neither bound, a
//! definition of an unrecognized shape, or a name missing from the map)
//! matches all media and is always `true` wherever matching is available.

pub mod breakpoint;
pub mod error;
pub mod media;
pub mod media_query;
pub mod query;
pub mod viewport;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use breakpoint::{BreakpointMap, BreakpointSpec};
pub use error::{ConfigError, MediaError};
pub use media::{
    Headless, ListenerId, MediaChange, MediaEnvironment, MediaListener, MediaQueryList,
    Subscription, default_environment, subscribe,
};
pub use media_query::{MediaQuery, WidthCondition};
pub use query::{Breakpoints, create_breakpoints};
pub use viewport::Viewport;
#[cfg(target_arch = "wasm32")]
pub use web::BrowserMedia;
