//! Wayfinder: screen-stack navigation for view-based device UIs.
//!
//! The crate is organized around one component, the
//! [`NavigationStack`](view::navigation::NavigationStack): an owned, ordered
//! stack of screen handles with named transition animations, bulk stack
//! replacement, and kind-based removal helpers. Applications plug in through
//! two trait seams: [`ScreenModule`](view::navigation::ScreenModule) resolves
//! opaque module descriptors into screens, and
//! [`NavigationSurface`](view::navigation::NavigationSurface) plays
//! transitions and redraws after committed mutations.
//!
//! The [`logging`] and [`settings`] modules carry the surrounding
//! infrastructure: JSON-structured logs with per-run correlation ids, and
//! TOML-backed configuration.

pub mod logging;
pub mod settings;
pub mod view;
