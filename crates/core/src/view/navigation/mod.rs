//! Screen-stack navigation.
//!
//! This module provides the navigation stack controller used for moving
//! between screens of a view-based UI.
//!
//! The implementation is split into:
//! - [`stack`]: the owning [`NavigationStack`] controller and its two trait
//!   seams, [`ScreenModule`] and [`NavigationSurface`]
//! - [`transition`]: named transition descriptors and their fixed animation
//!   parameters

pub mod stack;
pub mod transition;

pub use stack::{NavigationStack, NavigationSurface, ScreenModule};
pub use transition::{Transition, TransitionSpec};
