//! View-layer vocabulary shared by every screen.
//!
//! A *screen* is one entry of the navigation stack: an opaque, boxed view
//! object identified two ways. Its [`Id`] is a runtime identity drawn from
//! the global [`ID_FEEDER`] and is unique per handle; its [`ScreenKind`] is
//! an explicit identifier registered at creation time and is what kind-based
//! lookup and removal match on. Two screens may share a kind but never an id.

use downcast_rs::{impl_downcast, Downcast};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

pub mod navigation;

/// Runtime identity of a single view object.
pub type Id = u64;

/// Monotonic feeder for view identities.
pub struct IdFeeder {
    next: AtomicU64,
}

impl IdFeeder {
    const fn new() -> IdFeeder {
        IdFeeder {
            next: AtomicU64::new(0),
        }
    }

    /// Returns the next unused identity.
    pub fn next(&self) -> Id {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

/// Global identity feeder; every constructed screen draws its [`Id`] here.
pub static ID_FEEDER: IdFeeder = IdFeeder::new();

/// Explicit identifier assigned to a screen at creation time.
///
/// Kind-based operations ([`pop_to`](navigation::NavigationStack::pop_to),
/// the removal helpers) match on this identifier only. Matching is exact
/// equality of the registered name; when several screens on the stack share a
/// kind, the one closest to the root wins.
///
/// Kinds are cheap copyable tokens, typically declared as constants:
///
/// ```
/// use wayfinder_core::view::ScreenKind;
///
/// const READER: ScreenKind = ScreenKind::new("reader");
/// assert_eq!(READER, ScreenKind::new("reader"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScreenKind(&'static str);

impl ScreenKind {
    /// Registers a kind under the given name.
    pub const fn new(name: &'static str) -> ScreenKind {
        ScreenKind(name)
    }

    /// The registered name.
    pub fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ScreenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// How a screen entered the stack when pushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PushedStyle {
    /// The surface's native push animation.
    #[default]
    Default,
    /// Pushed under a cross-fade.
    Fade,
    /// Pushed under a slide-in.
    Slide,
}

/// Presentation metadata attached to a screen at resolution time.
///
/// The stack controller tags every screen it resolves and never reads the
/// style back; the screen itself is the only consumer. `None` is the
/// explicit no-style case, so there is no optional capability to probe for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresentationStyle {
    /// No presentation metadata.
    #[default]
    None,
    /// The screen was pushed onto a navigation stack.
    Pushed(PushedStyle),
}

/// One entry of the navigation stack.
///
/// Implementors report a stable [`Id`] (drawn from [`ID_FEEDER`] at
/// construction) and the [`ScreenKind`] they registered under. The
/// presentation-style slot has no-op defaults: screens that do not care
/// about how they were presented simply inherit them.
pub trait Screen: Downcast {
    /// Runtime identity of this handle.
    fn id(&self) -> Id;

    /// The identifier kind-based lookup matches on.
    fn kind(&self) -> ScreenKind;

    /// Presentation metadata attached at resolution time.
    fn presentation(&self) -> PresentationStyle {
        PresentationStyle::None
    }

    /// Stores presentation metadata. Screens without a use for it keep the
    /// default no-op.
    fn set_presentation(&mut self, _style: PresentationStyle) {}
}

impl_downcast!(Screen);

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain {
        id: Id,
    }

    impl Screen for Plain {
        fn id(&self) -> Id {
            self.id
        }

        fn kind(&self) -> ScreenKind {
            ScreenKind::new("plain")
        }
    }

    #[test]
    fn id_feeder_never_repeats() {
        let a = ID_FEEDER.next();
        let b = ID_FEEDER.next();
        let c = ID_FEEDER.next();
        assert!(a < b && b < c);
    }

    #[test]
    fn kind_matches_on_registered_name() {
        assert_eq!(ScreenKind::new("reader"), ScreenKind::new("reader"));
        assert_ne!(ScreenKind::new("reader"), ScreenKind::new("library"));
        assert_eq!(ScreenKind::new("reader").name(), "reader");
    }

    #[test]
    fn presentation_defaults_to_none_and_ignores_writes() {
        let mut screen = Plain {
            id: ID_FEEDER.next(),
        };
        assert_eq!(screen.presentation(), PresentationStyle::None);
        screen.set_presentation(PresentationStyle::Pushed(PushedStyle::Fade));
        assert_eq!(screen.presentation(), PresentationStyle::None);
    }

    #[test]
    fn screens_downcast_to_their_concrete_type() {
        let screen: Box<dyn Screen> = Box::new(Plain {
            id: ID_FEEDER.next(),
        });
        assert!(screen.downcast_ref::<Plain>().is_some());
    }
}
