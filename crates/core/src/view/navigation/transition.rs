//! Named transition descriptors and their animation parameters.
//!
//! A [`Transition`] names a visual effect played alongside a stack mutation.
//! [`Transition::spec`] is a pure mapping to the concrete parameters; specs
//! are recreated per call and never stored, so there is no state to keep in
//! sync with the stack.

use std::time::Duration;

/// Duration of the cross-fade transitions.
const FADE_DURATION: Duration = Duration::from_millis(150);
/// Duration of the slide transitions.
const SLIDE_DURATION: Duration = Duration::from_millis(300);

/// A named transition played alongside a stack mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Cross-fade toward a newly pushed screen.
    Fade,
    /// Reverse cross-fade while popping.
    Unfade,
    /// New screen slides in from the top edge.
    Slide,
    /// Current screen reveals the outgoing one from the bottom edge.
    Unslide,
}

/// Timing curve applied over a transition's duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimingCurve {
    #[default]
    Linear,
    EaseOut,
    EaseInEaseOut,
}

/// Display edge a sliding effect enters from or reveals toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
}

/// The visual effect a transition plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEffect {
    /// Incoming and outgoing screens cross-fade in place.
    CrossFade,
    /// The incoming screen moves in over the current one.
    MoveIn(Edge),
    /// The current screen moves away, revealing the one beneath.
    Reveal(Edge),
}

/// Concrete animation parameters for one transition playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionSpec {
    pub duration: Duration,
    pub curve: TimingCurve,
    pub effect: TransitionEffect,
}

impl Transition {
    /// Maps the descriptor to its fixed animation parameters.
    pub fn spec(self) -> TransitionSpec {
        match self {
            Transition::Fade => TransitionSpec {
                duration: FADE_DURATION,
                curve: TimingCurve::Linear,
                effect: TransitionEffect::CrossFade,
            },
            Transition::Unfade => TransitionSpec {
                duration: FADE_DURATION,
                curve: TimingCurve::EaseOut,
                effect: TransitionEffect::CrossFade,
            },
            Transition::Slide => TransitionSpec {
                duration: SLIDE_DURATION,
                curve: TimingCurve::EaseInEaseOut,
                effect: TransitionEffect::MoveIn(Edge::Top),
            },
            Transition::Unslide => TransitionSpec {
                duration: SLIDE_DURATION,
                curve: TimingCurve::EaseInEaseOut,
                effect: TransitionEffect::Reveal(Edge::Bottom),
            },
        }
    }
}
