//! The navigation stack controller.
//!
//! [`NavigationStack`] owns the ordered sequence of screens from root to
//! topmost and is the only place that sequence is mutated: every operation
//! funnels its result through one commit path, which hands the new stack to
//! the [`NavigationSurface`] for redraw. Transitions are fire-and-forget
//! effects layered on top of an already-committed mutation; they carry no
//! completion callback and cannot fail the underlying operation.
//!
//! All operations are synchronous and infallible from the caller's point of
//! view: anomalies (empty input, kind not found) degrade to a no-op and are
//! reported through `tracing`.

use fxhash::FxHashSet;
use std::mem;
use thiserror::Error;
use tracing::{debug, warn};

use super::transition::{Transition, TransitionSpec};
use crate::view::{PresentationStyle, PushedStyle, Screen, ScreenKind};

/// Resolves an opaque module descriptor into a screen.
///
/// Every operation that introduces a new screen goes through this seam. The
/// stack controller tags the resolved screen with a [`PresentationStyle`]
/// before it enters the stack; the screen is the only consumer of that tag.
pub trait ScreenModule {
    /// Builds the module's screen.
    fn resolve(&self) -> Box<dyn Screen>;
}

/// The rendering host a [`NavigationStack`] drives.
///
/// The surface receives two kinds of calls, both fire-and-forget:
/// transitions to play over the display, and commit notifications carrying
/// the new stack contents so the host can redraw. Neither returns a value;
/// a surface cannot veto or fail a stack mutation.
pub trait NavigationSurface {
    /// Plays a named transition effect over the surface.
    fn play_transition(&mut self, spec: TransitionSpec);

    /// Called after every committed stack mutation.
    ///
    /// `animated` requests the host's native push/pop animation; it is
    /// `false` whenever a named transition was just played in its place.
    fn stack_committed(&mut self, screens: &[Box<dyn Screen>], animated: bool);
}

/// Operational anomalies reported while mutating the stack.
///
/// All of these are non-fatal: the triggering operation degrades to a no-op
/// or a documented fallback, and the anomaly is logged.
#[derive(Debug, Error)]
enum StackDiagnostic {
    #[error("replace_stack called with an empty module list")]
    EmptyModules,
    #[error("no screen of kind '{0}' on the stack")]
    KindNotFound(ScreenKind),
    #[error("slice index {index} out of bounds for stack of depth {depth}")]
    SliceOutOfBounds { index: usize, depth: usize },
    #[error("pop requested with only the root screen on the stack")]
    PopAtRoot,
}

fn report(diagnostic: StackDiagnostic) {
    warn!("{}", diagnostic);
}

/// An owned, ordered stack of screens with transition-animated mutations.
///
/// Index 0 is the root, the last entry is the topmost, visible screen. The
/// stack is exclusively owned and must be driven from a single thread; no
/// operation suspends or blocks. Apart from the moment between construction
/// and the first [`replace_stack`](NavigationStack::replace_stack), the
/// stack is never left empty.
///
/// Kind-based operations scan from root to top and take the first screen
/// whose [`ScreenKind`] matches; when two screens share a kind, only the one
/// closest to the root is ever addressable this way.
pub struct NavigationStack<S: NavigationSurface> {
    screens: Vec<Box<dyn Screen>>,
    surface: S,
}

impl<S: NavigationSurface> NavigationStack<S> {
    /// Creates an empty stack bound to `surface`.
    ///
    /// The stack is expected to be seeded immediately with
    /// [`replace_stack`](NavigationStack::replace_stack).
    pub fn new(surface: S) -> NavigationStack<S> {
        NavigationStack {
            screens: Vec::new(),
            surface,
        }
    }

    /// The screens from root to topmost.
    pub fn screens(&self) -> &[Box<dyn Screen>] {
        &self.screens
    }

    /// Number of screens on the stack.
    pub fn depth(&self) -> usize {
        self.screens.len()
    }

    /// The topmost, visible screen.
    pub fn top(&self) -> Option<&dyn Screen> {
        self.screens.last().map(|screen| screen.as_ref())
    }

    /// The surface this stack drives.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Replaces the entire stack with the screens resolved from `modules`,
    /// in input order, each tagged `Pushed(style)`.
    ///
    /// With `style` [`PushedStyle::Default`], `animated` requests the
    /// surface's native animation. With `Fade` or `Slide`, `animated` plays
    /// the matching named transition instead and the replacement itself
    /// commits unanimated.
    ///
    /// An empty `modules` list is a no-op: the previous stack is kept intact
    /// and a diagnostic is emitted. There is no partial replacement.
    pub fn replace_stack(
        &mut self,
        modules: &[&dyn ScreenModule],
        style: PushedStyle,
        animated: bool,
    ) {
        if modules.is_empty() {
            report(StackDiagnostic::EmptyModules);
            return;
        }

        let screens: Vec<Box<dyn Screen>> = modules
            .iter()
            .map(|module| resolve(*module, PresentationStyle::Pushed(style)))
            .collect();

        match style {
            PushedStyle::Default => self.commit(screens, animated),
            PushedStyle::Fade => {
                if animated {
                    self.surface.play_transition(Transition::Fade.spec());
                }
                self.commit(screens, false);
            }
            PushedStyle::Slide => {
                if animated {
                    self.surface.play_transition(Transition::Slide.spec());
                }
                self.commit(screens, false);
            }
        }
    }

    /// Pushes the module's screen on top of the stack.
    ///
    /// No named transition is played; `animated` requests the surface's
    /// native push animation.
    pub fn push(&mut self, module: &dyn ScreenModule, animated: bool) {
        let screen = resolve(module, PresentationStyle::Pushed(PushedStyle::Default));
        let mut screens = mem::take(&mut self.screens);
        screens.push(screen);
        self.commit(screens, animated);
    }

    /// Removes every screen whose kind is in `kinds`, then pushes the
    /// module's screen, replacing the stack in one shot.
    ///
    /// Kind matching is exact identifier equality; screens of an unlisted
    /// kind keep their relative order.
    pub fn push_removing(
        &mut self,
        module: &dyn ScreenModule,
        kinds: &[ScreenKind],
        animated: bool,
    ) {
        let screen = resolve(module, PresentationStyle::Pushed(PushedStyle::Default));
        let screens = self.list_removing(kinds, screen);
        self.commit(screens, animated);
    }

    /// Pops every screen above the first (nearest to the root) screen of
    /// `kind`, with the surface's native pop animation.
    ///
    /// If no screen of that kind is on the stack, the stack is left
    /// unchanged and a diagnostic is emitted.
    pub fn pop_to(&mut self, kind: ScreenKind) {
        let Some(index) = self.find_index(kind) else {
            return;
        };
        let mut screens = mem::take(&mut self.screens);
        screens.truncate(index + 1);
        self.commit(screens, true);
    }

    /// Pushes the module's screen under a cross-fade.
    pub fn fade_to(&mut self, module: &dyn ScreenModule) {
        self.transition_to(module, Transition::Fade, PushedStyle::Fade);
    }

    /// Removes every screen whose kind is in `kinds`, pushes the module's
    /// screen, and plays a cross-fade over the one-shot replacement.
    pub fn fade_to_removing(&mut self, module: &dyn ScreenModule, kinds: &[ScreenKind]) {
        let screen = resolve(module, PresentationStyle::Pushed(PushedStyle::Fade));
        let screens = self.list_removing(kinds, screen);
        self.surface.play_transition(Transition::Fade.spec());
        self.commit(screens, false);
    }

    /// Truncates the stack to the slice from the root through the first
    /// screen of `kind` (inclusive), pushes the module's screen, and plays a
    /// cross-fade.
    ///
    /// When no screen of `kind` is on the stack, the truncation is skipped
    /// and the new screen is appended to the untouched full stack: the push
    /// still happens, only the removal degrades.
    pub fn fade_to_removing_till(&mut self, module: &dyn ScreenModule, kind: ScreenKind) {
        let screen = resolve(module, PresentationStyle::Pushed(PushedStyle::Fade));
        let screens = self.list_removing_till(kind, screen);
        self.surface.play_transition(Transition::Fade.spec());
        self.commit(screens, false);
    }

    /// Pops the topmost screen under a reverse cross-fade.
    ///
    /// With only the root on the stack this is a no-op and no transition is
    /// played.
    pub fn unfade(&mut self) {
        self.pop_transitioned(Transition::Unfade);
    }

    /// Pops to the first screen of `kind` under a reverse cross-fade.
    ///
    /// If no screen of that kind is on the stack, nothing is popped and no
    /// transition is played.
    pub fn unfade_to(&mut self, kind: ScreenKind) {
        self.pop_to_transitioned(kind, Transition::Unfade);
    }

    /// Pushes the module's screen, sliding it in from the top edge.
    pub fn slide(&mut self, module: &dyn ScreenModule) {
        self.transition_to(module, Transition::Slide, PushedStyle::Slide);
    }

    /// Pops the topmost screen, revealing the one beneath from the bottom
    /// edge. Same root policy as [`unfade`](NavigationStack::unfade).
    pub fn unslide(&mut self) {
        self.pop_transitioned(Transition::Unslide);
    }

    /// Pops to the first screen of `kind` under the unslide transition.
    /// Same not-found policy as [`unfade_to`](NavigationStack::unfade_to).
    pub fn unslide_to(&mut self, kind: ScreenKind) {
        self.pop_to_transitioned(kind, Transition::Unslide);
    }

    /// Index of the first screen of `kind`, scanning from the root.
    ///
    /// Emits the not-found diagnostic on a miss.
    fn find_index(&self, kind: ScreenKind) -> Option<usize> {
        let index = self.screens.iter().position(|screen| screen.kind() == kind);
        if index.is_none() {
            report(StackDiagnostic::KindNotFound(kind));
        }
        index
    }

    /// Current screens minus the listed kinds, with `adding` appended.
    fn list_removing(
        &mut self,
        kinds: &[ScreenKind],
        adding: Box<dyn Screen>,
    ) -> Vec<Box<dyn Screen>> {
        let removing: FxHashSet<ScreenKind> = kinds.iter().copied().collect();
        let mut screens: Vec<Box<dyn Screen>> = mem::take(&mut self.screens)
            .into_iter()
            .filter(|screen| !removing.contains(&screen.kind()))
            .collect();
        screens.push(adding);
        screens
    }

    /// Current screens truncated through the first screen of `kind`
    /// (inclusive), with `adding` appended; the untouched full stack plus
    /// `adding` when the kind is absent.
    fn list_removing_till(
        &mut self,
        kind: ScreenKind,
        adding: Box<dyn Screen>,
    ) -> Vec<Box<dyn Screen>> {
        let index = self.find_index(kind);
        let mut screens = mem::take(&mut self.screens);
        if let Some(index) = index {
            // Unreachable while the stack is exclusively owned; the index
            // was just computed against these same screens.
            if index >= screens.len() {
                report(StackDiagnostic::SliceOutOfBounds {
                    index,
                    depth: screens.len(),
                });
                return screens;
            }
            screens.truncate(index + 1);
        }
        screens.push(adding);
        screens
    }

    fn transition_to(
        &mut self,
        module: &dyn ScreenModule,
        transition: Transition,
        style: PushedStyle,
    ) {
        let screen = resolve(module, PresentationStyle::Pushed(style));
        self.surface.play_transition(transition.spec());
        let mut screens = mem::take(&mut self.screens);
        screens.push(screen);
        self.commit(screens, false);
    }

    fn pop_transitioned(&mut self, transition: Transition) {
        if self.screens.len() <= 1 {
            report(StackDiagnostic::PopAtRoot);
            return;
        }
        self.surface.play_transition(transition.spec());
        let mut screens = mem::take(&mut self.screens);
        screens.pop();
        self.commit(screens, false);
    }

    fn pop_to_transitioned(&mut self, kind: ScreenKind, transition: Transition) {
        let Some(index) = self.find_index(kind) else {
            return;
        };
        self.surface.play_transition(transition.spec());
        let mut screens = mem::take(&mut self.screens);
        screens.truncate(index + 1);
        self.commit(screens, false);
    }

    /// The single authoritative mutation point.
    ///
    /// Swaps in the new screen list and notifies the surface. Every public
    /// operation ends here, so the stack's invariants are enforced in one
    /// place.
    fn commit(&mut self, screens: Vec<Box<dyn Screen>>, animated: bool) {
        #[cfg(debug_assertions)]
        {
            let mut seen = FxHashSet::default();
            debug_assert!(
                screens.iter().all(|screen| seen.insert(screen.id())),
                "duplicate screen handle committed to the navigation stack"
            );
        }
        self.screens = screens;
        debug!(depth = self.screens.len(), animated, "stack committed");
        self.surface.stack_committed(&self.screens, animated);
    }
}

fn resolve(module: &dyn ScreenModule, style: PresentationStyle) -> Box<dyn Screen> {
    let mut screen = module.resolve();
    screen.set_presentation(style);
    screen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{Id, ID_FEEDER};

    const ROOT: ScreenKind = ScreenKind::new("root");
    const LIST: ScreenKind = ScreenKind::new("list");
    const DETAIL: ScreenKind = ScreenKind::new("detail");
    const EDIT: ScreenKind = ScreenKind::new("edit");

    struct TestScreen {
        id: Id,
        kind: ScreenKind,
        presentation: PresentationStyle,
    }

    impl Screen for TestScreen {
        fn id(&self) -> Id {
            self.id
        }

        fn kind(&self) -> ScreenKind {
            self.kind
        }

        fn presentation(&self) -> PresentationStyle {
            self.presentation
        }

        fn set_presentation(&mut self, style: PresentationStyle) {
            self.presentation = style;
        }
    }

    struct TestModule {
        kind: ScreenKind,
    }

    impl TestModule {
        fn new(kind: ScreenKind) -> TestModule {
            TestModule { kind }
        }
    }

    impl ScreenModule for TestModule {
        fn resolve(&self) -> Box<dyn Screen> {
            Box::new(TestScreen {
                id: ID_FEEDER.next(),
                kind: self.kind,
                presentation: PresentationStyle::None,
            })
        }
    }

    #[derive(Default)]
    struct RecordingSurface {
        transitions: Vec<TransitionSpec>,
        commits: Vec<(Vec<ScreenKind>, bool)>,
    }

    impl NavigationSurface for RecordingSurface {
        fn play_transition(&mut self, spec: TransitionSpec) {
            self.transitions.push(spec);
        }

        fn stack_committed(&mut self, screens: &[Box<dyn Screen>], animated: bool) {
            let kinds = screens.iter().map(|screen| screen.kind()).collect();
            self.commits.push((kinds, animated));
        }
    }

    fn stack_of(kinds: &[ScreenKind]) -> NavigationStack<RecordingSurface> {
        let mut stack = NavigationStack::new(RecordingSurface::default());
        let modules: Vec<TestModule> = kinds.iter().copied().map(TestModule::new).collect();
        let refs: Vec<&dyn ScreenModule> =
            modules.iter().map(|module| module as &dyn ScreenModule).collect();
        stack.replace_stack(&refs, PushedStyle::Default, false);
        stack
    }

    fn kinds(stack: &NavigationStack<RecordingSurface>) -> Vec<ScreenKind> {
        stack.screens().iter().map(|screen| screen.kind()).collect()
    }

    fn ids(stack: &NavigationStack<RecordingSurface>) -> Vec<Id> {
        stack.screens().iter().map(|screen| screen.id()).collect()
    }

    #[test]
    fn replace_stack_matches_module_order() {
        let stack = stack_of(&[ROOT, LIST, DETAIL]);
        assert_eq!(kinds(&stack), vec![ROOT, LIST, DETAIL]);
        assert_eq!(stack.depth(), 3);
    }

    #[test]
    fn replace_stack_tags_screens_with_the_requested_style() {
        let mut stack = NavigationStack::new(RecordingSurface::default());
        let module = TestModule::new(ROOT);
        stack.replace_stack(&[&module], PushedStyle::Slide, false);
        assert_eq!(
            stack.top().unwrap().presentation(),
            PresentationStyle::Pushed(PushedStyle::Slide)
        );
    }

    #[test]
    fn replace_stack_with_empty_list_keeps_the_previous_stack() {
        let mut stack = stack_of(&[ROOT, LIST]);
        stack.replace_stack(&[], PushedStyle::Default, false);
        assert_eq!(kinds(&stack), vec![ROOT, LIST]);
        // Only the seeding commit reached the surface.
        assert_eq!(stack.surface().commits.len(), 1);
    }

    #[test]
    fn replace_stack_fade_plays_the_transition_only_when_animated() {
        let mut stack = stack_of(&[ROOT]);
        let module = TestModule::new(LIST);

        stack.replace_stack(&[&module], PushedStyle::Fade, false);
        assert!(stack.surface().transitions.is_empty());

        stack.replace_stack(&[&module], PushedStyle::Fade, true);
        assert_eq!(stack.surface().transitions, vec![Transition::Fade.spec()]);
        // A named transition replaces the native animation.
        let (_, animated) = stack.surface().commits.last().unwrap();
        assert!(!animated);
    }

    #[test]
    fn push_appends_on_top_and_forwards_the_animate_flag() {
        let mut stack = stack_of(&[ROOT]);
        stack.push(&TestModule::new(LIST), true);
        assert_eq!(kinds(&stack), vec![ROOT, LIST]);
        assert!(stack.surface().transitions.is_empty());
        let (committed, animated) = stack.surface().commits.last().unwrap();
        assert_eq!(committed, &vec![ROOT, LIST]);
        assert!(*animated);
    }

    #[test]
    fn push_removing_drops_every_matching_kind_and_lands_on_top() {
        let mut stack = stack_of(&[ROOT, LIST, DETAIL, LIST]);
        stack.push_removing(&TestModule::new(EDIT), &[LIST, DETAIL], false);
        assert_eq!(kinds(&stack), vec![ROOT, EDIT]);
        assert_eq!(stack.top().unwrap().kind(), EDIT);
    }

    #[test]
    fn push_removing_without_matches_only_appends() {
        let mut stack = stack_of(&[ROOT, LIST]);
        stack.push_removing(&TestModule::new(EDIT), &[DETAIL], false);
        assert_eq!(kinds(&stack), vec![ROOT, LIST, EDIT]);
    }

    #[test]
    fn pop_to_truncates_above_the_target() {
        let mut stack = stack_of(&[ROOT, LIST, DETAIL]);
        stack.pop_to(LIST);
        assert_eq!(kinds(&stack), vec![ROOT, LIST]);
        let (_, animated) = stack.surface().commits.last().unwrap();
        assert!(*animated, "pop_to uses the native pop animation");
    }

    #[test]
    fn pop_to_root_leaves_only_the_root() {
        let mut stack = stack_of(&[ROOT, LIST]);
        stack.pop_to(ROOT);
        assert_eq!(kinds(&stack), vec![ROOT]);
    }

    #[test]
    fn pop_to_missing_kind_is_a_noop() {
        let mut stack = stack_of(&[ROOT, LIST]);
        stack.pop_to(DETAIL);
        assert_eq!(kinds(&stack), vec![ROOT, LIST]);
        assert_eq!(stack.surface().commits.len(), 1);
    }

    #[test]
    fn first_match_from_the_root_wins() {
        let mut stack = stack_of(&[ROOT, LIST, DETAIL, LIST]);
        stack.pop_to(LIST);
        assert_eq!(kinds(&stack), vec![ROOT, LIST]);
    }

    #[test]
    fn fade_to_pushes_a_fade_tagged_screen_under_a_cross_fade() {
        let mut stack = stack_of(&[ROOT]);
        stack.fade_to(&TestModule::new(LIST));
        assert_eq!(kinds(&stack), vec![ROOT, LIST]);
        assert_eq!(
            stack.top().unwrap().presentation(),
            PresentationStyle::Pushed(PushedStyle::Fade)
        );
        assert_eq!(stack.surface().transitions, vec![Transition::Fade.spec()]);
        let (_, animated) = stack.surface().commits.last().unwrap();
        assert!(!animated);
    }

    #[test]
    fn fade_to_removing_replaces_in_one_shot() {
        let mut stack = stack_of(&[ROOT, LIST, DETAIL]);
        stack.fade_to_removing(&TestModule::new(EDIT), &[DETAIL]);
        assert_eq!(kinds(&stack), vec![ROOT, LIST, EDIT]);
        assert_eq!(stack.surface().transitions, vec![Transition::Fade.spec()]);
    }

    #[test]
    fn fade_to_removing_till_keeps_the_slice_through_the_target() {
        let mut stack = stack_of(&[ROOT, LIST, DETAIL]);
        stack.fade_to_removing_till(&TestModule::new(EDIT), LIST);
        assert_eq!(kinds(&stack), vec![ROOT, LIST, EDIT]);
    }

    #[test]
    fn fade_to_removing_till_missing_kind_appends_to_the_full_stack() {
        let mut stack = stack_of(&[ROOT, LIST, DETAIL]);
        stack.fade_to_removing_till(&TestModule::new(EDIT), ScreenKind::new("absent"));
        assert_eq!(kinds(&stack), vec![ROOT, LIST, DETAIL, EDIT]);
    }

    #[test]
    fn unfade_restores_the_stack_fade_to_left() {
        let mut stack = stack_of(&[ROOT, LIST]);
        let before = ids(&stack);
        stack.fade_to(&TestModule::new(DETAIL));
        stack.unfade();
        assert_eq!(ids(&stack), before);
        assert_eq!(
            stack.surface().transitions,
            vec![Transition::Fade.spec(), Transition::Unfade.spec()]
        );
    }

    #[test]
    fn unfade_at_the_root_is_a_noop_without_a_transition() {
        let mut stack = stack_of(&[ROOT]);
        stack.unfade();
        assert_eq!(kinds(&stack), vec![ROOT]);
        assert!(stack.surface().transitions.is_empty());
    }

    #[test]
    fn unfade_to_pops_to_the_target_kind() {
        let mut stack = stack_of(&[ROOT, LIST, DETAIL, EDIT]);
        stack.unfade_to(LIST);
        assert_eq!(kinds(&stack), vec![ROOT, LIST]);
        assert_eq!(stack.surface().transitions, vec![Transition::Unfade.spec()]);
    }

    #[test]
    fn unfade_to_missing_kind_plays_nothing() {
        let mut stack = stack_of(&[ROOT, LIST]);
        stack.unfade_to(DETAIL);
        assert_eq!(kinds(&stack), vec![ROOT, LIST]);
        assert!(stack.surface().transitions.is_empty());
    }

    #[test]
    fn slide_pushes_a_slide_tagged_screen() {
        let mut stack = stack_of(&[ROOT]);
        stack.slide(&TestModule::new(LIST));
        assert_eq!(kinds(&stack), vec![ROOT, LIST]);
        assert_eq!(
            stack.top().unwrap().presentation(),
            PresentationStyle::Pushed(PushedStyle::Slide)
        );
        assert_eq!(stack.surface().transitions, vec![Transition::Slide.spec()]);
    }

    #[test]
    fn unslide_pops_under_the_reveal_transition() {
        let mut stack = stack_of(&[ROOT, LIST]);
        stack.unslide();
        assert_eq!(kinds(&stack), vec![ROOT]);
        assert_eq!(stack.surface().transitions, vec![Transition::Unslide.spec()]);
    }

    #[test]
    fn unslide_to_pops_to_the_target_kind() {
        let mut stack = stack_of(&[ROOT, LIST, DETAIL]);
        stack.unslide_to(ROOT);
        assert_eq!(kinds(&stack), vec![ROOT]);
        assert_eq!(stack.surface().transitions, vec![Transition::Unslide.spec()]);
    }

    #[test]
    fn screens_of_the_same_kind_keep_distinct_identities() {
        let stack = stack_of(&[LIST, LIST]);
        let ids = ids(&stack);
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
    }
}
