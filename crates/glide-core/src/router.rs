#![forbid(unsafe_code)]

//! Observer registration and dispatch of gesture and swipe signals.
//!
//! [`GestureRouter`] wraps an [`InputHub`] and delivers its signals to handlers
//! registered on host elements. Signals bubble from the gesture target up
//! the [`TargetTree`], target first.
//!
//! # Design
//!
//! Swipe handlers are grouped per surface. The first handler on a surface
//! creates the surface binding, later ones only bump its reference count, and
//! the binding is dropped when the last handler unsubscribes. Classification
//! runs once per bound surface per completed gesture, however many handlers
//! listen there.
//!
//! ## Invariants
//! 1. A gesture is tracked only if some target on its bubble path has a
//!    subscription when it starts.
//! 2. At most one [`SwipeEvent`] is produced per surface per gesture.
//! 3. Handlers on one target run in registration order.
//!
//! ## Failure Modes
//! - Unsubscribing an unknown id is a no-op returning `false`.
//! - A surface the host no longer knows (`size` is `None`) is skipped.

use std::collections::HashMap;

use crate::config::GestureConfig;
use crate::event::{InputEvent, TargetId};
use crate::frame_scheduler::FrameTiming;
use crate::input_hub::{GestureSink, InputHub, InputResponse, StartDecision};
use crate::pointer_tracker::PointerTracker;
use crate::semantic_event::{GestureEvent, GestureKinds, SwipeDirection, SwipeEvent};
use crate::swipe::{SettingsError, SwipeClassifier, SwipeSettings};
use crate::target_tree::{TargetTree, bubble_path};
use tracing::{debug, debug_span, trace};

// ---------------------------------------------------------------------------
// Subscriptions
// ---------------------------------------------------------------------------

/// Handle returned by registration; pass it to [`GestureRouter::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Which swipe directions a handler wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwipeFilter {
    #[default]
    Any,
    Only(SwipeDirection),
}

impl SwipeFilter {
    #[must_use]
    pub fn matches(self, direction: SwipeDirection) -> bool {
        match self {
            Self::Any => true,
            Self::Only(wanted) => wanted == direction,
        }
    }
}

type GestureHandler = Box<dyn FnMut(&GestureEvent)>;
type SwipeHandler = Box<dyn FnMut(&SwipeEvent)>;

struct GestureListener {
    id: SubscriptionId,
    target: TargetId,
    kinds: GestureKinds,
    handler: GestureHandler,
}

struct SwipeListener {
    id: SubscriptionId,
    surface: TargetId,
    filter: SwipeFilter,
    handler: SwipeHandler,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    gestures: Vec<GestureListener>,
    swipes: Vec<SwipeListener>,
    /// Per-surface reference count of swipe handlers.
    bindings: HashMap<TargetId, usize>,
}

impl Registry {
    fn allocate(&mut self) -> SubscriptionId {
        self.next_id += 1;
        SubscriptionId(self.next_id)
    }

    fn is_interested(&self, target: TargetId) -> bool {
        self.bindings.contains_key(&target) || self.gestures.iter().any(|l| l.target == target)
    }

    fn deliver_gesture(&mut self, path: &[TargetId], event: &GestureEvent) {
        let phase = event.phase();
        for target in path {
            for listener in self
                .gestures
                .iter_mut()
                .filter(|l| l.target == *target && l.kinds.contains_phase(phase))
            {
                (listener.handler)(event);
            }
        }
    }

    fn deliver_swipe(&mut self, swipe: &SwipeEvent) {
        for listener in self
            .swipes
            .iter_mut()
            .filter(|l| l.surface == swipe.surface && l.filter.matches(swipe.direction))
        {
            (listener.handler)(swipe);
        }
    }

    fn bind(&mut self, surface: TargetId) {
        let count = self.bindings.entry(surface).or_insert(0);
        *count += 1;
        if *count == 1 {
            debug!(surface = surface.0, "swipe binding set up");
        }
    }

    fn unbind(&mut self, surface: TargetId) {
        if let Some(count) = self.bindings.get_mut(&surface) {
            *count -= 1;
            if *count == 0 {
                self.bindings.remove(&surface);
                debug!(surface = surface.0, "swipe binding torn down");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

struct Dispatch<'a> {
    registry: &'a mut Registry,
    classifier: &'a SwipeClassifier,
    tree: &'a dyn TargetTree,
}

impl Dispatch<'_> {
    fn classify_end(&mut self, path: &[TargetId], event: &GestureEvent) {
        let sample = event.sample();
        let _span = debug_span!("swipe", target = sample.target.0).entered();
        for surface in path {
            if !self.registry.bindings.contains_key(surface) {
                continue;
            }
            let Some(size) = self.tree.size(*surface) else {
                trace!(surface = surface.0, "bound surface has no size, skipped");
                continue;
            };
            if let Some(swipe) = self.classifier.classify(sample, *surface, size) {
                self.registry.deliver_swipe(&swipe);
            }
        }
    }
}

impl GestureSink for Dispatch<'_> {
    fn on_start(&mut self, event: &GestureEvent) -> StartDecision {
        let path = bubble_path(self.tree, event.target());
        if !path.iter().any(|t| self.registry.is_interested(*t)) {
            return StartDecision::Ignore;
        }
        self.registry.deliver_gesture(&path, event);
        StartDecision::Track
    }

    fn on_signal(&mut self, event: &GestureEvent) {
        let path = bubble_path(self.tree, event.target());
        self.registry.deliver_gesture(&path, event);
        if matches!(event, GestureEvent::End(_)) {
            self.classify_end(&path, event);
        }
    }
}

// ---------------------------------------------------------------------------
// GestureRouter
// ---------------------------------------------------------------------------

/// Input hub plus handler registry: the entry point hosts talk to.
pub struct GestureRouter {
    hub: InputHub,
    classifier: SwipeClassifier,
    registry: Registry,
}

impl core::fmt::Debug for GestureRouter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GestureRouter")
            .field("hub", &self.hub)
            .field("classifier", &self.classifier)
            .field("gesture_handlers", &self.registry.gestures.len())
            .field("swipe_handlers", &self.registry.swipes.len())
            .finish()
    }
}

impl Default for GestureRouter {
    fn default() -> Self {
        Self::new(&GestureConfig::default())
    }
}

impl GestureRouter {
    /// Build a router from validated configuration.
    #[must_use]
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            hub: InputHub::new(PointerTracker::new(config.move_threshold), config.frame_timing),
            classifier: SwipeClassifier::new(config.swipe),
            registry: Registry::default(),
        }
    }

    #[must_use]
    pub fn hub(&self) -> &InputHub {
        &self.hub
    }

    #[must_use]
    pub fn frame_timing(&self) -> FrameTiming {
        self.hub.timing()
    }

    #[must_use]
    pub fn swipe_settings(&self) -> &SwipeSettings {
        self.classifier.settings()
    }

    /// Replace the swipe settings. Invalid settings leave the current ones.
    pub fn set_swipe_settings(&mut self, settings: SwipeSettings) -> Result<(), SettingsError> {
        self.classifier.set_settings(settings)?;
        debug!(
            threshold = settings.threshold,
            sensitivity = settings.sensitivity,
            "swipe settings updated"
        );
        Ok(())
    }

    /// Receive gesture signals of the given phases bubbling through `target`.
    pub fn on_gesture(
        &mut self,
        target: TargetId,
        kinds: GestureKinds,
        handler: impl FnMut(&GestureEvent) + 'static,
    ) -> SubscriptionId {
        let id = self.registry.allocate();
        self.registry.gestures.push(GestureListener {
            id,
            target,
            kinds,
            handler: Box::new(handler),
        });
        trace!(target = target.0, ?kinds, "gesture handler added");
        id
    }

    /// Receive swipes classified against `surface`.
    pub fn on_swipe(
        &mut self,
        surface: TargetId,
        filter: SwipeFilter,
        handler: impl FnMut(&SwipeEvent) + 'static,
    ) -> SubscriptionId {
        let id = self.registry.allocate();
        self.registry.bind(surface);
        self.registry.swipes.push(SwipeListener {
            id,
            surface,
            filter,
            handler: Box::new(handler),
        });
        id
    }

    /// Remove a handler. Returns false if `id` is unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        if let Some(pos) = self.registry.gestures.iter().position(|l| l.id == id) {
            self.registry.gestures.remove(pos);
            return true;
        }
        if let Some(pos) = self.registry.swipes.iter().position(|l| l.id == id) {
            let listener = self.registry.swipes.remove(pos);
            self.registry.unbind(listener.surface);
            return true;
        }
        trace!(?id, "unsubscribe of unknown id");
        false
    }

    /// Number of swipe handlers on `surface`; zero means unbound.
    #[must_use]
    pub fn binding_count(&self, surface: TargetId) -> usize {
        self.registry.bindings.get(&surface).copied().unwrap_or(0)
    }

    /// Route one raw input event.
    pub fn handle_input(&mut self, event: &InputEvent, tree: &dyn TargetTree) -> InputResponse {
        let mut dispatch = Dispatch {
            registry: &mut self.registry,
            classifier: &self.classifier,
            tree,
        };
        self.hub.handle_input(event, &mut dispatch)
    }

    /// Animation-frame tick.
    pub fn on_frame(&mut self, now_ms: f64, tree: &dyn TargetTree) -> InputResponse {
        let mut dispatch = Dispatch {
            registry: &mut self.registry,
            classifier: &self.classifier,
            tree,
        };
        self.hub.on_frame(now_ms, &mut dispatch)
    }

    /// Timer tick for [`FrameTiming::Timer`] hosts.
    pub fn poll_timer(&mut self, now_ms: f64, tree: &dyn TargetTree) -> InputResponse {
        let mut dispatch = Dispatch {
            registry: &mut self.registry,
            classifier: &self.classifier,
            tree,
        };
        self.hub.poll_timer(now_ms, &mut dispatch)
    }

    /// End every live gesture.
    pub fn cancel_all(&mut self, tree: &dyn TargetTree) -> InputResponse {
        let mut dispatch = Dispatch {
            registry: &mut self.registry,
            classifier: &self.classifier,
            tree,
        };
        self.hub.cancel_all(&mut dispatch)
    }

    #[must_use]
    pub fn needs_frame(&self) -> bool {
        self.hub.needs_frame()
    }
}
