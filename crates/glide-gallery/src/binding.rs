#![forbid(unsafe_code)]

//! Wiring a [`GalleryNavigator`] to a router surface.

use std::cell::RefCell;
use std::rc::Rc;

use glide_core::event::TargetId;
use glide_core::router::{GestureRouter, SubscriptionId, SwipeFilter};
use glide_core::semantic_event::SwipeDirection;
use glide_core::swipe::SettingsError;
use tracing::{debug, warn};

use crate::navigator::GalleryNavigator;

/// Galleries page on shorter swipes than the pipeline default.
pub const GALLERY_SWIPE_THRESHOLD: f64 = 0.2;

/// Subscriptions created by [`bind_swipe_navigation`].
#[derive(Debug)]
#[must_use = "dropping the binding without `unbind` leaves the handlers subscribed"]
pub struct SwipeNavigation {
    surface: TargetId,
    left: SubscriptionId,
    right: SubscriptionId,
}

impl SwipeNavigation {
    #[must_use]
    pub fn surface(&self) -> TargetId {
        self.surface
    }

    /// Release both subscriptions. Returns false if either was already gone.
    pub fn unbind(self, router: &mut GestureRouter) -> bool {
        let left = router.unsubscribe(self.left);
        let right = router.unsubscribe(self.right);
        debug!(surface = self.surface.0, "gallery swipe navigation unbound");
        left && right
    }
}

/// Lower the router's swipe threshold to [`GALLERY_SWIPE_THRESHOLD`] and page
/// `navigator` on left/right swipes over `surface`.
///
/// The threshold is router-wide: other surfaces on the same router classify
/// with it too.
pub fn bind_swipe_navigation<T: 'static>(
    router: &mut GestureRouter,
    surface: TargetId,
    navigator: Rc<RefCell<GalleryNavigator<T>>>,
) -> Result<SwipeNavigation, SettingsError> {
    let settings = router.swipe_settings().with_threshold(GALLERY_SWIPE_THRESHOLD);
    router.set_swipe_settings(settings)?;

    let next = Rc::clone(&navigator);
    let left = router.on_swipe(surface, SwipeFilter::Only(SwipeDirection::Left), move |_| {
        step(&next, GalleryNavigator::on_swipe_left);
    });
    let previous = navigator;
    let right = router.on_swipe(surface, SwipeFilter::Only(SwipeDirection::Right), move |_| {
        step(&previous, GalleryNavigator::on_swipe_right);
    });
    debug!(surface = surface.0, "gallery swipe navigation bound");

    Ok(SwipeNavigation {
        surface,
        left,
        right,
    })
}

fn step<T>(
    navigator: &RefCell<GalleryNavigator<T>>,
    action: fn(&mut GalleryNavigator<T>) -> Option<usize>,
) {
    match navigator.try_borrow_mut() {
        Ok(mut nav) => {
            action(&mut *nav);
        }
        Err(_) => warn!("gallery busy, swipe dropped"),
    }
}
