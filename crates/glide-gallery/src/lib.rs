#![forbid(unsafe_code)]

//! Gallery navigation on top of glide swipes.
//!
//! [`GalleryNavigator`] keeps the current position in a list of media items;
//! [`bind_swipe_navigation`] wires a router surface so a left swipe shows the
//! next item and a right swipe the previous one.

pub mod binding;
pub mod navigator;

pub use binding::{GALLERY_SWIPE_THRESHOLD, SwipeNavigation, bind_swipe_navigation};
pub use navigator::GalleryNavigator;
