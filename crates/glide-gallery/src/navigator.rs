#![forbid(unsafe_code)]

//! Clamped index navigation over gallery items.
//!
//! ## Invariants
//! 1. The current index, when set, is always in `[0, len - 1]`.
//! 2. An empty gallery never has a current item.

use tracing::debug;

/// Position within a list of media items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryNavigator<T> {
    items: Vec<T>,
    current: Option<usize>,
}

impl<T> Default for GalleryNavigator<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> GalleryNavigator<T> {
    /// A gallery with nothing shown yet.
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            current: None,
        }
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    #[must_use]
    pub fn current(&self) -> Option<&T> {
        self.current.and_then(|i| self.items.get(i))
    }

    /// Show the item at `index`, clamped to the valid range.
    ///
    /// No-op on an empty gallery. Returns the resulting index.
    pub fn move_to(&mut self, index: isize) -> Option<usize> {
        let last = self.items.len().checked_sub(1)?;
        let clamped = usize::try_from(index.max(0)).map_or(last, |i| i.min(last));
        if self.current != Some(clamped) {
            debug!(from = ?self.current, to = clamped, "gallery position changed");
        }
        self.current = Some(clamped);
        self.current
    }

    /// Step forward. With no current item this shows the first one.
    pub fn move_next(&mut self) -> Option<usize> {
        self.move_to(self.position().saturating_add(1))
    }

    /// Step back. With no current item this shows the first one.
    pub fn move_previous(&mut self) -> Option<usize> {
        self.move_to(self.position().saturating_sub(1))
    }

    /// Swiping left reveals what lies to the right.
    pub fn on_swipe_left(&mut self) -> Option<usize> {
        self.move_next()
    }

    pub fn on_swipe_right(&mut self) -> Option<usize> {
        self.move_previous()
    }

    /// Current index as a signed step origin; -1 when nothing is shown.
    fn position(&self) -> isize {
        self.current
            .and_then(|i| isize::try_from(i).ok())
            .unwrap_or(-1)
    }
}
