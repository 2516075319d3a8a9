//! Damage accumulated between host repaints.

use crate::util::Rect;

#[derive(Debug, Default)]
enum Damage {
    #[default]
    None,
    Regions(Vec<Rect>),
    /// The whole surface; individual rectangles are not kept
    Full,
}

/// Collects the areas of the surface a host must repaint.
#[derive(Debug, Default)]
pub struct DirtyTracker {
    damage: Damage,
}

impl DirtyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores, clears and resizes damage everything.
    pub fn mark_full(&mut self) {
        self.damage = Damage::Full;
    }

    /// Ignored for degenerate rectangles or once the surface is fully damaged.
    pub fn mark_rect(&mut self, rect: Rect) {
        if !rect.is_valid() {
            return;
        }
        match &mut self.damage {
            Damage::Full => {}
            Damage::Regions(regions) => regions.push(rect),
            Damage::None => self.damage = Damage::Regions(vec![rect]),
        }
    }

    pub fn mark_optional_rect(&mut self, rect: Option<Rect>) {
        if let Some(rect) = rect {
            self.mark_rect(rect);
        }
    }

    /// Drains the damage. Full damage comes back as one `width` x `height`
    /// rectangle, or nothing for an unmounted (zero-sized) surface.
    pub fn take_regions(&mut self, width: i32, height: i32) -> Vec<Rect> {
        match std::mem::take(&mut self.damage) {
            Damage::None => Vec::new(),
            Damage::Regions(regions) => regions,
            Damage::Full => {
                if width <= 0 || height <= 0 {
                    return Vec::new();
                }
                Rect::new(0, 0, width, height).into_iter().collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regions_drain_in_order() {
        let mut tracker = DirtyTracker::new();
        let a = Rect::new(0, 0, 4, 4).unwrap();
        let b = Rect::new(10, 10, 2, 6).unwrap();
        tracker.mark_rect(a);
        tracker.mark_optional_rect(None);
        tracker.mark_optional_rect(Some(b));

        assert_eq!(tracker.take_regions(100, 100), vec![a, b]);
        assert!(tracker.take_regions(100, 100).is_empty());
    }

    #[test]
    fn full_damage_swallows_rectangles() {
        let mut tracker = DirtyTracker::new();
        tracker.mark_rect(Rect::new(5, 5, 10, 10).unwrap());
        tracker.mark_full();
        tracker.mark_rect(Rect::new(30, 30, 8, 8).unwrap());

        assert_eq!(
            tracker.take_regions(200, 100),
            vec![Rect::new(0, 0, 200, 100).unwrap()]
        );
    }

    #[test]
    fn full_damage_on_empty_surface_yields_nothing() {
        let mut tracker = DirtyTracker::new();
        tracker.mark_full();
        assert!(tracker.take_regions(0, 0).is_empty());
    }
}
