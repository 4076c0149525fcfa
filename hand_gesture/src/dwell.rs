//! Optional minimum-dwell filter over the per-tick gesture stream.
//!
//! A gesture is passed through only once it has been seen for `min_ticks`
//! consecutive ticks; until then the filter reports [`Gesture::Neutral`].
//! `min_ticks` of 0 or 1 passes every gesture through unchanged.

use crate::classifier::Gesture;

#[derive(Clone, Debug)]
pub struct DwellFilter {
    min_ticks: u32,
    candidate: Gesture,
    seen:      u32,
}

impl DwellFilter {
    pub fn new(min_ticks: u32) -> Self {
        DwellFilter { min_ticks, candidate: Gesture::Neutral, seen: 0 }
    }

    pub fn min_ticks(&self) -> u32 { self.min_ticks }

    /// Feed this tick's raw gesture; returns the gesture to act on.
    pub fn filter(&mut self, gesture: Gesture) -> Gesture {
        if gesture == self.candidate {
            self.seen = self.seen.saturating_add(1);
        } else {
            self.candidate = gesture;
            self.seen = 1;
        }
        if self.seen >= self.min_ticks { gesture } else { Gesture::Neutral }
    }
}

impl Default for DwellFilter {
    fn default() -> Self { DwellFilter::new(0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_dwell_passes_through() {
        let mut f = DwellFilter::default();
        for g in [Gesture::Open, Gesture::Left, Gesture::Right, Gesture::Neutral] {
            assert_eq!(f.filter(g), g);
        }
    }

    #[test]
    fn gesture_released_after_dwell() {
        let mut f = DwellFilter::new(3);
        assert_eq!(f.filter(Gesture::Left), Gesture::Neutral);
        assert_eq!(f.filter(Gesture::Left), Gesture::Neutral);
        assert_eq!(f.filter(Gesture::Left), Gesture::Left);
        assert_eq!(f.filter(Gesture::Left), Gesture::Left);
    }

    #[test]
    fn flicker_resets_count() {
        let mut f = DwellFilter::new(2);
        assert_eq!(f.filter(Gesture::Open),  Gesture::Neutral);
        assert_eq!(f.filter(Gesture::Right), Gesture::Neutral);
        assert_eq!(f.filter(Gesture::Open),  Gesture::Neutral);
        assert_eq!(f.filter(Gesture::Open),  Gesture::Open);
    }
}
