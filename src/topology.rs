//! Physical string layout and the pattern operations that depend on it
//!
//! A device has one or more LED strings wired in sequence. With exactly two
//! strings the free ends can be arranged to meet, so "circular" operations
//! reverse the first string: logical index 0 sits at the far end of string
//! one, runs into the middle where the strings meet and continues out along
//! string two. Shift and rotate then behave as on a single ring.

use alloc::vec::Vec;

use heapless::Vec as FixedVec;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::color::Color;
use crate::error::{EffectError, EffectResult};
use crate::frame::Frame;
use crate::palette::Palette;
use crate::random::Arrivals;

/// Maximum number of strings a device may report
pub const MAX_STRINGS: usize = 8;

/// Pixel count and string wiring of a device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    num_leds: usize,
    strings: FixedVec<usize, MAX_STRINGS>,
}

impl Topology {
    /// Single string of `num_leds` pixels
    pub fn single(num_leds: usize) -> Self {
        let mut strings = FixedVec::new();
        // Capacity is at least one
        let _ = strings.push(num_leds);
        Self { num_leds, strings }
    }

    /// Strings with the given lengths, wired in order
    pub fn with_strings(lengths: &[usize]) -> EffectResult<Self> {
        let invalid = EffectError::InvalidStrings {
            count: lengths.len(),
        };
        if lengths.is_empty() {
            return Err(invalid);
        }
        let strings = FixedVec::from_slice(lengths).map_err(|()| invalid)?;
        Ok(Self {
            num_leds: lengths.iter().sum(),
            strings,
        })
    }

    pub const fn num_leds(&self) -> usize {
        self.num_leds
    }

    pub fn strings(&self) -> &[usize] {
        &self.strings
    }

    /// Map a logical ring index to a physical pixel index
    ///
    /// The mapping is its own inverse.
    pub fn circular_index(&self, index: usize) -> usize {
        match self.strings.as_slice() {
            [first, _] if index < *first => first - 1 - index,
            _ => index,
        }
    }

    /// Solid frame
    pub fn make_solid(&self, color: Color) -> Frame {
        Frame::solid(self.num_leds, color)
    }

    /// Frame built by calling `func` for every logical index
    pub fn make_from_fn<F>(&self, mut func: F, circular: bool) -> Frame
    where
        F: FnMut(usize) -> Color,
    {
        let mut frame = self.make_solid(Color::BLACK);
        for i in 0..self.num_leds {
            frame[self.remap(i, circular)] = func(i);
        }
        frame
    }

    /// Change a single pixel in place
    pub fn modify(&self, frame: &mut Frame, index: usize, color: Color, circular: bool) {
        if let Some(pixel) = frame.get_mut(self.remap(index, circular)) {
            *pixel = color;
        }
    }

    /// Independent copy of a frame
    pub fn copy(&self, frame: &Frame) -> Frame {
        frame.clone()
    }

    /// Move content `steps` positions toward higher indices
    ///
    /// Negative steps move toward lower indices. Vacated pixels get `pad`.
    pub fn shift(&self, frame: &Frame, steps: isize, pad: Color, circular: bool) -> Frame {
        let ring = self.to_ring(frame, circular);
        let len = ring.len();
        let amount = steps.unsigned_abs().min(len);
        let mut shifted = Vec::with_capacity(len);
        if steps >= 0 {
            shifted.extend(core::iter::repeat_n(pad, amount));
            shifted.extend_from_slice(&ring[..len - amount]);
        } else {
            shifted.extend_from_slice(&ring[amount..]);
            shifted.extend(core::iter::repeat_n(pad, amount));
        }
        self.from_ring(&shifted, circular)
    }

    /// Like [`Topology::shift`], but pixels leaving one end enter at the other
    pub fn rotate(&self, frame: &Frame, steps: isize, circular: bool) -> Frame {
        let mut ring = self.to_ring(frame, circular);
        if ring.is_empty() {
            return frame.clone();
        }
        let amount = steps.unsigned_abs() % ring.len();
        if steps >= 0 {
            ring.rotate_right(amount);
        } else {
            ring.rotate_left(amount);
        }
        self.from_ring(&ring, circular)
    }

    /// New pixel `i` takes the color of old pixel `perm[i]`
    pub fn permute(&self, frame: &Frame, perm: &[usize], circular: bool) -> Frame {
        let ring = self.to_ring(frame, circular);
        let permuted: Vec<Color> = (0..ring.len())
            .map(|i| {
                perm.get(i)
                    .and_then(|&source| ring.get(source))
                    .copied()
                    .unwrap_or(Color::BLACK)
            })
            .collect();
        self.from_ring(&permuted, circular)
    }

    /// Copy of `frame` with a Poisson sized random set of distinct pixels
    /// flashed to random palette colors
    pub fn sprinkle<R: Rng + ?Sized>(
        &self,
        frame: &Frame,
        palette: &Palette,
        arrivals: &Arrivals,
        rng: &mut R,
    ) -> Frame {
        let mut sprinkled = frame.clone();
        if self.num_leds == 0 {
            return sprinkled;
        }
        let count = arrivals.sample(rng).min(self.num_leds);
        for index in rand::seq::index::sample(rng, self.num_leds, count) {
            let color = palette.pick(rng);
            if let Some(pixel) = sprinkled.get_mut(index) {
                *pixel = color;
            }
        }
        sprinkled
    }

    /// Uniformly random permutation of all pixel indices
    pub fn random_permutation<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<usize> {
        let mut perm: Vec<usize> = (0..self.num_leds).collect();
        perm.shuffle(rng);
        perm
    }

    /// Check that `perm` is a permutation of all pixel indices
    pub fn validate_permutation(&self, perm: &[usize]) -> EffectResult<()> {
        let invalid = EffectError::InvalidPermutation {
            expected: self.num_leds,
        };
        if perm.len() != self.num_leds {
            return Err(invalid);
        }
        let mut seen = alloc::vec![false; self.num_leds];
        for &index in perm {
            match seen.get_mut(index) {
                Some(slot) if !*slot => *slot = true,
                _ => return Err(invalid),
            }
        }
        Ok(())
    }

    fn remap(&self, index: usize, circular: bool) -> usize {
        if circular {
            self.circular_index(index)
        } else {
            index
        }
    }

    /// Pixels in logical order
    fn to_ring(&self, frame: &Frame, circular: bool) -> Vec<Color> {
        (0..frame.len())
            .map(|i| {
                frame
                    .get(self.remap(i, circular))
                    .copied()
                    .unwrap_or(Color::BLACK)
            })
            .collect()
    }

    fn from_ring(&self, ring: &[Color], circular: bool) -> Frame {
        let mut frame = Frame::solid(ring.len(), Color::BLACK);
        for (i, color) in ring.iter().enumerate() {
            frame[self.remap(i, circular)] = *color;
        }
        frame
    }
}

/// Permutation undoing `perm`
pub fn inverse_permutation(perm: &[usize]) -> Vec<usize> {
    let mut inverse = alloc::vec![0; perm.len()];
    for (i, &source) in perm.iter().enumerate() {
        if let Some(slot) = inverse.get_mut(source) {
            *slot = i;
        }
    }
    inverse
}
