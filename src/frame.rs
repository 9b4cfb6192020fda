//! One complete snapshot of pixel colors

use alloc::vec;
use alloc::vec::Vec;
use core::ops::{Deref, DerefMut};

use crate::color::{Color, Rgb};

/// Colors for every pixel of a string, index addressed
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    pixels: Vec<Color>,
}

impl Frame {
    /// Frame of `len` pixels set to `color`
    pub fn solid(len: usize, color: Color) -> Self {
        Self {
            pixels: vec![color; len],
        }
    }

    pub const fn from_pixels(pixels: Vec<Color>) -> Self {
        Self { pixels }
    }

    pub fn into_pixels(self) -> Vec<Color> {
        self.pixels
    }

    /// Device colors in index order
    pub fn to_rgb(&self) -> impl Iterator<Item = Rgb> + '_ {
        self.pixels.iter().map(|color| color.to_rgb())
    }
}

impl Deref for Frame {
    type Target = [Color];

    fn deref(&self) -> &Self::Target {
        &self.pixels
    }
}

impl DerefMut for Frame {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.pixels
    }
}

impl From<Vec<Color>> for Frame {
    fn from(pixels: Vec<Color>) -> Self {
        Self::from_pixels(pixels)
    }
}
