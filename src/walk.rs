//! Smoothed random walk through color space
//!
//! The walk moves inside the color cylinder (chroma plane in x/y, lightness
//! in z) with a constant step length. Its heading is nudged by gaussian
//! noise every step, so the path bends slowly instead of jittering.

use rand::Rng;
use rand_distr::StandardNormal;

use crate::color::Color;

pub const DEFAULT_STEP_LENGTH: f32 = 0.01;
pub const DEFAULT_NOISE_LEVEL: f32 = 0.1;

// Keep away from black and white, the hue is lost there
const LIGHTNESS_LIMIT: f32 = 0.6;
const MIN_START_RADIUS: f32 = 0.5;
const START_LIGHTNESS: f32 = 0.3;

/// Random walk over colors
#[derive(Debug, Clone)]
pub struct ColorWalk {
    point: [f32; 3],
    heading: [f32; 3],
    /// Distance travelled per step
    pub step_length: f32,
    /// Standard deviation of the heading perturbation per step
    pub noise_level: f32,
}

impl ColorWalk {
    /// Start at a random, reasonably saturated color
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let start = Color::hsl(
            rng.random(),
            rng.random_range(MIN_START_RADIUS..=1.0),
            rng.random_range(-START_LIGHTNESS..=START_LIGHTNESS),
        );
        let mut walk = Self {
            point: start.to_point(),
            heading: [1.0, 0.0, 0.0],
            step_length: DEFAULT_STEP_LENGTH,
            noise_level: DEFAULT_NOISE_LEVEL,
        };
        walk.heading = random_direction(rng).unwrap_or(walk.heading);
        walk
    }

    /// Advance one step
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut heading = self.heading;
        for axis in &mut heading {
            let noise: f32 = rng.sample(StandardNormal);
            *axis += self.noise_level * noise;
        }
        if let Some(heading) = normalized(heading) {
            self.heading = heading;
        }

        for (axis, direction) in self.point.iter_mut().zip(self.heading) {
            *axis += self.step_length * direction;
        }
        self.reflect();
    }

    /// Current color
    pub fn get(&self) -> Color {
        Color::from_point(self.point)
    }

    /// Current color as `(hue, sat, light)`
    pub fn get_hsl(&self) -> (f32, f32, f32) {
        self.get().as_hsl()
    }

    /// Current position in the color cylinder
    pub const fn point(&self) -> [f32; 3] {
        self.point
    }

    /// Mirror position and heading back inside the walkable volume
    fn reflect(&mut self) {
        let [x, y, z] = self.point;
        let radius = libm::sqrtf(x * x + y * y);
        if radius > 1.0 {
            let normal = [x / radius, y / radius];
            let scale = (2.0 - radius).max(0.0) / radius;
            self.point[0] = x * scale;
            self.point[1] = y * scale;

            let outward = self.heading[0] * normal[0] + self.heading[1] * normal[1];
            if outward > 0.0 {
                self.heading[0] -= 2.0 * outward * normal[0];
                self.heading[1] -= 2.0 * outward * normal[1];
            }
        }

        if libm::fabsf(z) > LIGHTNESS_LIMIT {
            let bound = libm::copysignf(LIGHTNESS_LIMIT, z);
            self.point[2] = 2.0 * bound - z;
            self.heading[2] = -self.heading[2];
        }
    }
}

fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Option<[f32; 3]> {
    normalized([
        rng.sample(StandardNormal),
        rng.sample(StandardNormal),
        rng.sample(StandardNormal),
    ])
}

fn normalized(vector: [f32; 3]) -> Option<[f32; 3]> {
    let norm = libm::sqrtf(vector.iter().map(|v| v * v).sum());
    if norm > f32::EPSILON {
        Some(vector.map(|v| v / norm))
    } else {
        None
    }
}
