use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Blue-green-red color, the channel order frames are captured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub b: u8,
    pub g: u8,
    pub r: u8,
}

impl Color {
    #[inline]
    pub const fn bgr(b: u8, g: u8, r: u8) -> Self {
        Self { b, g, r }
    }
}

/// Where new class colors come from.
pub trait ColorSource {
    fn next_color(&mut self) -> Color;
}

/// Uniformly random colors.
#[derive(Debug)]
pub struct RandomColors {
    rng: StdRng,
}

impl RandomColors {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomColors {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorSource for RandomColors {
    fn next_color(&mut self) -> Color {
        let [b, g, r]: [u8; 3] = self.rng.gen();
        Color::bgr(b, g, r)
    }
}

impl<F: FnMut() -> Color> ColorSource for F {
    #[inline]
    fn next_color(&mut self) -> Color {
        self()
    }
}

/// Class name to color mapping, filled the first time a class is seen.
#[derive(Debug)]
pub struct Palette<C = RandomColors> {
    colors: HashMap<String, Color>,
    source: C,
}

impl<C: ColorSource> Palette<C> {
    pub fn new(source: C) -> Self {
        Self {
            colors: HashMap::new(),
            source,
        }
    }

    pub fn color_for(&mut self, class_name: &str) -> Color {
        if let Some(color) = self.colors.get(class_name) {
            return *color;
        }

        let color = self.source.next_color();
        self.colors.insert(class_name.to_string(), color);
        color
    }

    #[inline]
    pub fn get(&self, class_name: &str) -> Option<Color> {
        self.colors.get(class_name).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for Palette<RandomColors> {
    fn default() -> Self {
        Self::new(RandomColors::new())
    }
}
