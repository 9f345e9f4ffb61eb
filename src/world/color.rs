use rand::{Rng, RngCore};

/// Upper bound of a color component.
pub const CHANNEL_MAX: f64 = 255.0;

/// Which component of a color carries genetic meaning.
///
/// `Fixed` marks colors that are pure pigment: they never drift and
/// compare as maximally distant to everything, so they can never count
/// as breeding partners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
    Fixed,
}

/// A phenotype color. Rendering reads all three components; genetics
/// (distance, drift) only ever touches the active channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    channel: Channel,
    r: f64,
    g: f64,
    b: f64,
}

impl Color {
    /// A color with the active channel saturated and the others at zero.
    ///
    /// # Panics
    /// Panics on `Channel::Fixed`; fixed colors need explicit components.
    pub fn primary(channel: Channel) -> Self {
        assert!(
            channel != Channel::Fixed,
            "fixed colors need explicit components"
        );
        let mut color = Color {
            channel,
            r: 0.0,
            g: 0.0,
            b: 0.0,
        };
        color.set_active(CHANNEL_MAX);
        color
    }

    /// An immutable color with the given components.
    pub fn fixed(r: f64, g: f64, b: f64) -> Self {
        Color {
            channel: Channel::Fixed,
            r,
            g,
            b,
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Genetic distance in [0, 1]. Colors on different channels, and any
    /// fixed color, are at distance 1.
    pub fn distance(&self, other: &Color) -> f64 {
        if self.channel != other.channel || self.channel == Channel::Fixed {
            return 1.0;
        }
        (self.active() - other.active()).abs() / CHANNEL_MAX
    }

    /// Nudge the active channel by a uniform delta in `(-max_delta, max_delta)`,
    /// clamped to the byte range. No-op for fixed colors.
    pub fn perturb(&mut self, max_delta: f64, rng: &mut dyn RngCore) {
        if self.channel == Channel::Fixed || max_delta <= 0.0 {
            return;
        }
        let delta = rng.gen_range(-max_delta..max_delta);
        self.set_active((self.active() + delta).clamp(0.0, CHANNEL_MAX));
    }

    /// Re-point the active channel without touching component values.
    /// Fixed colors stay fixed, and nothing can become fixed.
    pub fn switch_channel(&mut self, target: Channel) {
        if self.channel == Channel::Fixed || target == Channel::Fixed {
            return;
        }
        self.channel = target;
    }

    /// Components as display bytes.
    pub fn rgb8(&self) -> (u8, u8, u8) {
        (
            self.r.clamp(0.0, CHANNEL_MAX) as u8,
            self.g.clamp(0.0, CHANNEL_MAX) as u8,
            self.b.clamp(0.0, CHANNEL_MAX) as u8,
        )
    }

    fn active(&self) -> f64 {
        match self.channel {
            Channel::Red => self.r,
            Channel::Green => self.g,
            Channel::Blue => self.b,
            // Unreachable through the public surface; every mutator and
            // comparison gates on Fixed first.
            Channel::Fixed => 0.0,
        }
    }

    fn set_active(&mut self, value: f64) {
        match self.channel {
            Channel::Red => self.r = value,
            Channel::Green => self.g = value,
            Channel::Blue => self.b = value,
            Channel::Fixed => {}
        }
    }
}
