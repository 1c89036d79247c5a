//! Per-layer visual transforms and channel composition.
//!
//! A layer is driven by several independent sources: scroll bindings, the
//! ambient swing and (on hero sections) pointer parallax. Each writes only
//! its own channel of a [`LayerTransform`]; [`LayerTransform::compose`]
//! combines them additively so no source overwrites another.

use std::fmt::Write as _;

use glam::Vec2;

/// An animatable property of a [`Transform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    /// Horizontal translation in px.
    TranslateX,
    /// Vertical translation in px.
    TranslateY,
    /// Horizontal scale factor (left-anchored for highlight bars).
    ScaleX,
    /// Vertical scale factor.
    ScaleY,
    /// Uniform scale factor (writes both axes).
    Scale,
    /// Rotation in degrees.
    Rotation,
    /// Opacity in [0, 1].
    Opacity,
    /// Blend between a node's resting and highlighted text color, [0, 1].
    ColorMix,
}

/// A complete set of visual properties for one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation in px.
    pub translate: Vec2,
    /// Scale factors per axis.
    pub scale: Vec2,
    /// Rotation in degrees.
    pub rotation: f32,
    /// Opacity in [0, 1].
    pub opacity: f32,
    /// Text color blend in [0, 1].
    pub color_mix: f32,
}

impl Transform {
    /// The untouched state of a node.
    pub const IDENTITY: Self = Self {
        translate: Vec2::ZERO,
        scale: Vec2::ONE,
        rotation: 0.0,
        opacity: 1.0,
        color_mix: 0.0,
    };

    /// Read a property.
    #[must_use]
    pub fn get(&self, property: Property) -> f32 {
        match property {
            Property::TranslateX => self.translate.x,
            Property::TranslateY => self.translate.y,
            Property::ScaleX | Property::Scale => self.scale.x,
            Property::ScaleY => self.scale.y,
            Property::Rotation => self.rotation,
            Property::Opacity => self.opacity,
            Property::ColorMix => self.color_mix,
        }
    }

    /// Write a property. Opacity and color mix are clamped to [0, 1].
    pub fn set(&mut self, property: Property, value: f32) {
        match property {
            Property::TranslateX => self.translate.x = value,
            Property::TranslateY => self.translate.y = value,
            Property::ScaleX => self.scale.x = value,
            Property::ScaleY => self.scale.y = value,
            Property::Scale => self.scale = Vec2::splat(value),
            Property::Rotation => self.rotation = value,
            Property::Opacity => self.opacity = value.clamp(0.0, 1.0),
            Property::ColorMix => self.color_mix = value.clamp(0.0, 1.0),
        }
    }

    /// Builder form of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, property: Property, value: f32) -> Self {
        self.set(property, value);
        self
    }

    /// CSS `transform` value for this state.
    #[must_use]
    pub fn to_css(&self) -> String {
        let mut css = String::with_capacity(64);
        let _ = write!(
            css,
            "translate3d({:.2}px, {:.2}px, 0)",
            self.translate.x, self.translate.y
        );
        if self.rotation != 0.0 {
            let _ = write!(css, " rotate({:.3}deg)", self.rotation);
        }
        if self.scale != Vec2::ONE {
            let _ =
                write!(css, " scale({:.4}, {:.4})", self.scale.x, self.scale.y);
        }
        css
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Independent transform channels for one layer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayerTransform {
    /// Written by scroll bindings.
    pub scroll: Transform,
    /// Written by the ambient swing (degrees).
    pub ambient_rotation: f32,
    /// Written by pointer parallax (px).
    pub pointer: Vec2,
}

impl LayerTransform {
    /// Combine all channels into the transform the host should render.
    #[must_use]
    pub fn compose(&self) -> Transform {
        Transform {
            translate: self.scroll.translate + self.pointer,
            rotation: self.scroll.rotation + self.ambient_rotation,
            ..self.scroll
        }
    }
}

/// A straight RGBA color, components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Rgba {
    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let channel = |s: &str| {
            u8::from_str_radix(s, 16).ok().map(|v| f32::from(v) / 255.0)
        };
        match digits.len() {
            3 => {
                let mut out = [0.0; 3];
                for (slot, i) in out.iter_mut().zip(0..3) {
                    let d = digits.get(i..=i)?;
                    *slot = channel(&d.repeat(2))?;
                }
                Some(Self {
                    r: out[0],
                    g: out[1],
                    b: out[2],
                    a: 1.0,
                })
            }
            6 | 8 => Some(Self {
                r: channel(digits.get(0..2)?)?,
                g: channel(digits.get(2..4)?)?,
                b: channel(digits.get(4..6)?)?,
                a: if digits.len() == 8 {
                    channel(digits.get(6..8)?)?
                } else {
                    1.0
                },
            }),
            _ => None,
        }
    }

    /// Linear blend toward `other`.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// CSS `rgba()` value.
    #[must_use]
    pub fn to_css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {:.3})",
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            self.a
        )
    }
}
