//! Fixed-point angles in legacy units.
//!
//! One full turn is 65536 units stored in an `i16`, so arithmetic wraps
//! naturally at ±180°. Yaw 0 faces +Z, yaw 90° faces +X.

use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Angle units in one full turn.
pub const UNITS_PER_TURN: i32 = 65536;

/// A wrapping 16-bit angle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Angle(i16);

/// Shorthand for [`Angle::from_degrees`], usable in constants.
#[inline]
pub const fn deg(degrees: f32) -> Angle {
    Angle::from_degrees(degrees)
}

impl Angle {
    pub const ZERO: Angle = Angle(0);

    #[inline]
    pub const fn from_raw(raw: i16) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> i16 {
        self.0
    }

    /// Converts degrees into legacy units, wrapping values outside ±180°.
    #[inline]
    pub const fn from_degrees(degrees: f32) -> Self {
        Self((degrees * UNITS_PER_TURN as f32 / 360.0) as i32 as i16)
    }

    #[inline]
    pub fn to_degrees(self) -> f32 {
        self.0 as f32 * 360.0 / UNITS_PER_TURN as f32
    }

    #[inline]
    pub fn to_radians(self) -> f32 {
        self.to_degrees().to_radians()
    }

    #[inline]
    pub fn sin(self) -> f32 {
        self.to_radians().sin()
    }

    #[inline]
    pub fn cos(self) -> f32 {
        self.to_radians().cos()
    }

    /// Absolute magnitude in units, as `i32` so that -180° does not overflow.
    #[inline]
    pub fn abs_units(self) -> i32 {
        (self.0 as i32).abs()
    }

    /// Absolute value; -180° stays -180°.
    #[inline]
    pub fn abs(self) -> Self {
        Self(self.0.wrapping_abs())
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Scales the angle, wrapping on overflow.
    #[inline]
    pub fn scaled(self, factor: i32) -> Self {
        Self((self.0 as i32).wrapping_mul(factor) as i16)
    }

    /// `amount` scaled by the sine of this angle, truncated toward zero.
    #[inline]
    pub fn sin_of(self, amount: i32) -> i32 {
        (self.sin() * amount as f32) as i32
    }

    /// `amount` scaled by the cosine of this angle, truncated toward zero.
    #[inline]
    pub fn cos_of(self, amount: i32) -> i32 {
        (self.cos() * amount as f32) as i32
    }

    /// Moves this angle toward zero by at most `step`.
    pub fn decayed(self, step: Angle) -> Self {
        let step = step.abs_units();
        let value = self.0 as i32;
        if value > step {
            Self((value - step) as i16)
        } else if value < -step {
            Self((value + step) as i16)
        } else {
            Self::ZERO
        }
    }

    /// Clamps into `[-limit, limit]`.
    #[inline]
    pub fn clamp_abs(self, limit: Angle) -> Self {
        let limit = limit.abs_units() as i16;
        Self(self.0.clamp(-limit, limit))
    }

    /// The cardinal axis this angle points along.
    #[inline]
    pub fn axis(self) -> Axis {
        Axis::from_angle(self)
    }
}

impl Add for Angle {
    type Output = Angle;

    #[inline]
    fn add(self, rhs: Angle) -> Angle {
        Angle(self.0.wrapping_add(rhs.0))
    }
}

impl Sub for Angle {
    type Output = Angle;

    #[inline]
    fn sub(self, rhs: Angle) -> Angle {
        Angle(self.0.wrapping_sub(rhs.0))
    }
}

impl Neg for Angle {
    type Output = Angle;

    #[inline]
    fn neg(self) -> Angle {
        Angle(self.0.wrapping_neg())
    }
}

impl AddAssign for Angle {
    #[inline]
    fn add_assign(&mut self, rhs: Angle) {
        *self = *self + rhs;
    }
}

impl SubAssign for Angle {
    #[inline]
    fn sub_assign(&mut self, rhs: Angle) {
        *self = *self - rhs;
    }
}

/// The four cardinal directions a facing angle snaps to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Axis {
    #[default]
    PosZ,
    PosX,
    NegZ,
    NegX,
}

impl Axis {
    /// Snaps with a ±45° window around each cardinal direction.
    pub fn from_angle(angle: Angle) -> Axis {
        let sector = (angle + deg(45.0)).raw() as u16 / deg(90.0).raw() as u16;
        match sector {
            0 => Axis::PosZ,
            1 => Axis::PosX,
            2 => Axis::NegZ,
            _ => Axis::NegX,
        }
    }

    /// The exact cardinal angle of this axis.
    pub fn angle(self) -> Angle {
        match self {
            Axis::PosZ => Angle::ZERO,
            Axis::PosX => deg(90.0),
            Axis::NegZ => deg(180.0),
            Axis::NegX => deg(-90.0),
        }
    }

    /// True for the two axes running along Z.
    #[inline]
    pub fn is_z(self) -> bool {
        matches!(self, Axis::PosZ | Axis::NegZ)
    }
}

/// Returns the cardinal angle within `margin` of `angle`, if any.
pub fn align_rotation(angle: Angle, margin: Angle) -> Option<Angle> {
    let margin = margin.abs_units();
    [Axis::PosZ, Axis::PosX, Axis::NegZ, Axis::NegX]
        .into_iter()
        .map(Axis::angle)
        .find(|&cardinal| (angle - cardinal).abs_units() <= margin)
}
