//! Unit-safe quantities for overlay geometry and network metadata.
//!
//! Keeps voltages, capacities, distances and angles from being mixed up as
//! bare `f64`s. The overlay engine moves between three distance spaces
//! (raw degrees, local meters, great-circle kilometers) and the newtypes make
//! every crossing explicit.
//!
//! All types are `#[repr(transparent)]` so the wrappers cost nothing at runtime.
//!
//! # Usage
//!
//! ```
//! use gridlens_core::units::{Degrees, Kilometers, Meters};
//!
//! let offset = Meters(140.0);
//! let span: Kilometers = offset.to_kilometers();
//! assert!((span.value() - 0.14).abs() < 1e-12);
//!
//! let lat = Degrees(30.0);
//! assert!((lat.to_radians().sin() - 0.5).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Macro to implement common arithmetic operations for unit types
macro_rules! impl_unit_ops {
    ($type:ty, $unit_name:literal) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Neg for $type {
            type Output = Self;
            fn neg(self) -> Self::Output {
                Self(-self.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl Div<$type> for $type {
            type Output = f64;
            fn div(self, rhs: $type) -> Self::Output {
                self.0 / rhs.0
            }
        }

        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{:.4} {}", self.0, $unit_name)
            }
        }

        impl $type {
            /// Create a new value
            #[inline]
            pub const fn new(value: f64) -> Self {
                Self(value)
            }

            /// Get the raw numeric value
            #[inline]
            pub const fn value(self) -> f64 {
                self.0
            }

            /// Check if value is finite
            #[inline]
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }

            /// Maximum of two values
            #[inline]
            pub fn max(self, other: Self) -> Self {
                Self(self.0.max(other.0))
            }
        }
    };
}

// =============================================================================
// Electrical metadata
// =============================================================================

/// Nominal voltage level in kilovolts (kV)
///
/// Drives the marker tier of a node; never used for electrical computation here.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Kilovolts(pub f64);

impl_unit_ops!(Kilovolts, "kV");

/// Apparent power rating in megavolt-amperes (MVA)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct MegavoltAmperes(pub f64);

impl_unit_ops!(MegavoltAmperes, "MVA");

/// Line loading as a percentage of rating (`85.0` means 85 %)
///
/// Produced by the external power-flow collaborator; the overlay only classifies it.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct LoadingPercent(pub f64);

impl_unit_ops!(LoadingPercent, "%");

// =============================================================================
// Distances
// =============================================================================

/// Local ground distance in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Meters(pub f64);

impl_unit_ops!(Meters, "m");

/// Great-circle distance in kilometers
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Kilometers(pub f64);

impl_unit_ops!(Kilometers, "km");

impl Meters {
    #[inline]
    pub fn to_kilometers(self) -> Kilometers {
        Kilometers(self.0 / 1000.0)
    }
}

impl Kilometers {
    #[inline]
    pub fn to_meters(self) -> Meters {
        Meters(self.0 * 1000.0)
    }
}

// =============================================================================
// Angles
// =============================================================================

/// Angle in radians
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Radians(pub f64);

impl_unit_ops!(Radians, "rad");

/// Angle in degrees (latitude/longitude are expressed in this unit)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Degrees(pub f64);

impl_unit_ops!(Degrees, "°");

impl Radians {
    /// Convert to degrees
    #[inline]
    pub fn to_degrees(self) -> Degrees {
        Degrees(self.0.to_degrees())
    }

    #[inline]
    pub fn sin(self) -> f64 {
        self.0.sin()
    }

    #[inline]
    pub fn cos(self) -> f64 {
        self.0.cos()
    }
}

impl Degrees {
    /// Convert to radians
    #[inline]
    pub fn to_radians(self) -> Radians {
        Radians(self.0.to_radians())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kilovolt_arithmetic() {
        let v1 = Kilovolts(220.0);
        let v2 = Kilovolts(110.0);

        assert_eq!((v1 + v2).value(), 330.0);
        assert_eq!((v1 - v2).value(), 110.0);
        assert_eq!((-v1).value(), -220.0);
        assert_eq!((v1 * 0.5).value(), 110.0);
        assert_eq!((v1 / 2.0).value(), 110.0);
        assert_eq!(v1 / v2, 2.0);
    }

    #[test]
    fn test_distance_conversion() {
        let d = Meters(1500.0);
        assert!((d.to_kilometers().value() - 1.5).abs() < 1e-12);
        assert!((Kilometers(2.0).to_meters().value() - 2000.0).abs() < 1e-12);
    }

    #[test]
    fn test_angle_conversion() {
        let rad = Degrees(180.0).to_radians();
        assert!((rad.value() - std::f64::consts::PI).abs() < 1e-10);
        assert!((rad.to_degrees().value() - 180.0).abs() < 1e-10);
        assert!((Degrees(60.0).to_radians().cos() - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_transparent_serde() {
        let json = serde_json::to_string(&LoadingPercent(91.5)).unwrap();
        assert_eq!(json, "91.5");
        let back: Kilovolts = serde_json::from_str("138.0").unwrap();
        assert_eq!(back, Kilovolts(138.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Kilovolts(110.0)), "110.0000 kV");
        assert_eq!(format!("{}", LoadingPercent(72.0)), "72.0000 %");
        assert_eq!(format!("{}", Meters(140.0)), "140.0000 m");
    }
}
