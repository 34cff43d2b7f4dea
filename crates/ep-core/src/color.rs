use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Couleur RGBA, un octet par canal.
///
/// # Example
/// ```
/// use ep_core::color::Color;
/// let c = Color::rgb(255, 60, 128);
/// assert_eq!(c, Color::rgba(255, 60, 128, 255));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Color {
    /// Couleur réservée "pas de donnée". Lue pour toute cellule jamais peuplée.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// Opaque color, alpha = 255.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build a color from untyped channels (3 or 4 values, each in `[0, 255]`).
    ///
    /// A 3-channel input gets alpha 255.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidColor`] on wrong arity or an out-of-range channel.
    ///
    /// # Example
    /// ```
    /// use ep_core::color::Color;
    /// assert_eq!(Color::from_channels(&[1, 2, 3]).unwrap(), Color::rgba(1, 2, 3, 255));
    /// assert!(Color::from_channels(&[1, 2, 256]).is_err());
    /// assert!(Color::from_channels(&[1, 2]).is_err());
    /// ```
    pub fn from_channels(channels: &[i64]) -> Result<Self, CoreError> {
        if !(channels.len() == 3 || channels.len() == 4) {
            return Err(CoreError::InvalidColor(format!(
                "{} canaux, attendu 3 (r, g, b) ou 4 (r, g, b, a)",
                channels.len()
            )));
        }
        let mut out = [255u8; 4];
        for (slot, &value) in out.iter_mut().zip(channels) {
            *slot = u8::try_from(value).map_err(|_| {
                CoreError::InvalidColor(format!("canal {value} hors de [0, 255]"))
            })?;
        }
        Ok(Self::rgba(out[0], out[1], out[2], out[3]))
    }

    /// Channels as an array, in `r, g, b, a` order.
    #[inline(always)]
    #[must_use]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Squared Euclidean distance in RGBA space.
    ///
    /// Ordering by squared distance equals ordering by distance, without the sqrt.
    #[inline(always)]
    #[must_use]
    pub fn distance_squared(self, other: Self) -> u32 {
        self.to_array()
            .iter()
            .zip(other.to_array())
            .map(|(&a, b)| {
                let d = i32::from(a) - i32::from(b);
                (d * d) as u32
            })
            .sum()
    }

    /// Euclidean distance in RGBA space.
    ///
    /// # Example
    /// ```
    /// use ep_core::color::Color;
    /// let d = Color::rgba(0, 0, 0, 0).distance(Color::rgba(3, 4, 0, 0));
    /// assert!((d - 5.0).abs() < 1e-9);
    /// ```
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        f64::from(self.distance_squared(other)).sqrt()
    }
}

impl From<[u8; 4]> for Color {
    fn from(c: [u8; 4]) -> Self {
        Self::rgba(c[0], c[1], c[2], c[3])
    }
}

impl From<[u8; 3]> for Color {
    fn from(c: [u8; 3]) -> Self {
        Self::rgb(c[0], c[1], c[2])
    }
}

impl From<(u8, u8, u8, u8)> for Color {
    fn from((r, g, b, a): (u8, u8, u8, u8)) -> Self {
        Self::rgba(r, g, b, a)
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::rgb(r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn three_channels_default_alpha() {
        let c = Color::from_channels(&[10, 20, 30]).unwrap();
        assert_eq!(c.a, 255);
        assert_eq!(Color::from([10u8, 20, 30]), c);
    }

    #[test]
    fn rejects_bad_arity_and_range() {
        assert!(matches!(
            Color::from_channels(&[]),
            Err(CoreError::InvalidColor(_))
        ));
        assert!(matches!(
            Color::from_channels(&[0, 0, 0, 0, 0]),
            Err(CoreError::InvalidColor(_))
        ));
        assert!(matches!(
            Color::from_channels(&[-1, 0, 0]),
            Err(CoreError::InvalidColor(_))
        ));
        assert!(matches!(
            Color::from_channels(&[0, 0, 0, 300]),
            Err(CoreError::InvalidColor(_))
        ));
    }

    proptest! {
        #[test]
        fn distance_matches_norm(a in any::<[u8; 4]>(), b in any::<[u8; 4]>()) {
            let expected = a
                .iter()
                .zip(b.iter())
                .map(|(&x, &y)| (f64::from(x) - f64::from(y)).powi(2))
                .sum::<f64>()
                .sqrt();
            let d = Color::from(a).distance(Color::from(b));
            prop_assert!((d - expected).abs() < 1e-9);
        }
    }
}
