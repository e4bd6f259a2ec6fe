//! Bounding-box query parameter: parsing, validation, clipping.
//!
//! The wire form is four comma-separated decimals in
//! `min_lon,min_lat,max_lon,max_lat` order. Validation is exposed both as a
//! boolean predicate and as a `Result` carrying the specific violation, so a
//! transport layer can format a bad-request response without re-deriving the
//! reason.

use std::str::FromStr;

use geo::{Coord, Rect};
use thiserror::Error;

/// An axis-aligned lon/lat rectangle in decimal degrees.
///
/// # Examples
/// ```
/// use meridian_core::BoundingBox;
///
/// let bbox: BoundingBox = "-0.5,51.2,0.3,51.7".parse()?;
/// assert_eq!(bbox.min_lat, 51.2);
/// assert!(bbox.is_valid());
/// # Ok::<(), meridian_core::InvalidBoundingBox>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    /// Western edge.
    pub min_lon: f64,
    /// Southern edge.
    pub min_lat: f64,
    /// Eastern edge.
    pub max_lon: f64,
    /// Northern edge.
    pub max_lat: f64,
}

/// Reason a bounding box was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidBoundingBox {
    /// The input was not four comma-separated decimals.
    #[error("bounding box must be four comma-separated decimals, got {input:?}")]
    Malformed {
        /// The offending input text.
        input: String,
    },
    /// A longitude fell outside the world range.
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
    /// A latitude fell outside the world range.
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    /// The western edge was not strictly west of the eastern edge.
    #[error("minimum longitude {min} is not below maximum longitude {max}")]
    InvertedLongitude {
        /// Western edge.
        min: f64,
        /// Eastern edge.
        max: f64,
    },
    /// The southern edge was not strictly south of the northern edge.
    #[error("minimum latitude {min} is not below maximum latitude {max}")]
    InvertedLatitude {
        /// Southern edge.
        min: f64,
        /// Northern edge.
        max: f64,
    },
}

impl BoundingBox {
    /// Build a bounding box from its four edges.
    #[must_use]
    pub const fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Check validity, reporting the first violation found.
    ///
    /// Rules: every edge within the world range, and strictly positive extent
    /// on both axes.
    pub fn validate(&self) -> Result<(), InvalidBoundingBox> {
        for lon in [self.min_lon, self.max_lon] {
            if !(-180.0..=180.0).contains(&lon) {
                return Err(InvalidBoundingBox::LongitudeOutOfRange(lon));
            }
        }
        for lat in [self.min_lat, self.max_lat] {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(InvalidBoundingBox::LatitudeOutOfRange(lat));
            }
        }
        if self.min_lon >= self.max_lon {
            return Err(InvalidBoundingBox::InvertedLongitude {
                min: self.min_lon,
                max: self.max_lon,
            });
        }
        if self.min_lat >= self.max_lat {
            return Err(InvalidBoundingBox::InvertedLatitude {
                min: self.min_lat,
                max: self.max_lat,
            });
        }
        Ok(())
    }

    /// Boolean form of [`BoundingBox::validate`].
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Clamp the edges to [-180, 180] × [-90, 90].
    pub fn clip_to_world(&mut self) {
        self.min_lon = self.min_lon.max(-180.0);
        self.min_lat = self.min_lat.max(-90.0);
        self.max_lon = self.max_lon.min(180.0);
        self.max_lat = self.max_lat.min(90.0);
    }

    /// The box as a `geo` rectangle (`x` = longitude, `y` = latitude).
    #[must_use]
    pub fn rect(&self) -> Rect<f64> {
        Rect::new(
            Coord {
                x: self.min_lon,
                y: self.min_lat,
            },
            Coord {
                x: self.max_lon,
                y: self.max_lat,
            },
        )
    }
}

impl FromStr for BoundingBox {
    type Err = InvalidBoundingBox;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || InvalidBoundingBox::Malformed {
            input: s.to_owned(),
        };
        let mut parts = s.split(',');
        let mut next_field = || -> Result<f64, InvalidBoundingBox> {
            parts
                .next()
                .ok_or_else(malformed)?
                .parse()
                .map_err(|_| malformed())
        };
        let min_lon = next_field()?;
        let min_lat = next_field()?;
        let max_lon = next_field()?;
        let max_lat = next_field()?;
        if parts.next().is_some() {
            return Err(malformed());
        }
        Ok(Self::new(min_lon, min_lat, max_lon, max_lat))
    }
}
