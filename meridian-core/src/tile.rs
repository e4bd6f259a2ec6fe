//! Z-order ("tile") spatial index codes over quantized coordinates.
//!
//! A tile code is a 32-bit Morton code: longitude and latitude are each
//! quantized to 16 bits and their bits interleaved most-significant first,
//! one bit of `x` (longitude) then one bit of `y` (latitude) per step. Points
//! close together on the globe produce numerically close codes, so a
//! bounding-box query can be served by a range scan over an ordered index.
//!
//! All arithmetic is integer-only on the fixed-point [`Coordinate`] inputs.
//! Rounding is half away from zero (after the shift into non-negative space
//! this is plain half-up), matching the C `round()` the reference encoder
//! used, and the result is bit-identical on every invocation and platform.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use crate::bbox::BoundingBox;
use crate::element::Coordinate;

const LON_OFFSET: i64 = 1_800_000_000;
const LON_SPAN: i64 = 3_600_000_000;
const LAT_OFFSET: i64 = 900_000_000;
const LAT_SPAN: i64 = 1_800_000_000;

/// Compute the tile code for a point.
///
/// Out-of-range coordinates are clamped to the world bounds before
/// quantization, so every input maps to a valid code.
///
/// # Examples
/// ```
/// use meridian_core::{Coordinate, tile_for_point};
///
/// let equator_greenwich = tile_for_point(
///     Coordinate::from_degrees(0.0),
///     Coordinate::from_degrees(0.0),
/// );
/// assert_eq!(equator_greenwich, 0xC000_0000);
/// ```
#[must_use]
pub fn tile_for_point(lat: Coordinate, lon: Coordinate) -> u32 {
    xy2tile(lon2x(lon), lat2y(lat))
}

/// Covering tile-code range for a bounding box.
///
/// Every node inside the box has a tile code within the returned range. The
/// converse does not hold: a Z-order range may include codes of tiles outside
/// the box, so callers filtering by exact geometry must re-check coordinates
/// after the range scan.
#[must_use]
pub fn tile_range_for_bbox(bbox: &BoundingBox) -> RangeInclusive<u32> {
    let min = xy2tile(
        lon2x(Coordinate::from_degrees(bbox.min_lon)),
        lat2y(Coordinate::from_degrees(bbox.min_lat)),
    );
    let max = xy2tile(
        lon2x(Coordinate::from_degrees(bbox.max_lon)),
        lat2y(Coordinate::from_degrees(bbox.max_lat)),
    );
    min..=max
}

/// Exact set of tile codes covering a bounding box.
///
/// Enumerates one code per quantized cell; the set size is proportional to
/// the box area (one cell is roughly 0.0055° × 0.0027°), so this suits the
/// small boxes a map call accepts, not continent-sized ones.
#[must_use]
pub fn tiles_for_bbox(bbox: &BoundingBox) -> BTreeSet<u32> {
    let min_x = lon2x(Coordinate::from_degrees(bbox.min_lon));
    let max_x = lon2x(Coordinate::from_degrees(bbox.max_lon));
    let min_y = lat2y(Coordinate::from_degrees(bbox.min_lat));
    let max_y = lat2y(Coordinate::from_degrees(bbox.max_lat));

    let mut tiles = BTreeSet::new();
    for x in min_x..=max_x {
        for y in min_y..=max_y {
            tiles.insert(xy2tile(x, y));
        }
    }
    tiles
}

fn lon2x(lon: Coordinate) -> u16 {
    quantize(lon, LON_OFFSET, LON_SPAN)
}

fn lat2y(lat: Coordinate) -> u16 {
    quantize(lat, LAT_OFFSET, LAT_SPAN)
}

/// Map a fixed-point coordinate onto `[0, 65535]`.
#[expect(
    clippy::integer_division,
    reason = "quotient of non-negative values implements half-up rounding exactly"
)]
fn quantize(value: Coordinate, offset: i64, span: i64) -> u16 {
    let shifted = (i64::from(value.raw()) + offset).clamp(0, span);
    let rounded = (shifted * 65_535 + span / 2) / span;
    u16::try_from(rounded).unwrap_or(u16::MAX)
}

/// Interleave the bits of `x` and `y`, most significant first.
const fn xy2tile(x: u16, y: u16) -> u32 {
    let mut tile: u32 = 0;
    let mut i = 16;
    while i > 0 {
        i -= 1;
        tile = (tile << 1) | (((x as u32) >> i) & 1);
        tile = (tile << 1) | (((y as u32) >> i) & 1);
    }
    tile
}
