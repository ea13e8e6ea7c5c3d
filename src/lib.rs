//
// Copyright (c) ShuYu Wang <andelf@gmail.com>, Feather Workshop and Pirmin Kalberer. All rights reserved.
//

//! OGC Simple Features geometry values with WKT, WKB and EWKB codecs.
//!
//! - Validated geometry values for the seven Simple Features kinds
//! - WKT reading and writing, with optional `SRID=<id>;` prefix
//! - WKB reading and writing in both byte orders, plain or with the MySQL SRID prefix
//! - PostGIS EWKB, and `FromSql`/`ToSql` for `geometry` and `geography` columns
//!
//! ```rust
//! use spatial::{Endian, Geometry, GeometryValue, LineString};
//! use std::convert::TryFrom;
//!
//! let line: Geometry = spatial::parse_text("LINESTRING(0 0, 2 2, 5 5)", Some(4326)).unwrap();
//! assert_eq!(spatial::write_text(&line), "LINESTRING(0 0,2 2,5 5)");
//!
//! let bytes = spatial::write_binary(&line, true, Endian::Little);
//! let decoded: Geometry = spatial::parse_binary(&bytes, true).unwrap();
//! assert_eq!(decoded.srid(), Some(4326));
//!
//! let line = LineString::try_from(decoded).unwrap();
//! assert_eq!(line.point(-1).unwrap().x(), 5.0);
//! ```
//!
//! Values are built through validating constructors, so a geometry that exists
//! is always well formed:
//!
//! ```rust
//! use spatial::{Error, Polygon, ValueError};
//!
//! let open = Polygon::<spatial::Planar>::builder()
//!     .ring(vec![(0., 0.), (1., 0.), (1., 1.), (0., 1.)])
//!     .build();
//! assert!(matches!(open, Err(Error::Value(ValueError::UnclosedRing { .. }))));
//! ```

pub mod error;
mod types;
mod validate;
mod geometry;
mod collection;
mod options;
pub mod wkt;
pub mod ewkb;
mod postgis;

pub use crate::collection::{Geometry, GeometryCollection, MultiLineString, MultiPoint, MultiPolygon};
pub use crate::error::{DecodeError, Error, ValueError};
pub use crate::ewkb::{Endian, Flavor};
pub use crate::geometry::{LineString, LineStringBuilder, Point, Polygon, PolygonBuilder};
pub use crate::options::Limits;
pub use crate::types::{Array, Geodetic, GeometryKind, GeometryValue, Planar, ReferenceSystem};
pub use crate::validate::{has_minimum_vertices, is_closed_ring, is_finite_coordinate, Role};

/// Geometry kinds over longitude/latitude coordinates.
pub mod geography {
    use crate::types::Geodetic;

    pub type Point = crate::Point<Geodetic>;
    pub type LineString = crate::LineString<Geodetic>;
    pub type Polygon = crate::Polygon<Geodetic>;
    pub type MultiPoint = crate::MultiPoint<Geodetic>;
    pub type MultiLineString = crate::MultiLineString<Geodetic>;
    pub type MultiPolygon = crate::MultiPolygon<Geodetic>;
    pub type GeometryCollection = crate::GeometryCollection<Geodetic>;
    pub type Geometry = crate::Geometry<Geodetic>;
}

/// Parses WKT. `srid`, when given, must agree with any `SRID=` prefix in `input`.
pub fn parse_text<S: ReferenceSystem>(input: &str, srid: Option<u32>) -> Result<Geometry<S>, Error> {
    wkt::parse(input, srid)
}

/// Canonical WKT, without SRID.
pub fn write_text<S: ReferenceSystem>(geometry: &Geometry<S>) -> String {
    wkt::write(geometry)
}

/// Parses WKB, optionally preceded by a little-endian 4 byte SRID. A prefix of
/// 0 means no SRID, so a value written with `Some(0)` reads back as `None`.
pub fn parse_binary<S: ReferenceSystem>(input: &[u8], srid_prefixed: bool) -> Result<Geometry<S>, Error> {
    ewkb::read(input, binary_flavor(srid_prefixed))
}

/// WKB in byte order `order`. With `srid_prefixed` the SRID is written first as
/// a little-endian u32, 0 when unset.
pub fn write_binary<S: ReferenceSystem>(geometry: &Geometry<S>, srid_prefixed: bool, order: Endian) -> Vec<u8> {
    ewkb::write(geometry, binary_flavor(srid_prefixed), order)
}

fn binary_flavor(srid_prefixed: bool) -> Flavor {
    if srid_prefixed {
        Flavor::SridPrefixed
    } else {
        Flavor::Standard
    }
}
