//
// Copyright (c) Pirmin Kalberer. All rights reserved.
//

use crate::error::{Error, ValueError};
use std::fmt;

/// The seven OGC Simple Features kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
}

impl GeometryKind {
    /// Uppercase WKT keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            GeometryKind::Point => "POINT",
            GeometryKind::LineString => "LINESTRING",
            GeometryKind::Polygon => "POLYGON",
            GeometryKind::MultiPoint => "MULTIPOINT",
            GeometryKind::MultiLineString => "MULTILINESTRING",
            GeometryKind::MultiPolygon => "MULTIPOLYGON",
            GeometryKind::GeometryCollection => "GEOMETRYCOLLECTION",
        }
    }

    /// Case-insensitive lookup of a WKT keyword.
    pub fn from_keyword(word: &str) -> Option<GeometryKind> {
        let kind = match word.to_ascii_uppercase().as_str() {
            "POINT" => GeometryKind::Point,
            "LINESTRING" => GeometryKind::LineString,
            "POLYGON" => GeometryKind::Polygon,
            "MULTIPOINT" => GeometryKind::MultiPoint,
            "MULTILINESTRING" => GeometryKind::MultiLineString,
            "MULTIPOLYGON" => GeometryKind::MultiPolygon,
            "GEOMETRYCOLLECTION" => GeometryKind::GeometryCollection,
            _ => return None,
        };
        Some(kind)
    }

    /// Base WKB type code, 1 to 7.
    pub fn wkb_code(self) -> u32 {
        match self {
            GeometryKind::Point => 1,
            GeometryKind::LineString => 2,
            GeometryKind::Polygon => 3,
            GeometryKind::MultiPoint => 4,
            GeometryKind::MultiLineString => 5,
            GeometryKind::MultiPolygon => 6,
            GeometryKind::GeometryCollection => 7,
        }
    }

    pub fn from_wkb_code(code: u32) -> Option<GeometryKind> {
        let kind = match code {
            1 => GeometryKind::Point,
            2 => GeometryKind::LineString,
            3 => GeometryKind::Polygon,
            4 => GeometryKind::MultiPoint,
            5 => GeometryKind::MultiLineString,
            6 => GeometryKind::MultiPolygon,
            7 => GeometryKind::GeometryCollection,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            GeometryKind::Point => "Point",
            GeometryKind::LineString => "LineString",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPoint => "MultiPoint",
            GeometryKind::MultiLineString => "MultiLineString",
            GeometryKind::MultiPolygon => "MultiPolygon",
            GeometryKind::GeometryCollection => "GeometryCollection",
        };
        f.write_str(name)
    }
}

/// Coordinate reference system family a geometry lives in.
///
/// The family only changes which coordinates are acceptable; every other
/// behaviour is shared.
pub trait ReferenceSystem: fmt::Debug + Clone + Copy + PartialEq + Default + Send + Sync + 'static {
    const NAME: &'static str;

    fn check_coordinate(_x: f64, _y: f64) -> Result<(), ValueError> {
        Ok(())
    }
}

/// Cartesian coordinates, no range restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Planar;

/// Longitude/latitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Geodetic;

impl ReferenceSystem for Planar {
    const NAME: &'static str = "geometry";
}

impl ReferenceSystem for Geodetic {
    const NAME: &'static str = "geography";

    fn check_coordinate(x: f64, y: f64) -> Result<(), ValueError> {
        if (-180.0..=180.0).contains(&x) && (-90.0..=90.0).contains(&y) {
            Ok(())
        } else {
            Err(ValueError::OutOfRange { x, y })
        }
    }
}

/// Nested numeric form of a geometry, as returned by `to_array`.
#[derive(Debug, Clone, PartialEq)]
pub enum Array {
    /// Ordinates of one position.
    Coord(Vec<f64>),
    List(Vec<Array>),
}

/// Contract shared by every geometry kind.
pub trait GeometryValue {
    fn kind(&self) -> GeometryKind;
    fn srid(&self) -> Option<u32>;
    /// Sets the SRID of this value and of everything it owns.
    fn set_srid(&mut self, srid: Option<u32>);
    fn to_array(&self) -> Array;
    /// `Some(true)` for XYZ, `Some(false)` for XY, `None` when the value holds
    /// no coordinate at all, however deeply its members are nested.
    fn z_dimension(&self) -> Option<bool>;

    /// True for 3D (XYZ) values.
    fn has_z(&self) -> bool {
        self.z_dimension() == Some(true)
    }

    fn is_empty(&self) -> bool;
}

/// Maps an element index, where negative values count back from the end, to a
/// position in a list of `len` elements.
pub(crate) fn resolve_index(index: isize, len: usize) -> Result<usize, Error> {
    let resolved = if index < 0 {
        len.checked_sub(index.unsigned_abs())
    } else if (index as usize) < len {
        Some(index as usize)
    } else {
        None
    };
    resolved.ok_or(Error::IndexOutOfRange { index, len })
}

#[test]
fn test_keywords() {
    assert_eq!(GeometryKind::from_keyword("multiPolygon"), Some(GeometryKind::MultiPolygon));
    assert_eq!(GeometryKind::from_keyword("CIRCLE"), None);
    for code in 1..=7 {
        let kind = GeometryKind::from_wkb_code(code).unwrap();
        assert_eq!(kind.wkb_code(), code);
        assert_eq!(GeometryKind::from_keyword(kind.keyword()), Some(kind));
    }
    assert_eq!(GeometryKind::from_wkb_code(8), None);
}

#[test]
fn test_resolve_index() {
    assert_eq!(resolve_index(0, 3), Ok(0));
    assert_eq!(resolve_index(2, 3), Ok(2));
    assert_eq!(resolve_index(-1, 3), Ok(2));
    assert_eq!(resolve_index(-3, 3), Ok(0));
    assert_eq!(resolve_index(3, 3), Err(Error::IndexOutOfRange { index: 3, len: 3 }));
    assert_eq!(resolve_index(-4, 3), Err(Error::IndexOutOfRange { index: -4, len: 3 }));
    assert_eq!(resolve_index(-1, 0), Err(Error::IndexOutOfRange { index: -1, len: 0 }));
}

#[test]
fn test_geodetic_range() {
    assert!(Geodetic::check_coordinate(-180.0, 90.0).is_ok());
    assert_eq!(
        Geodetic::check_coordinate(181.0, 0.0),
        Err(ValueError::OutOfRange { x: 181.0, y: 0.0 })
    );
    assert!(Planar::check_coordinate(181.0, -1000.0).is_ok());
}
