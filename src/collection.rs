//
// Copyright (c) Pirmin Kalberer. All rights reserved.
//

//! Multi-geometries, geometry collections and the [`Geometry`] sum type.

use crate::error::{Error, ValueError};
use crate::geometry::{LineString, Point, Polygon};
use crate::types::{resolve_index, Array, GeometryKind, GeometryValue, Planar, ReferenceSystem};
use crate::validate;
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

macro_rules! multi_geometry {
    (
        $(#[$doc:meta])*
        $name:ident<$item:ident>: $kind:ident {
            $field:ident, $get:ident, $add:ident, $set:ident
        }
    ) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name<S = Planar> {
            $field: Vec<$item<S>>,
            srid: Option<u32>,
        }

        impl<S: ReferenceSystem> $name<S> {
            /// Element SRIDs are replaced by the container's.
            pub fn new($field: Vec<$item<S>>) -> Result<Self, Error> {
                validate::check_same_dimension($field.iter().filter_map(GeometryValue::z_dimension))?;
                let mut multi = $name { $field, srid: None };
                multi.set_srid(None);
                Ok(multi)
            }

            pub fn empty() -> Self {
                $name {
                    $field: Vec::new(),
                    srid: None,
                }
            }

            pub fn with_srid(mut self, srid: Option<u32>) -> Self {
                self.set_srid(srid);
                self
            }

            pub fn $field(&self) -> &[$item<S>] {
                &self.$field
            }

            /// Element at `index`; negative values count back from the end.
            pub fn $get(&self, index: isize) -> Result<&$item<S>, Error> {
                let index = resolve_index(index, self.$field.len())?;
                Ok(&self.$field[index])
            }

            pub fn len(&self) -> usize {
                self.$field.len()
            }

            pub fn $add(&mut self, mut item: $item<S>) -> Result<(), Error> {
                validate::check_same_dimension(self.z_dimension().into_iter().chain(item.z_dimension()))?;
                item.set_srid(self.srid);
                self.$field.push(item);
                Ok(())
            }

            /// Replaces every element, validated like `new`. Nothing changes on error.
            pub fn $set(&mut self, $field: Vec<$item<S>>) -> Result<(), Error> {
                *self = $name::new($field)?.with_srid(self.srid);
                Ok(())
            }
        }

        impl<S: ReferenceSystem> GeometryValue for $name<S> {
            fn kind(&self) -> GeometryKind {
                GeometryKind::$kind
            }

            fn srid(&self) -> Option<u32> {
                self.srid
            }

            fn set_srid(&mut self, srid: Option<u32>) {
                self.srid = srid;
                for item in &mut self.$field {
                    item.set_srid(srid);
                }
            }

            fn to_array(&self) -> Array {
                Array::List(self.$field.iter().map(GeometryValue::to_array).collect())
            }

            fn z_dimension(&self) -> Option<bool> {
                self.$field.iter().find_map(GeometryValue::z_dimension)
            }

            fn is_empty(&self) -> bool {
                self.$field.is_empty()
            }
        }
    };
}

multi_geometry! {
    MultiPoint<Point>: MultiPoint { points, point, add_point, set_points }
}

multi_geometry! {
    MultiLineString<LineString>: MultiLineString { line_strings, line_string, add_line_string, set_line_strings }
}

multi_geometry! {
    MultiPolygon<Polygon>: MultiPolygon { polygons, polygon, add_polygon, set_polygons }
}

multi_geometry! {
    /// Heterogeneous elements, including nested collections.
    GeometryCollection<Geometry>: GeometryCollection { geometries, geometry, add_geometry, set_geometries }
}

/// Any of the seven geometry kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry<S = Planar> {
    Point(Point<S>),
    LineString(LineString<S>),
    Polygon(Polygon<S>),
    MultiPoint(MultiPoint<S>),
    MultiLineString(MultiLineString<S>),
    MultiPolygon(MultiPolygon<S>),
    GeometryCollection(GeometryCollection<S>),
}

macro_rules! dispatch {
    ($geom:expr, $g:ident => $body:expr) => {
        match $geom {
            Geometry::Point($g) => $body,
            Geometry::LineString($g) => $body,
            Geometry::Polygon($g) => $body,
            Geometry::MultiPoint($g) => $body,
            Geometry::MultiLineString($g) => $body,
            Geometry::MultiPolygon($g) => $body,
            Geometry::GeometryCollection($g) => $body,
        }
    };
}

impl<S: ReferenceSystem> Geometry<S> {
    pub fn with_srid(mut self, srid: Option<u32>) -> Self {
        self.set_srid(srid);
        self
    }
}

impl<S: ReferenceSystem> GeometryValue for Geometry<S> {
    fn kind(&self) -> GeometryKind {
        dispatch!(self, g => g.kind())
    }

    fn srid(&self) -> Option<u32> {
        dispatch!(self, g => g.srid())
    }

    fn set_srid(&mut self, srid: Option<u32>) {
        dispatch!(self, g => g.set_srid(srid))
    }

    fn to_array(&self) -> Array {
        dispatch!(self, g => g.to_array())
    }

    fn z_dimension(&self) -> Option<bool> {
        dispatch!(self, g => g.z_dimension())
    }

    fn is_empty(&self) -> bool {
        dispatch!(self, g => g.is_empty())
    }
}

macro_rules! geometry_conversions {
    ($($kind:ident),*) => {
        $(
            impl<S> From<$kind<S>> for Geometry<S> {
                fn from(geom: $kind<S>) -> Self {
                    Geometry::$kind(geom)
                }
            }

            impl<S: ReferenceSystem> TryFrom<Geometry<S>> for $kind<S> {
                type Error = Error;

                fn try_from(geom: Geometry<S>) -> Result<Self, Error> {
                    match geom {
                        Geometry::$kind(g) => Ok(g),
                        other => Err(ValueError::WrongKind {
                            expected: GeometryKind::$kind,
                            found: other.kind(),
                        }
                        .into()),
                    }
                }
            }

            impl<S: ReferenceSystem> fmt::Display for $kind<S> {
                fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    crate::wkt::write_to(f, self)
                }
            }
        )*
    };
}

geometry_conversions!(
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection
);

impl<S: ReferenceSystem> fmt::Display for Geometry<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        crate::wkt::write_to(f, self)
    }
}

impl<S: ReferenceSystem> FromStr for Geometry<S> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        crate::wkt::parse(s, None)
    }
}

#[cfg(test)]
fn polygon(offset: f64) -> Polygon {
    Polygon::builder()
        .ring(vec![
            (offset, offset),
            (offset + 1., offset),
            (offset + 1., offset + 1.),
            (offset, offset),
        ])
        .build()
        .unwrap()
}

#[test]
fn test_multipolygon_srid_cascade() {
    let mut multi = MultiPolygon::new(vec![polygon(0.), polygon(5.).with_srid(Some(2154))]).unwrap();
    assert_eq!(multi.srid(), None);
    assert!(multi.polygons().iter().all(|p| p.srid().is_none()));

    multi.set_srid(Some(4326));
    assert_eq!(multi.srid(), Some(4326));
    for polygon in multi.polygons() {
        assert_eq!(polygon.srid(), Some(4326));
        for ring in polygon.rings() {
            assert_eq!(ring.srid(), Some(4326));
            assert!(ring.points().iter().all(|p| p.srid() == Some(4326)));
        }
    }

    multi.add_polygon(polygon(10.).with_srid(Some(3857))).unwrap();
    assert_eq!(multi.polygon(-1).unwrap().srid(), Some(4326));
}

#[test]
fn test_multi_negative_index() {
    let multi = MultiPolygon::new(vec![polygon(0.), polygon(1.), polygon(2.)]).unwrap();
    assert_eq!(multi.polygon(-1).unwrap(), multi.polygon(2).unwrap());
    assert_eq!(multi.polygon(-2).unwrap(), multi.polygon(1).unwrap());
    assert_eq!(multi.polygon(-3).unwrap(), multi.polygon(0).unwrap());
    assert_eq!(multi.polygon(3).unwrap_err(), Error::IndexOutOfRange { index: 3, len: 3 });
    assert_eq!(multi.polygon(-4).unwrap_err(), Error::IndexOutOfRange { index: -4, len: 3 });
}

#[test]
fn test_multipoint_dimensions() {
    let mut points: MultiPoint = MultiPoint::new(vec![
        Point::new(0., 0.).unwrap(),
        Point::new(1., 1.).unwrap(),
    ])
    .unwrap();
    assert_eq!(
        points.add_point(Point::new_3d(2., 2., 2.).unwrap()).unwrap_err(),
        Error::Value(ValueError::MixedDimensions)
    );
    points.add_point(Point::new(2., 2.).unwrap()).unwrap();
    assert_eq!(points.len(), 3);
    assert_eq!(
        points.to_array(),
        Array::List(vec![
            Array::Coord(vec![0., 0.]),
            Array::Coord(vec![1., 1.]),
            Array::Coord(vec![2., 2.]),
        ])
    );

    let err = MultiPoint::<Planar>::new(vec![
        Point::new(0., 0.).unwrap(),
        Point::new_3d(1., 1., 1.).unwrap(),
    ])
    .unwrap_err();
    assert_eq!(err, Error::Value(ValueError::MixedDimensions));
}

#[test]
fn test_multilinestring_allows_empty_members() {
    let line: LineString = LineString::builder().point_3d(0., 0., 1.).point_3d(1., 1., 1.).build().unwrap();
    let multi = MultiLineString::new(vec![LineString::empty(), line]).unwrap();
    assert!(multi.has_z());
    assert_eq!(multi.line_string(0).unwrap().len(), 0);
}

#[test]
fn test_collection() {
    let point: Point = Point::new(1., 2.).unwrap();
    let inner = GeometryCollection::new(vec![Geometry::from(polygon(0.))]).unwrap();
    let mut collection = GeometryCollection::new(vec![point.into(), inner.into()]).unwrap();
    collection.set_srid(Some(4326));
    assert_eq!(collection.kind(), GeometryKind::GeometryCollection);
    assert_eq!(collection.geometry(0).unwrap().kind(), GeometryKind::Point);
    match collection.geometry(-1).unwrap() {
        Geometry::GeometryCollection(inner) => {
            assert_eq!(inner.srid(), Some(4326));
            assert_eq!(inner.geometry(0).unwrap().srid(), Some(4326));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_try_from() {
    let geom: Geometry = Point::new(1., 2.).unwrap().into();
    assert!(Point::try_from(geom.clone()).is_ok());
    assert_eq!(
        LineString::try_from(geom).unwrap_err(),
        Error::Value(ValueError::WrongKind {
            expected: GeometryKind::LineString,
            found: GeometryKind::Point,
        })
    );
}

#[test]
fn test_3d_collection_with_coordinate_free_members() {
    let point: Point = Point::new_3d(1., 2., 3.).unwrap();
    let lines: MultiLineString = MultiLineString::new(vec![LineString::empty()]).unwrap();
    assert!(!lines.is_empty());
    assert_eq!(lines.z_dimension(), None);

    let collection: GeometryCollection = GeometryCollection::new(vec![lines.clone().into(), point.into()]).unwrap();
    assert!(collection.has_z());

    let inner: GeometryCollection = GeometryCollection::new(vec![Geometry::from(LineString::empty())]).unwrap();
    let mut collection: GeometryCollection = GeometryCollection::new(vec![inner.into(), point.into()]).unwrap();
    assert!(collection.has_z());
    collection.add_geometry(lines.into()).unwrap();
    assert_eq!(
        collection.add_geometry(Point::new(0., 0.).unwrap().into()).unwrap_err(),
        Error::Value(ValueError::MixedDimensions)
    );

    let mut lines: MultiLineString = MultiLineString::new(vec![LineString::empty()]).unwrap();
    lines
        .add_line_string(LineString::builder().point_3d(0., 0., 0.).point_3d(1., 1., 1.).build().unwrap())
        .unwrap();
    assert!(lines.has_z());
}

#[test]
fn test_bulk_setters() {
    let mut multi = MultiPolygon::new(vec![polygon(0.)]).unwrap().with_srid(Some(4326));
    multi.set_polygons(vec![polygon(1.), polygon(2.).with_srid(Some(3857))]).unwrap();
    assert_eq!(multi.len(), 2);
    assert!(multi.polygons().iter().all(|p| p.srid() == Some(4326)));

    let mut points: MultiPoint = MultiPoint::new(vec![Point::new(0., 0.).unwrap()]).unwrap();
    let before = points.clone();
    assert_eq!(
        points
            .set_points(vec![Point::new(0., 0.).unwrap(), Point::new_3d(1., 1., 1.).unwrap()])
            .unwrap_err(),
        Error::Value(ValueError::MixedDimensions)
    );
    assert_eq!(points, before);

    let mut collection: GeometryCollection = GeometryCollection::empty();
    collection.set_geometries(vec![multi.into()]).unwrap();
    assert_eq!(collection.geometry(0).unwrap().srid(), None);

    let mut lines: MultiLineString = MultiLineString::empty();
    lines.set_line_strings(vec![LineString::empty()]).unwrap();
    assert_eq!(lines.len(), 1);
}
