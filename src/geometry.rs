//
// Copyright (c) Pirmin Kalberer. All rights reserved.
//

//! Point, LineString and Polygon values.

use crate::error::Error;
use crate::types::{resolve_index, Array, GeometryKind, GeometryValue, Planar, ReferenceSystem};
use crate::validate;
use std::fmt;
use std::marker::PhantomData;

/// A position with an optional Z ordinate.
#[derive(Clone, Copy, PartialEq)]
pub struct Point<S = Planar> {
    x: f64,
    y: f64,
    z: Option<f64>,
    srid: Option<u32>,
    system: PhantomData<S>,
}

impl<S: ReferenceSystem> Point<S> {
    pub fn new(x: f64, y: f64) -> Result<Self, Error> {
        Self::from_ordinates(x, y, None)
    }

    pub fn new_3d(x: f64, y: f64, z: f64) -> Result<Self, Error> {
        Self::from_ordinates(x, y, Some(z))
    }

    pub fn from_ordinates(x: f64, y: f64, z: Option<f64>) -> Result<Self, Error> {
        validate::check_coordinate::<S>(x, y, z)?;
        Ok(Point {
            x,
            y,
            z,
            srid: None,
            system: PhantomData,
        })
    }

    pub fn with_srid(mut self, srid: Option<u32>) -> Self {
        self.srid = srid;
        self
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn z(&self) -> Option<f64> {
        self.z
    }

    pub fn set_x(&mut self, x: f64) -> Result<(), Error> {
        validate::check_coordinate::<S>(x, self.y, self.z)?;
        self.x = x;
        Ok(())
    }

    pub fn set_y(&mut self, y: f64) -> Result<(), Error> {
        validate::check_coordinate::<S>(self.x, y, self.z)?;
        self.y = y;
        Ok(())
    }

    pub fn set_z(&mut self, z: Option<f64>) -> Result<(), Error> {
        validate::check_coordinate::<S>(self.x, self.y, z)?;
        self.z = z;
        Ok(())
    }

    /// Compares ordinates only, ignoring the SRID.
    pub fn same_position(&self, other: &Point<S>) -> bool {
        self.x == other.x && self.y == other.y && self.z == other.z
    }
}

impl<S: ReferenceSystem> GeometryValue for Point<S> {
    fn kind(&self) -> GeometryKind {
        GeometryKind::Point
    }

    fn srid(&self) -> Option<u32> {
        self.srid
    }

    fn set_srid(&mut self, srid: Option<u32>) {
        self.srid = srid;
    }

    fn to_array(&self) -> Array {
        let mut ordinates = vec![self.x, self.y];
        ordinates.extend(self.z);
        Array::Coord(ordinates)
    }

    fn z_dimension(&self) -> Option<bool> {
        Some(self.z.is_some())
    }

    fn is_empty(&self) -> bool {
        false
    }
}

impl<S> fmt::Debug for Point<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_struct("Point");
        dbg.field("x", &self.x).field("y", &self.y);
        if let Some(z) = self.z {
            dbg.field("z", &z);
        }
        dbg.field("srid", &self.srid).finish()
    }
}

/// Ordered sequence of points; empty or at least two points long.
#[derive(Debug, Clone, PartialEq)]
pub struct LineString<S = Planar> {
    points: Vec<Point<S>>,
    srid: Option<u32>,
}

impl<S: ReferenceSystem> LineString<S> {
    /// Takes ownership of `points`; their SRIDs are replaced by the line's.
    pub fn new(points: Vec<Point<S>>) -> Result<Self, Error> {
        validate::check_line(&points)?;
        let mut line = LineString { points, srid: None };
        line.set_srid(None);
        Ok(line)
    }

    pub fn empty() -> Self {
        LineString {
            points: Vec::new(),
            srid: None,
        }
    }

    pub fn builder() -> LineStringBuilder<S> {
        LineStringBuilder::default()
    }

    pub fn with_srid(mut self, srid: Option<u32>) -> Self {
        self.set_srid(srid);
        self
    }

    pub fn points(&self) -> &[Point<S>] {
        &self.points
    }

    /// Point at `index`; `-1` is the last point.
    pub fn point(&self, index: isize) -> Result<&Point<S>, Error> {
        let index = resolve_index(index, self.points.len())?;
        Ok(&self.points[index])
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// First and last positions are equal.
    pub fn is_closed(&self) -> bool {
        validate::is_closed_ring(&self.points)
    }

    /// Appends a point. An empty line cannot grow one point at a time; build
    /// it with [`LineString::new`] or [`LineString::builder`] instead.
    pub fn add_point(&mut self, point: Point<S>) -> Result<(), Error> {
        let mut candidate = Vec::with_capacity(2);
        candidate.extend(self.points.last().copied());
        candidate.push(point);
        validate::check_line(&candidate)?;
        self.points.push(point.with_srid(self.srid));
        Ok(())
    }

    /// Replaces all points, validated like [`LineString::new`]. The line is
    /// unchanged on error.
    pub fn set_points(&mut self, points: Vec<Point<S>>) -> Result<(), Error> {
        *self = LineString::new(points)?.with_srid(self.srid);
        Ok(())
    }

    /// Builds a polygon ring: closed, at least four points.
    pub fn new_ring(points: Vec<Point<S>>) -> Result<Self, Error> {
        validate::check_ring(&points)?;
        let mut ring = LineString { points, srid: None };
        ring.set_srid(None);
        Ok(ring)
    }

    pub(crate) fn check_as_ring(&self) -> Result<(), Error> {
        Ok(validate::check_ring(&self.points)?)
    }
}

impl LineString<Planar> {
    /// Euclidean length in coordinate units, XY only.
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| (pair[1].x - pair[0].x).hypot(pair[1].y - pair[0].y))
            .sum()
    }
}

impl<S: ReferenceSystem> GeometryValue for LineString<S> {
    fn kind(&self) -> GeometryKind {
        GeometryKind::LineString
    }

    fn srid(&self) -> Option<u32> {
        self.srid
    }

    fn set_srid(&mut self, srid: Option<u32>) {
        self.srid = srid;
        for point in &mut self.points {
            point.set_srid(srid);
        }
    }

    fn to_array(&self) -> Array {
        Array::List(self.points.iter().map(GeometryValue::to_array).collect())
    }

    fn z_dimension(&self) -> Option<bool> {
        self.points.first().map(|p| p.z.is_some())
    }

    fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Exterior ring followed by interior rings (holes).
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon<S = Planar> {
    rings: Vec<LineString<S>>,
    srid: Option<u32>,
}

impl<S: ReferenceSystem> Polygon<S> {
    pub fn new(rings: Vec<LineString<S>>) -> Result<Self, Error> {
        for ring in &rings {
            ring.check_as_ring()?;
        }
        validate::check_same_dimension(rings.iter().filter_map(GeometryValue::z_dimension))?;
        let mut polygon = Polygon { rings, srid: None };
        polygon.set_srid(None);
        Ok(polygon)
    }

    pub fn empty() -> Self {
        Polygon {
            rings: Vec::new(),
            srid: None,
        }
    }

    pub fn builder() -> PolygonBuilder<S> {
        PolygonBuilder::default()
    }

    pub fn with_srid(mut self, srid: Option<u32>) -> Self {
        self.set_srid(srid);
        self
    }

    pub fn rings(&self) -> &[LineString<S>] {
        &self.rings
    }

    /// Ring at `index`; `0` is the exterior, `-1` the last ring.
    pub fn ring(&self, index: isize) -> Result<&LineString<S>, Error> {
        let index = resolve_index(index, self.rings.len())?;
        Ok(&self.rings[index])
    }

    pub fn exterior(&self) -> Option<&LineString<S>> {
        self.rings.first()
    }

    pub fn interiors(&self) -> &[LineString<S>] {
        self.rings.get(1..).unwrap_or(&[])
    }

    pub fn add_ring(&mut self, ring: LineString<S>) -> Result<(), Error> {
        ring.check_as_ring()?;
        validate::check_same_dimension(self.z_dimension().into_iter().chain(ring.z_dimension()))?;
        self.rings.push(ring.with_srid(self.srid));
        Ok(())
    }

    /// Replaces all rings, validated like [`Polygon::new`].
    pub fn set_rings(&mut self, rings: Vec<LineString<S>>) -> Result<(), Error> {
        *self = Polygon::new(rings)?.with_srid(self.srid);
        Ok(())
    }
}

impl Polygon<Planar> {
    /// Sum of the lengths of all rings.
    pub fn perimeter(&self) -> f64 {
        self.rings.iter().map(LineString::length).sum()
    }
}

impl<S: ReferenceSystem> GeometryValue for Polygon<S> {
    fn kind(&self) -> GeometryKind {
        GeometryKind::Polygon
    }

    fn srid(&self) -> Option<u32> {
        self.srid
    }

    fn set_srid(&mut self, srid: Option<u32>) {
        self.srid = srid;
        for ring in &mut self.rings {
            ring.set_srid(srid);
        }
    }

    fn to_array(&self) -> Array {
        Array::List(self.rings.iter().map(GeometryValue::to_array).collect())
    }

    fn z_dimension(&self) -> Option<bool> {
        self.rings.first().and_then(GeometryValue::z_dimension)
    }

    fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }
}

type Ordinates = (f64, f64, Option<f64>);

fn build_points<S: ReferenceSystem>(coords: Vec<Ordinates>) -> Result<Vec<Point<S>>, Error> {
    coords
        .into_iter()
        .map(|(x, y, z)| Point::from_ordinates(x, y, z))
        .collect()
}

/// Collects raw coordinates and validates them once in [`LineStringBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct LineStringBuilder<S = Planar> {
    coords: Vec<Ordinates>,
    srid: Option<u32>,
    system: PhantomData<S>,
}

impl<S: ReferenceSystem> LineStringBuilder<S> {
    pub fn point(mut self, x: f64, y: f64) -> Self {
        self.coords.push((x, y, None));
        self
    }

    pub fn point_3d(mut self, x: f64, y: f64, z: f64) -> Self {
        self.coords.push((x, y, Some(z)));
        self
    }

    pub fn srid(mut self, srid: Option<u32>) -> Self {
        self.srid = srid;
        self
    }

    pub fn build(self) -> Result<LineString<S>, Error> {
        Ok(LineString::new(build_points(self.coords)?)?.with_srid(self.srid))
    }
}

/// Collects rings as raw coordinates and validates them once in [`PolygonBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct PolygonBuilder<S = Planar> {
    rings: Vec<Vec<Ordinates>>,
    srid: Option<u32>,
    system: PhantomData<S>,
}

impl<S: ReferenceSystem> PolygonBuilder<S> {
    pub fn ring<I: IntoIterator<Item = (f64, f64)>>(mut self, coords: I) -> Self {
        self.rings
            .push(coords.into_iter().map(|(x, y)| (x, y, None)).collect());
        self
    }

    pub fn ring_3d<I: IntoIterator<Item = (f64, f64, f64)>>(mut self, coords: I) -> Self {
        self.rings
            .push(coords.into_iter().map(|(x, y, z)| (x, y, Some(z))).collect());
        self
    }

    pub fn srid(mut self, srid: Option<u32>) -> Self {
        self.srid = srid;
        self
    }

    pub fn build(self) -> Result<Polygon<S>, Error> {
        let rings = self
            .rings
            .into_iter()
            .map(|coords| LineString::new_ring(build_points(coords)?))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Polygon::new(rings)?.with_srid(self.srid))
    }
}

#[cfg(test)]
use crate::error::ValueError;
#[cfg(test)]
use crate::types::Geodetic;

#[cfg(test)]
fn square(size: f64) -> Vec<(f64, f64)> {
    vec![(0., 0.), (size, 0.), (size, size), (0., size), (0., 0.)]
}

#[test]
fn test_point() {
    let mut point: Point = Point::new(1.0, 2.0).unwrap();
    assert_eq!((point.x(), point.y(), point.z(), point.srid()), (1.0, 2.0, None, None));
    assert_eq!(point.to_array(), Array::Coord(vec![1.0, 2.0]));
    assert!(point.set_y(f64::NAN).is_err());
    assert_eq!(point.y(), 2.0);
    point.set_z(Some(3.0)).unwrap();
    assert!(point.has_z());
    assert_eq!(point.to_array(), Array::Coord(vec![1.0, 2.0, 3.0]));

    let err = Point::<Planar>::new(f64::INFINITY, 0.0).unwrap_err();
    assert_eq!(
        err,
        Error::Value(ValueError::NonFinite { x: f64::INFINITY, y: 0.0, z: None })
    );
    assert!(Point::<Planar>::new_3d(0.0, 0.0, f64::NAN).is_err());
}

#[test]
fn test_geodetic_point() {
    assert!(Point::<Geodetic>::new(-73.99, 40.73).is_ok());
    assert_eq!(
        Point::<Geodetic>::new(200.0, 40.0).unwrap_err(),
        Error::Value(ValueError::OutOfRange { x: 200.0, y: 40.0 })
    );
    let mut point = Point::<Geodetic>::new(10.0, 10.0).unwrap();
    assert!(point.set_y(91.0).is_err());
}

#[test]
fn test_line_minimum_vertices() {
    let p = |x, y| Point::<Planar>::new(x, y).unwrap();
    assert!(LineString::<Planar>::new(vec![]).is_ok());
    assert!(LineString::new(vec![p(0., 0.), p(1., 1.)]).is_ok());
    assert_eq!(
        LineString::new(vec![p(0., 0.)]).unwrap_err(),
        Error::Value(ValueError::TooFewPoints { role: "line string", required: 2, found: 1 })
    );
}

#[test]
fn test_line_accessors() {
    let line: LineString = LineString::builder()
        .point(0., 0.)
        .point(1., 1.)
        .point(2., 2.)
        .srid(Some(4326))
        .build()
        .unwrap();
    assert_eq!(line.len(), 3);
    assert_eq!(line.point(-1).unwrap(), line.point(2).unwrap());
    assert_eq!(line.point(-3).unwrap().x(), 0.);
    assert_eq!(line.point(3).unwrap_err(), Error::IndexOutOfRange { index: 3, len: 3 });
    assert_eq!(line.point(-4).unwrap_err(), Error::IndexOutOfRange { index: -4, len: 3 });
    assert!(line.points().iter().all(|p| p.srid() == Some(4326)));
    assert!(!line.is_closed());
    assert!((line.length() - 2.0 * 2f64.sqrt()).abs() < 1e-12);
}

#[test]
fn test_line_add_point() {
    let mut line: LineString = LineString::empty();
    assert!(line.add_point(Point::new(0., 0.).unwrap()).is_err());
    assert!(line.is_empty());

    let mut line: LineString = LineString::builder().point(0., 0.).point(1., 0.).build().unwrap();
    line.set_srid(Some(3857));
    line.add_point(Point::new(1., 1.).unwrap().with_srid(Some(4326))).unwrap();
    assert_eq!(line.point(-1).unwrap().srid(), Some(3857));
    assert_eq!(
        line.add_point(Point::new_3d(2., 2., 2.).unwrap()).unwrap_err(),
        Error::Value(ValueError::MixedDimensions)
    );
    assert_eq!(line.len(), 3);
}

#[test]
fn test_polygon_rings() {
    let polygon: Polygon = Polygon::builder()
        .ring(square(10.))
        .ring(vec![(1., 1.), (2., 1.), (2., 2.), (1., 1.)])
        .ring(vec![(5., 5.), (7., 5.), (7., 7.), (5., 7.), (5., 5.)])
        .build()
        .unwrap();
    assert_eq!(polygon.rings().len(), 3);
    assert_eq!(polygon.ring(-1).unwrap(), polygon.ring(2).unwrap());
    assert_eq!(polygon.ring(-2).unwrap(), polygon.ring(1).unwrap());
    assert_eq!(polygon.ring(-3).unwrap(), polygon.exterior().unwrap());
    assert_eq!(polygon.ring(-4).unwrap_err(), Error::IndexOutOfRange { index: -4, len: 3 });
    assert_eq!(polygon.interiors().len(), 2);
    assert!((polygon.perimeter() - (40. + 2. + 2f64.sqrt() + 8.)).abs() < 1e-12);
}

#[test]
fn test_polygon_invariants() {
    let err = Polygon::<Planar>::builder()
        .ring(vec![(0., 0.), (1., 0.), (1., 1.)])
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::Value(ValueError::UnclosedRing { .. })));

    let err = Polygon::<Planar>::builder()
        .ring(vec![(0., 0.), (1., 0.), (0., 0.)])
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::Value(ValueError::TooFewPoints { required: 4, .. })));

    let mut polygon: Polygon = Polygon::empty();
    assert!(polygon.exterior().is_none());
    assert!(polygon.interiors().is_empty());
    let open: LineString = LineString::builder().point(0., 0.).point(1., 1.).build().unwrap();
    assert!(polygon.add_ring(open).is_err());
    assert!(polygon.is_empty());
}

#[test]
fn test_polygon_srid_cascade() {
    let mut polygon: Polygon = Polygon::builder().ring(square(1.)).build().unwrap();
    polygon.set_srid(Some(4326));
    let ring: LineString = LineString::builder()
        .point(0.2, 0.2)
        .point(0.4, 0.2)
        .point(0.4, 0.4)
        .point(0.2, 0.2)
        .build()
        .unwrap();
    polygon.add_ring(ring).unwrap();
    for ring in polygon.rings() {
        assert_eq!(ring.srid(), Some(4326));
        assert!(ring.points().iter().all(|p| p.srid() == Some(4326)));
    }
}

#[test]
fn test_bulk_setters() {
    let mut line: LineString = LineString::builder().point(0., 0.).point(1., 1.).srid(Some(4326)).build().unwrap();
    let before = line.clone();
    assert!(matches!(
        line.set_points(vec![Point::new(5., 5.).unwrap()]),
        Err(Error::Value(ValueError::TooFewPoints { found: 1, .. }))
    ));
    assert_eq!(line, before);
    line.set_points(vec![Point::new(2., 2.).unwrap(), Point::new(3., 3.).unwrap()]).unwrap();
    assert_eq!(line.len(), 2);
    assert!(line.points().iter().all(|p| p.srid() == Some(4326)));

    let mut polygon: Polygon = Polygon::builder().ring(square(1.)).srid(Some(3857)).build().unwrap();
    let before = polygon.clone();
    let open: LineString = LineString::builder().point(0., 0.).point(1., 1.).build().unwrap();
    assert!(polygon.set_rings(vec![open]).is_err());
    assert_eq!(polygon, before);

    let hole: Polygon = Polygon::builder().ring(square(10.)).ring(square(2.)).build().unwrap();
    polygon.set_rings(hole.rings().to_vec()).unwrap();
    assert_eq!(polygon.rings().len(), 2);
    assert_eq!(polygon.srid(), Some(3857));
    assert_eq!(polygon.ring(-1).unwrap().srid(), Some(3857));
}
