//
// Copyright (c) Pirmin Kalberer. All rights reserved.
//

//! Structural checks run by every constructor and mutator.
//!
//! The `is_*`/`has_*` predicates are pure; the `check_*` functions wrap them and
//! report the violated invariant together with the offending input.

use crate::error::ValueError;
use crate::geometry::Point;
use crate::types::ReferenceSystem;

/// What a point sequence is used as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Free-standing line: empty, or at least 2 points.
    LineString,
    /// Polygon boundary: closed with at least 4 points.
    Ring,
}

impl Role {
    pub fn min_points(self) -> usize {
        match self {
            Role::LineString => 2,
            Role::Ring => 4,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Role::LineString => "line string",
            Role::Ring => "polygon ring",
        }
    }
}

pub fn is_finite_coordinate(x: f64, y: f64, z: Option<f64>) -> bool {
    x.is_finite() && y.is_finite() && z.map_or(true, f64::is_finite)
}

/// First and last positions are equal, compared exactly.
pub fn is_closed_ring<S: ReferenceSystem>(points: &[Point<S>]) -> bool {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) => first.same_position(last),
        _ => false,
    }
}

pub fn has_minimum_vertices<S: ReferenceSystem>(points: &[Point<S>], role: Role) -> bool {
    match role {
        Role::LineString => points.is_empty() || points.len() >= role.min_points(),
        Role::Ring => points.len() >= role.min_points(),
    }
}

pub(crate) fn check_coordinate<S: ReferenceSystem>(
    x: f64,
    y: f64,
    z: Option<f64>,
) -> Result<(), ValueError> {
    if !is_finite_coordinate(x, y, z) {
        return Err(ValueError::NonFinite { x, y, z });
    }
    S::check_coordinate(x, y)
}

pub(crate) fn check_line<S: ReferenceSystem>(points: &[Point<S>]) -> Result<(), ValueError> {
    if !has_minimum_vertices(points, Role::LineString) {
        return Err(too_few(Role::LineString, points.len()));
    }
    check_same_dimension(points.iter().map(|p| p.z().is_some()))
}

pub(crate) fn check_ring<S: ReferenceSystem>(points: &[Point<S>]) -> Result<(), ValueError> {
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        if !is_closed_ring(points) {
            return Err(ValueError::UnclosedRing {
                first_x: first.x(),
                first_y: first.y(),
                last_x: last.x(),
                last_y: last.y(),
            });
        }
    }
    if !has_minimum_vertices(points, Role::Ring) {
        return Err(too_few(Role::Ring, points.len()));
    }
    check_same_dimension(points.iter().map(|p| p.z().is_some()))
}

/// All non-empty members agree on having a Z ordinate.
pub(crate) fn check_same_dimension<I: IntoIterator<Item = bool>>(dims: I) -> Result<(), ValueError> {
    let mut dims = dims.into_iter();
    match dims.next() {
        Some(first) if dims.any(|d| d != first) => Err(ValueError::MixedDimensions),
        _ => Ok(()),
    }
}

fn too_few(role: Role, found: usize) -> ValueError {
    ValueError::TooFewPoints {
        role: role.name(),
        required: role.min_points(),
        found,
    }
}

#[cfg(test)]
fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
    coords.iter().map(|&(x, y)| Point::new(x, y).unwrap()).collect()
}

#[test]
fn test_finite() {
    assert!(is_finite_coordinate(1.0, -2.5, None));
    assert!(is_finite_coordinate(1.0, -2.5, Some(0.0)));
    assert!(!is_finite_coordinate(f64::NAN, 0.0, None));
    assert!(!is_finite_coordinate(0.0, f64::NEG_INFINITY, None));
    assert!(!is_finite_coordinate(0.0, 0.0, Some(f64::INFINITY)));
}

#[test]
fn test_closed_ring() {
    assert!(is_closed_ring(&pts(&[(0., 0.), (1., 0.), (1., 1.), (0., 0.)])));
    assert!(!is_closed_ring(&pts(&[(0., 0.), (1., 0.), (1., 1.)])));
    assert!(!is_closed_ring(&pts(&[(0., 0.), (1., 0.), (0., 1e-12)])));
    assert!(!is_closed_ring::<crate::types::Planar>(&[]));
}

#[test]
fn test_minimum_vertices() {
    assert!(has_minimum_vertices::<crate::types::Planar>(&[], Role::LineString));
    assert!(!has_minimum_vertices(&pts(&[(0., 0.)]), Role::LineString));
    assert!(has_minimum_vertices(&pts(&[(0., 0.), (1., 1.)]), Role::LineString));
    assert!(!has_minimum_vertices(&pts(&[(0., 0.), (1., 1.), (0., 0.)]), Role::Ring));
    assert!(!has_minimum_vertices::<crate::types::Planar>(&[], Role::Ring));
}

#[test]
fn test_check_ring_reports_first_violation() {
    let err = check_ring(&pts(&[(0., 0.), (1., 0.), (1., 1.)])).unwrap_err();
    assert_eq!(
        err,
        ValueError::UnclosedRing {
            first_x: 0.,
            first_y: 0.,
            last_x: 1.,
            last_y: 1.
        }
    );
    let err = check_ring(&pts(&[(0., 0.), (1., 0.), (0., 0.)])).unwrap_err();
    assert_eq!(
        err,
        ValueError::TooFewPoints {
            role: "polygon ring",
            required: 4,
            found: 3
        }
    );
}

#[test]
fn test_same_dimension() {
    assert!(check_same_dimension(Vec::<bool>::new()).is_ok());
    assert!(check_same_dimension(vec![true, true]).is_ok());
    assert_eq!(check_same_dimension(vec![false, true]), Err(ValueError::MixedDimensions));

    let mixed: Vec<Point> = vec![Point::new(0., 0.).unwrap(), Point::new_3d(1., 1., 1.).unwrap()];
    assert_eq!(check_line(&mixed), Err(ValueError::MixedDimensions));
}
