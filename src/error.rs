//
// Copyright (c) Pirmin Kalberer. All rights reserved.
//

//! Errors returned by constructors, accessors and codecs.

use crate::types::GeometryKind;
use thiserror::Error;

/// Crate-wide error.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// A structural invariant of a geometry value does not hold.
    #[error("invalid geometry value: {0}")]
    Value(#[from] ValueError),
    /// WKT input is malformed.
    #[error("WKT parse error at position {position}: {message}")]
    Parse { position: usize, message: String },
    /// WKB input is malformed.
    #[error("WKB decode error: {0}")]
    Decode(#[from] DecodeError),
    /// An element accessor was called with an index outside the element list.
    #[error("index {index} is out of range for {len} elements")]
    IndexOutOfRange { index: isize, len: usize },
}

/// Violated geometry invariant together with the offending input.
#[derive(Debug, Error, PartialEq)]
pub enum ValueError {
    #[error("coordinate ({x}, {y}{}) is not finite", optional_z(.z))]
    NonFinite { x: f64, y: f64, z: Option<f64> },
    #[error("coordinate ({x}, {y}) is outside the geodetic range")]
    OutOfRange { x: f64, y: f64 },
    #[error("ring is not closed: first point ({first_x} {first_y}) differs from last point ({last_x} {last_y})")]
    UnclosedRing {
        first_x: f64,
        first_y: f64,
        last_x: f64,
        last_y: f64,
    },
    #[error("{role} needs at least {required} points, got {found}")]
    TooFewPoints {
        role: &'static str,
        required: usize,
        found: usize,
    },
    #[error("cannot mix 2D and 3D coordinates in one geometry")]
    MixedDimensions,
    #[error("SRID {found:?} does not match expected SRID {expected:?}")]
    SridMismatch {
        expected: Option<u32>,
        found: Option<u32>,
    },
    #[error("an empty point cannot be represented")]
    EmptyPoint,
    #[error("expected a {expected}, found a {found}")]
    WrongKind {
        expected: GeometryKind,
        found: GeometryKind,
    },
}

/// Failure while reading a WKB buffer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("buffer truncated at offset {offset}: expected {expected} bytes, {available} available")]
    Truncated {
        offset: usize,
        expected: usize,
        available: usize,
    },
    #[error("unknown byte order marker {0:#04x}")]
    ByteOrder(u8),
    #[error("unknown geometry type code {0}")]
    UnknownType(u32),
    #[error("declared {declared} elements at offset {offset}, but only {available} bytes remain")]
    Count {
        offset: usize,
        declared: usize,
        available: usize,
    },
    #[error("{container} cannot contain a {found}")]
    UnexpectedElement {
        container: GeometryKind,
        found: GeometryKind,
    },
    #[error("{0} trailing bytes after geometry")]
    TrailingBytes(usize),
    #[error("geometries with an M coordinate are not supported")]
    Measured,
    #[error("geometry nesting exceeds {0} levels")]
    TooDeep(usize),
}

fn optional_z(z: &Option<f64>) -> String {
    match z {
        Some(z) => format!(", {}", z),
        None => String::new(),
    }
}

impl Error {
    pub(crate) fn parse<M: Into<String>>(position: usize, message: M) -> Error {
        Error::Parse {
            position,
            message: message.into(),
        }
    }
}

#[test]
fn test_error_messages() {
    let err = Error::from(ValueError::TooFewPoints {
        role: "line string",
        required: 2,
        found: 1,
    });
    insta::assert_snapshot!(err, @"invalid geometry value: line string needs at least 2 points, got 1");

    let err = Error::from(DecodeError::Truncated {
        offset: 9,
        expected: 8,
        available: 3,
    });
    insta::assert_snapshot!(err, @"WKB decode error: buffer truncated at offset 9: expected 8 bytes, 3 available");

    let err = Error::from(ValueError::NonFinite {
        x: 1.0,
        y: f64::INFINITY,
        z: None,
    });
    insta::assert_snapshot!(err, @"invalid geometry value: coordinate (1, inf) is not finite");

    let err = Error::IndexOutOfRange { index: -4, len: 3 };
    assert_eq!(err.to_string(), "index -4 is out of range for 3 elements");
}
