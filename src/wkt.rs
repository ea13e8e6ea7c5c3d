//
// Copyright (c) Pirmin Kalberer. All rights reserved.
//

//! Read and write geometries as Well-Known Text.
//!
//! ```rust
//! use spatial::{wkt, Geometry, GeometryValue};
//!
//! let line: Geometry = wkt::parse("SRID=4326;linestring(0 0, 1 1)", None).unwrap();
//! assert_eq!(line.srid(), Some(4326));
//! assert_eq!(wkt::write(&line), "LINESTRING(0 0,1 1)");
//! assert_eq!(wkt::write_ewkt(&line), "SRID=4326;LINESTRING(0 0,1 1)");
//! ```

use crate::collection::{
    Geometry, GeometryCollection, MultiLineString, MultiPoint, MultiPolygon,
};
use crate::error::{Error, ValueError};
use crate::geometry::{LineString, Point, Polygon};
use crate::options::Limits;
use crate::types::{GeometryKind, GeometryValue, ReferenceSystem};
use std::fmt::{self, Write};

// --- Writing

/// Geometries that know how to print their parenthesised WKT body.
pub trait ToWkt: GeometryValue {
    #[doc(hidden)]
    fn write_body<W: Write>(&self, out: &mut W) -> fmt::Result;
}

/// Writes `geom` as canonical WKT: uppercase keyword, no SRID prefix.
pub fn write_to<W: Write, G: ToWkt + ?Sized>(out: &mut W, geom: &G) -> fmt::Result {
    out.write_str(geom.kind().keyword())?;
    if geom.is_empty() {
        return out.write_str(" EMPTY");
    }
    if geom.has_z() {
        out.write_str(" Z")?;
    }
    out.write_char('(')?;
    geom.write_body(out)?;
    out.write_char(')')
}

pub fn write<G: ToWkt + ?Sized>(geom: &G) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_to(&mut out, geom);
    out
}

/// Like [`write`], prefixed with `SRID=<id>;` when the geometry has an SRID.
pub fn write_ewkt<G: ToWkt + ?Sized>(geom: &G) -> String {
    let wkt = write(geom);
    match geom.srid() {
        Some(srid) => format!("SRID={};{}", srid, wkt),
        None => wkt,
    }
}

fn write_coord<W: Write, S>(out: &mut W, point: &Point<S>) -> fmt::Result
where
    S: ReferenceSystem,
{
    write_ordinate(out, point.x())?;
    out.write_char(' ')?;
    write_ordinate(out, point.y())?;
    if let Some(z) = point.z() {
        out.write_char(' ')?;
        write_ordinate(out, z)?;
    }
    Ok(())
}

/// Shortest decimal form, switching to an exponent below 1e-6 and from 1e21 on.
fn write_ordinate<W: Write>(out: &mut W, value: f64) -> fmt::Result {
    let magnitude = value.abs();
    if magnitude >= 1e21 || (magnitude != 0.0 && magnitude < 1e-6) {
        write!(out, "{:e}", value)
    } else {
        write!(out, "{}", value)
    }
}

fn write_coords<W: Write, S: ReferenceSystem>(out: &mut W, points: &[Point<S>]) -> fmt::Result {
    for (i, point) in points.iter().enumerate() {
        if i > 0 {
            out.write_char(',')?;
        }
        write_coord(out, point)?;
    }
    Ok(())
}

/// Writes `(body)` for each element, or `EMPTY` for empty ones.
fn write_members<W: Write, G: ToWkt>(out: &mut W, members: &[G]) -> fmt::Result {
    for (i, member) in members.iter().enumerate() {
        if i > 0 {
            out.write_char(',')?;
        }
        if member.is_empty() {
            out.write_str("EMPTY")?;
        } else {
            out.write_char('(')?;
            member.write_body(out)?;
            out.write_char(')')?;
        }
    }
    Ok(())
}

impl<S: ReferenceSystem> ToWkt for Point<S> {
    fn write_body<W: Write>(&self, out: &mut W) -> fmt::Result {
        write_coord(out, self)
    }
}

impl<S: ReferenceSystem> ToWkt for LineString<S> {
    fn write_body<W: Write>(&self, out: &mut W) -> fmt::Result {
        write_coords(out, self.points())
    }
}

impl<S: ReferenceSystem> ToWkt for Polygon<S> {
    fn write_body<W: Write>(&self, out: &mut W) -> fmt::Result {
        write_members(out, self.rings())
    }
}

impl<S: ReferenceSystem> ToWkt for MultiPoint<S> {
    fn write_body<W: Write>(&self, out: &mut W) -> fmt::Result {
        write_coords(out, self.points())
    }
}

impl<S: ReferenceSystem> ToWkt for MultiLineString<S> {
    fn write_body<W: Write>(&self, out: &mut W) -> fmt::Result {
        write_members(out, self.line_strings())
    }
}

impl<S: ReferenceSystem> ToWkt for MultiPolygon<S> {
    fn write_body<W: Write>(&self, out: &mut W) -> fmt::Result {
        write_members(out, self.polygons())
    }
}

impl<S: ReferenceSystem> ToWkt for GeometryCollection<S> {
    fn write_body<W: Write>(&self, out: &mut W) -> fmt::Result {
        for (i, geom) in self.geometries().iter().enumerate() {
            if i > 0 {
                out.write_char(',')?;
            }
            write_to(out, geom)?;
        }
        Ok(())
    }
}

impl<S: ReferenceSystem> ToWkt for Geometry<S> {
    fn write_body<W: Write>(&self, out: &mut W) -> fmt::Result {
        match self {
            Geometry::Point(g) => g.write_body(out),
            Geometry::LineString(g) => g.write_body(out),
            Geometry::Polygon(g) => g.write_body(out),
            Geometry::MultiPoint(g) => g.write_body(out),
            Geometry::MultiLineString(g) => g.write_body(out),
            Geometry::MultiPolygon(g) => g.write_body(out),
            Geometry::GeometryCollection(g) => g.write_body(out),
        }
    }
}

// --- Reading

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token<'a> {
    Word(&'a str),
    Number(&'a str),
    LParen,
    RParen,
    Comma,
    Semicolon,
    Equals,
    End,
}

impl<'a> fmt::Display for Token<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Word(w) => write!(f, "`{}`", w),
            Token::Number(n) => write!(f, "number `{}`", n),
            Token::LParen => f.write_str("`(`"),
            Token::RParen => f.write_str("`)`"),
            Token::Comma => f.write_str("`,`"),
            Token::Semicolon => f.write_str("`;`"),
            Token::Equals => f.write_str("`=`"),
            Token::End => f.write_str("end of input"),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<(usize, Token)>, Error> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        let start = pos;
        let token = match bytes[pos] {
            b if b.is_ascii_whitespace() => {
                pos += 1;
                continue;
            }
            b'(' => Token::LParen,
            b')' => Token::RParen,
            b',' => Token::Comma,
            b';' => Token::Semicolon,
            b'=' => Token::Equals,
            b if b.is_ascii_alphabetic() => {
                while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_') {
                    pos += 1;
                }
                tokens.push((start, Token::Word(&input[start..pos])));
                continue;
            }
            b if b.is_ascii_digit() || b == b'-' || b == b'+' || b == b'.' => {
                while pos < bytes.len()
                    && matches!(bytes[pos], b'0'..=b'9' | b'-' | b'+' | b'.' | b'e' | b'E')
                {
                    pos += 1;
                }
                tokens.push((start, Token::Number(&input[start..pos])));
                continue;
            }
            _ => {
                let found = input[start..].chars().next().unwrap_or_default();
                return Err(Error::parse(start, format!("unexpected character `{}`", found)));
            }
        };
        tokens.push((start, token));
        pos += 1;
    }
    tokens.push((input.len(), Token::End));
    Ok(tokens)
}

/// WKT reader with configurable [`Limits`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser {
    limits: Limits,
}

impl Parser {
    pub fn new() -> Self {
        Parser::default()
    }

    pub fn with_limits(limits: Limits) -> Self {
        Parser { limits }
    }

    /// Parses `input`, which may start with `SRID=<id>;`. An explicit `srid`
    /// must agree with an embedded one.
    pub fn parse<S: ReferenceSystem>(&self, input: &str, srid: Option<u32>) -> Result<Geometry<S>, Error> {
        log::trace!("parsing {} bytes of WKT", input.len());
        let result = self.parse_document(input, srid);
        if let Err(err) = &result {
            log::debug!("rejected WKT input: {}", err);
        }
        result
    }

    fn parse_document<S: ReferenceSystem>(&self, input: &str, srid: Option<u32>) -> Result<Geometry<S>, Error> {
        let mut cursor = Cursor {
            tokens: tokenize(input)?,
            index: 0,
            limits: self.limits,
        };
        let embedded = cursor.srid_prefix()?;
        let srid = match (srid, embedded) {
            (Some(expected), Some(found)) if expected != found => {
                return Err(ValueError::SridMismatch {
                    expected: Some(expected),
                    found: Some(found),
                }
                .into())
            }
            (srid, embedded) => srid.or(embedded),
        };
        let geom = cursor.geometry(1)?;
        match cursor.next() {
            (_, Token::End) => Ok(geom.with_srid(srid)),
            (pos, token) => Err(Error::parse(pos, format!("unexpected {} after geometry", token))),
        }
    }
}

/// Parses WKT with default limits.
pub fn parse<S: ReferenceSystem>(input: &str, srid: Option<u32>) -> Result<Geometry<S>, Error> {
    Parser::default().parse(input, srid)
}

struct Cursor<'a> {
    tokens: Vec<(usize, Token<'a>)>,
    index: usize,
    limits: Limits,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> (usize, Token<'a>) {
        self.tokens[self.index.min(self.tokens.len() - 1)]
    }

    fn next(&mut self) -> (usize, Token<'a>) {
        let token = self.peek();
        if token.1 != Token::End {
            self.index += 1;
        }
        token
    }

    fn expect(&mut self, expected: Token) -> Result<(), Error> {
        match self.next() {
            (_, token) if token == expected => Ok(()),
            (pos, token) => Err(Error::parse(pos, format!("expected {}, found {}", expected, token))),
        }
    }

    fn peek_word(&self, word: &str) -> bool {
        matches!(self.peek().1, Token::Word(w) if w.eq_ignore_ascii_case(word))
    }

    fn srid_prefix(&mut self) -> Result<Option<u32>, Error> {
        let is_prefix = self.peek_word("SRID")
            && self.tokens.get(self.index + 1).map(|t| t.1) == Some(Token::Equals);
        if !is_prefix {
            return Ok(None);
        }
        self.index += 2;
        let srid = match self.next() {
            (pos, Token::Number(n)) => n
                .parse::<u32>()
                .map_err(|_| Error::parse(pos, format!("invalid SRID `{}`", n)))?,
            (pos, token) => return Err(Error::parse(pos, format!("expected SRID, found {}", token))),
        };
        self.expect(Token::Semicolon)?;
        Ok(Some(srid))
    }

    /// Consumes an optional `Z` tag, then `EMPTY`. Returns (has_z, is_empty).
    fn tags(&mut self) -> Result<(bool, bool), Error> {
        let mut has_z = false;
        if let (pos, Token::Word(w)) = self.peek() {
            if w.eq_ignore_ascii_case("Z") {
                has_z = true;
                self.index += 1;
            } else if w.eq_ignore_ascii_case("M") || w.eq_ignore_ascii_case("ZM") {
                return Err(Error::parse(pos, "M coordinates are not supported"));
            }
        }
        let is_empty = self.peek_word("EMPTY");
        if is_empty {
            self.index += 1;
        }
        Ok((has_z, is_empty))
    }

    fn geometry<S: ReferenceSystem>(&mut self, depth: usize) -> Result<Geometry<S>, Error> {
        let (pos, token) = self.next();
        if depth > self.limits.max_depth {
            return Err(Error::parse(
                pos,
                format!("geometry nesting exceeds {} levels", self.limits.max_depth),
            ));
        }
        let kind = match token {
            Token::Word(w) => GeometryKind::from_keyword(w)
                .ok_or_else(|| Error::parse(pos, format!("unknown geometry type `{}`", w)))?,
            token => return Err(Error::parse(pos, format!("expected geometry type, found {}", token))),
        };
        let (has_z, is_empty) = self.tags()?;
        if is_empty {
            return empty(kind);
        }
        self.expect(Token::LParen)?;
        let geom = match kind {
            GeometryKind::Point => Geometry::Point(self.coordinate(has_z)?),
            GeometryKind::LineString => Geometry::LineString(LineString::new(self.coordinates(has_z)?)?),
            GeometryKind::Polygon => Geometry::Polygon(self.polygon_body(has_z)?),
            GeometryKind::MultiPoint => Geometry::MultiPoint(MultiPoint::new(self.list(|c| c.multi_point_member(has_z))?)?),
            GeometryKind::MultiLineString => Geometry::MultiLineString(MultiLineString::new(self.list(|c| {
                c.member(|c| Ok(LineString::new(c.coordinates(has_z)?)?), LineString::empty)
            })?)?),
            GeometryKind::MultiPolygon => Geometry::MultiPolygon(MultiPolygon::new(
                self.list(|c| c.member(|c| c.polygon_body(has_z), Polygon::empty))?,
            )?),
            GeometryKind::GeometryCollection => Geometry::GeometryCollection(GeometryCollection::new(
                self.list(|c| c.geometry(depth + 1))?,
            )?),
        };
        self.expect(Token::RParen)?;
        Ok(geom)
    }

    /// Comma separated items, at least one.
    fn list<T, F>(&mut self, mut item: F) -> Result<Vec<T>, Error>
    where
        F: FnMut(&mut Self) -> Result<T, Error>,
    {
        let mut items = vec![item(self)?];
        while self.peek().1 == Token::Comma {
            self.index += 1;
            items.push(item(self)?);
        }
        Ok(items)
    }

    /// `EMPTY` or a parenthesised body.
    fn member<T, F, E>(&mut self, body: F, empty: E) -> Result<T, Error>
    where
        F: FnOnce(&mut Self) -> Result<T, Error>,
        E: FnOnce() -> T,
    {
        if self.peek_word("EMPTY") {
            self.index += 1;
            return Ok(empty());
        }
        self.expect(Token::LParen)?;
        let value = body(self)?;
        self.expect(Token::RParen)?;
        Ok(value)
    }

    fn polygon_body<S: ReferenceSystem>(&mut self, has_z: bool) -> Result<Polygon<S>, Error> {
        let rings = self.list(|c| {
            c.expect(Token::LParen)?;
            let ring = LineString::new_ring(c.coordinates(has_z)?)?;
            c.expect(Token::RParen)?;
            Ok(ring)
        })?;
        Polygon::new(rings)
    }

    fn multi_point_member<S: ReferenceSystem>(&mut self, has_z: bool) -> Result<Point<S>, Error> {
        match self.peek().1 {
            Token::LParen => {
                self.index += 1;
                let point = self.coordinate(has_z)?;
                self.expect(Token::RParen)?;
                Ok(point)
            }
            Token::Word(w) if w.eq_ignore_ascii_case("EMPTY") => Err(ValueError::EmptyPoint.into()),
            _ => self.coordinate(has_z),
        }
    }

    fn coordinates<S: ReferenceSystem>(&mut self, has_z: bool) -> Result<Vec<Point<S>>, Error> {
        self.list(|c| c.coordinate(has_z))
    }

    fn coordinate<S: ReferenceSystem>(&mut self, has_z: bool) -> Result<Point<S>, Error> {
        let x = self.number()?;
        let y = self.number()?;
        let z = match self.peek().1 {
            Token::Number(_) => Some(self.number()?),
            _ => None,
        };
        match self.peek() {
            (pos, Token::Number(_)) => return Err(Error::parse(pos, "too many ordinates in coordinate")),
            (pos, _) if has_z && z.is_none() => return Err(Error::parse(pos, "expected Z ordinate")),
            _ => {}
        }
        Point::from_ordinates(x, y, z)
    }

    fn number(&mut self) -> Result<f64, Error> {
        match self.next() {
            (pos, Token::Number(n)) => n
                .parse::<f64>()
                .map_err(|_| Error::parse(pos, format!("invalid number `{}`", n))),
            (pos, token) => Err(Error::parse(pos, format!("expected number, found {}", token))),
        }
    }
}

fn empty<S: ReferenceSystem>(kind: GeometryKind) -> Result<Geometry<S>, Error> {
    let geom = match kind {
        GeometryKind::Point => return Err(ValueError::EmptyPoint.into()),
        GeometryKind::LineString => Geometry::LineString(LineString::empty()),
        GeometryKind::Polygon => Geometry::Polygon(Polygon::empty()),
        GeometryKind::MultiPoint => Geometry::MultiPoint(MultiPoint::empty()),
        GeometryKind::MultiLineString => Geometry::MultiLineString(MultiLineString::empty()),
        GeometryKind::MultiPolygon => Geometry::MultiPolygon(MultiPolygon::empty()),
        GeometryKind::GeometryCollection => Geometry::GeometryCollection(GeometryCollection::empty()),
    };
    Ok(geom)
}

#[cfg(test)]
use crate::types::Planar;

#[cfg(test)]
fn read(input: &str) -> Result<Geometry, Error> {
    parse::<Planar>(input, None)
}

#[test]
fn test_read_point() {
    let geom = read("POINT(1 2)").unwrap();
    let point = match &geom {
        Geometry::Point(p) => p,
        other => panic!("unexpected {:?}", other),
    };
    assert_eq!((point.x(), point.y(), point.z()), (1.0, 2.0, None));
    assert_eq!(geom.srid(), None);

    let geom = read("  point z ( -1.5   2e3 .25 ) ").unwrap();
    assert_eq!(write(&geom), "POINT Z(-1.5 2000 0.25)");
}

#[test]
fn test_roundtrip_canonical() {
    for wkt in &[
        "POINT(1 2)",
        "LINESTRING(0 0,1 1,2 2,3 3)",
        "LINESTRING EMPTY",
        "POLYGON((0 0,10 0,10 10,0 10,0 0),(5 5,7 5,7 7,5 7,5 5))",
        "POLYGON EMPTY",
        "MULTIPOINT(0 0,1 1)",
        "MULTILINESTRING((0 0,1 1),EMPTY,(2 2,3 3))",
        "MULTIPOLYGON(((0 0,1 0,1 1,0 0)),((5 5,6 5,6 6,5 5)))",
        "GEOMETRYCOLLECTION(POINT(1 2),LINESTRING(0 0,1 1),GEOMETRYCOLLECTION EMPTY)",
        "LINESTRING Z(0 0 1,1 1 2)",
        "POINT(0.1 -0)",
        "POINT(1.5 0.000001)",
        "POINT(1e300 5e-324)",
        "POINT(-1.5e-7 1e21)",
    ] {
        assert_eq!(write(&read(wkt).unwrap()), *wkt);
    }
}

#[test]
fn test_read_variants() {
    let geom = read("MULTIPOINT((0 0), (1 1))").unwrap();
    assert_eq!(write(&geom), "MULTIPOINT(0 0,1 1)");

    let geom = read("GeometryCollection ( Point (1 2) , LineString(0 0 , 1 1) )").unwrap();
    assert_eq!(write(&geom), "GEOMETRYCOLLECTION(POINT(1 2),LINESTRING(0 0,1 1))");

    let geom = read("LINESTRING(0 0 0, 1 1 1)").unwrap();
    assert_eq!(write(&geom), "LINESTRING Z(0 0 0,1 1 1)");

    let geom = read("POLYGON((0 0,10 0,10 10,0 10,0 0))").unwrap();
    match geom {
        Geometry::Polygon(p) => {
            assert_eq!(p.rings().len(), 1);
            assert_eq!(p.ring(0).unwrap().len(), 5);
            assert_eq!(p.perimeter(), 40.0);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_srid_prefix() {
    let geom = read("SRID=4326;POINT(1 2)").unwrap();
    assert_eq!(geom.srid(), Some(4326));
    assert_eq!(write(&geom), "POINT(1 2)");
    assert_eq!(write_ewkt(&geom), "SRID=4326;POINT(1 2)");

    let geom: Geometry = parse("POINT(1 2)", Some(3857)).unwrap();
    assert_eq!(geom.srid(), Some(3857));
    let geom: Geometry = parse("srid=3857; POINT(1 2)", Some(3857)).unwrap();
    assert_eq!(geom.srid(), Some(3857));

    let err = parse::<Planar>("SRID=4326;POINT(1 2)", Some(3857)).unwrap_err();
    assert_eq!(
        err,
        Error::Value(ValueError::SridMismatch { expected: Some(3857), found: Some(4326) })
    );
    assert!(matches!(read("SRID=-1;POINT(1 2)"), Err(Error::Parse { position: 5, .. })));
}

#[test]
fn test_invalid_values() {
    assert!(matches!(
        read("POLYGON((0 0,1 0,1 1))"),
        Err(Error::Value(ValueError::UnclosedRing { .. }))
    ));
    assert!(matches!(
        read("LINESTRING(0 0)"),
        Err(Error::Value(ValueError::TooFewPoints { found: 1, .. }))
    ));
    assert!(matches!(read("POINT(1e999 0)"), Err(Error::Value(ValueError::NonFinite { .. }))));
    assert_eq!(read("POINT EMPTY").unwrap_err(), Error::Value(ValueError::EmptyPoint));
    assert_eq!(
        read("LINESTRING(0 0,1 1 1)").unwrap_err(),
        Error::Value(ValueError::MixedDimensions)
    );
}

#[test]
fn test_syntax_errors() {
    let err = read("CIRCLE(0 0)").unwrap_err();
    insta::assert_snapshot!(err, @"WKT parse error at position 0: unknown geometry type `CIRCLE`");

    let err = read("POINT(1 2").unwrap_err();
    insta::assert_snapshot!(err, @"WKT parse error at position 9: expected `)`, found end of input");

    let err = read("POINT(1 x)").unwrap_err();
    insta::assert_snapshot!(err, @"WKT parse error at position 8: expected number, found `x`");

    let err = read("POINT(1 2))").unwrap_err();
    insta::assert_snapshot!(err, @"WKT parse error at position 10: unexpected `)` after geometry");

    let err = read("POINT Z(1 2)").unwrap_err();
    insta::assert_snapshot!(err, @"WKT parse error at position 11: expected Z ordinate");

    let err = read("POINT(1 2 3 4)").unwrap_err();
    insta::assert_snapshot!(err, @"WKT parse error at position 12: too many ordinates in coordinate");

    let err = read("POINT M(1 2 3)").unwrap_err();
    insta::assert_snapshot!(err, @"WKT parse error at position 6: M coordinates are not supported");

    let err = read("POINT(1 2) # comment").unwrap_err();
    insta::assert_snapshot!(err, @"WKT parse error at position 11: unexpected character `#`");

    assert!(matches!(read("POINT(--1 2)"), Err(Error::Parse { position: 6, .. })));
    assert!(matches!(read("LINESTRING()"), Err(Error::Parse { position: 11, .. })));
    assert!(matches!(read(""), Err(Error::Parse { position: 0, .. })));
}

#[test]
fn test_depth_limit() {
    let nested = |levels: usize| {
        let mut wkt = "GEOMETRYCOLLECTION(".repeat(levels - 1);
        wkt.push_str("POINT(1 2)");
        wkt.push_str(&")".repeat(levels - 1));
        wkt
    };
    assert!(read(&nested(64)).is_ok());
    let err = read(&nested(65)).unwrap_err();
    match err {
        Error::Parse { message, .. } => assert_eq!(message, "geometry nesting exceeds 64 levels"),
        other => panic!("unexpected {:?}", other),
    }

    let parser = Parser::with_limits(Limits::default().with_max_depth(2));
    assert!(parser.parse::<Planar>(&nested(2), None).is_ok());
    assert!(parser.parse::<Planar>(&nested(3), None).is_err());
}

#[test]
fn test_display_and_from_str() {
    let geom: Geometry = "MULTIPOINT(1 2,3 4)".parse().unwrap();
    assert_eq!(geom.to_string(), "MULTIPOINT(1 2,3 4)");
    let point: Point = Point::new(10.0, -20.0).unwrap();
    assert_eq!(point.to_string(), "POINT(10 -20)");
}

#[test]
fn test_extreme_ordinates() {
    let point: Point = Point::new(1e300, -2.5e-9).unwrap();
    assert_eq!(write(&point), "POINT(1e300 -2.5e-9)");
    let point: Point = Point::new(123456789012345680000.0, 0.0000015).unwrap();
    assert_eq!(write(&point), "POINT(123456789012345680000 0.0000015)");

    let geom = read("LINESTRING Z(1E21 0 -0.0000001,0 1e-320 2)").unwrap();
    assert_eq!(write(&geom), "LINESTRING Z(1e21 0 -1e-7,0 1e-320 2)");
}

#[test]
fn test_3d_collection_with_coordinate_free_members() {
    let geom = read("GEOMETRYCOLLECTION(MULTILINESTRING(EMPTY),POINT Z(1 2 3))").unwrap();
    assert!(geom.has_z());
    let text = write(&geom);
    assert_eq!(text, "GEOMETRYCOLLECTION Z(MULTILINESTRING(EMPTY),POINT Z(1 2 3))");
    assert_eq!(read(&text).unwrap(), geom);

    let geom = read("GEOMETRYCOLLECTION(GEOMETRYCOLLECTION(LINESTRING EMPTY),POLYGON Z((0 0 1,1 0 1,1 1 1,0 0 1)))").unwrap();
    assert_eq!(read(&write(&geom)).unwrap(), geom);

    let geom = read("MULTIPOLYGON Z(EMPTY,((0 0 1,1 0 1,1 1 1,0 0 1)))").unwrap();
    assert_eq!(write(&geom), "MULTIPOLYGON Z(EMPTY,((0 0 1,1 0 1,1 1 1,0 0 1)))");
}
