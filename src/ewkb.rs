//
// Copyright (c) Pirmin Kalberer. All rights reserved.
//

//! Read and write geometries as Well-Known Binary.
//!
//! Three flavors share one body encoding:
//!
//! - [`Flavor::Standard`]: OGC WKB. 3D geometries use the ISO type codes (`+1000`).
//! - [`Flavor::SridPrefixed`]: MySQL's internal format, a little-endian 4 byte
//!   SRID (0 for none) followed by standard WKB.
//! - [`Flavor::Extended`]: PostGIS EWKB, with SRID and Z carried as type flags.
//!
//! The reader accepts both Z conventions in every flavor. An SRID of 0 reads
//! back as unset. Nested EWKB headers may repeat the outer SRID; any other
//! SRID there is a [`ValueError::SridMismatch`](crate::ValueError::SridMismatch).
//!
//! ```rust
//! use spatial::ewkb::{self, Endian, EwkbWrite, Flavor};
//! use spatial::{Geometry, GeometryValue, Point};
//!
//! let point: Point = Point::new(10.0, -20.0).unwrap().with_srid(Some(4326));
//! assert_eq!(
//!     point.to_hex_ewkb(Flavor::Extended, Endian::Little),
//!     "0101000020E6100000000000000000244000000000000034C0"
//! );
//! let bytes = point.to_ewkb(Flavor::SridPrefixed, Endian::Big);
//! let geom: Geometry = ewkb::read(&bytes, Flavor::SridPrefixed).unwrap();
//! assert_eq!(geom.srid(), Some(4326));
//! ```

use crate::collection::{
    Geometry, GeometryCollection, MultiLineString, MultiPoint, MultiPolygon,
};
use crate::error::{DecodeError, Error, ValueError};
use crate::geometry::{LineString, Point, Polygon};
use crate::options::Limits;
use crate::types::{GeometryKind, GeometryValue, ReferenceSystem};
use byteorder::{BigEndian, LittleEndian, ReadBytesExt, WriteBytesExt};
use std::convert::TryFrom;
use std::io::{self, prelude::*, Cursor};

const EWKB_Z: u32 = 0x8000_0000;
const EWKB_M: u32 = 0x4000_0000;
const EWKB_SRID: u32 = 0x2000_0000;
const EWKB_FLAGS: u32 = EWKB_Z | EWKB_M | EWKB_SRID;

/// Byte order of a WKB value. The marker byte is `0` for big and `1` for little endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Big,
    Little,
}

impl Endian {
    fn marker(self) -> u8 {
        match self {
            Endian::Big => 0,
            Endian::Little => 1,
        }
    }

    fn from_marker(marker: u8) -> Result<Endian, DecodeError> {
        match marker {
            0 => Ok(Endian::Big),
            1 => Ok(Endian::Little),
            other => Err(DecodeError::ByteOrder(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    Standard,
    SridPrefixed,
    Extended,
}

// --- Writing

pub trait EwkbWrite: GeometryValue {
    #[doc(hidden)]
    fn write_ewkb_body<W: Write + ?Sized>(&self, w: &mut W, flavor: Flavor, endian: Endian) -> io::Result<()>;

    fn write_ewkb<W: Write + ?Sized>(&self, w: &mut W, flavor: Flavor, endian: Endian) -> io::Result<()> {
        let srid = match flavor {
            Flavor::Standard => None,
            Flavor::SridPrefixed => {
                w.write_u32::<LittleEndian>(self.srid().unwrap_or(0))?;
                None
            }
            Flavor::Extended => self.srid(),
        };
        write_header(w, self.kind(), self.has_z(), srid, flavor, endian)?;
        self.write_ewkb_body(w, flavor, endian)
    }

    fn to_ewkb(&self, flavor: Flavor, endian: Endian) -> Vec<u8> {
        let mut buf: Vec<u8> = Vec::new();
        // A Vec only rejects counts above u32::MAX, which could not have been allocated.
        let _ = self.write_ewkb(&mut buf, flavor, endian);
        buf
    }

    fn to_hex_ewkb(&self, flavor: Flavor, endian: Endian) -> String {
        to_hex(&self.to_ewkb(flavor, endian))
    }
}

/// Uppercase hex, as printed by PostGIS.
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |s, &b| s + &format!("{:02X}", b))
}

pub fn write<G: EwkbWrite + ?Sized>(geom: &G, flavor: Flavor, endian: Endian) -> Vec<u8> {
    geom.to_ewkb(flavor, endian)
}

fn type_code(kind: GeometryKind, has_z: bool, has_srid: bool, flavor: Flavor) -> u32 {
    let mut code = kind.wkb_code();
    if flavor == Flavor::Extended {
        if has_z {
            code |= EWKB_Z;
        }
        if has_srid {
            code |= EWKB_SRID;
        }
    } else if has_z {
        code += 1000;
    }
    code
}

fn write_header<W: Write + ?Sized>(
    w: &mut W,
    kind: GeometryKind,
    has_z: bool,
    srid: Option<u32>,
    flavor: Flavor,
    endian: Endian,
) -> io::Result<()> {
    w.write_u8(endian.marker())?;
    write_u32(w, type_code(kind, has_z, srid.is_some(), flavor), endian)?;
    if let Some(srid) = srid {
        write_u32(w, srid, endian)?;
    }
    Ok(())
}

fn write_u32<W: Write + ?Sized>(w: &mut W, value: u32, endian: Endian) -> io::Result<()> {
    match endian {
        Endian::Big => w.write_u32::<BigEndian>(value),
        Endian::Little => w.write_u32::<LittleEndian>(value),
    }
}

fn write_f64<W: Write + ?Sized>(w: &mut W, value: f64, endian: Endian) -> io::Result<()> {
    match endian {
        Endian::Big => w.write_f64::<BigEndian>(value),
        Endian::Little => w.write_f64::<LittleEndian>(value),
    }
}

fn write_count<W: Write + ?Sized>(w: &mut W, len: usize, endian: Endian) -> io::Result<()> {
    let count = u32::try_from(len)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "element count exceeds u32::MAX"))?;
    write_u32(w, count, endian)
}

fn write_points<W: Write + ?Sized, S: ReferenceSystem>(
    w: &mut W,
    points: &[Point<S>],
    endian: Endian,
) -> io::Result<()> {
    write_count(w, points.len(), endian)?;
    for point in points {
        write_coord(w, point, endian)?;
    }
    Ok(())
}

fn write_coord<W: Write + ?Sized, S: ReferenceSystem>(
    w: &mut W,
    point: &Point<S>,
    endian: Endian,
) -> io::Result<()> {
    write_f64(w, point.x(), endian)?;
    write_f64(w, point.y(), endian)?;
    if let Some(z) = point.z() {
        write_f64(w, z, endian)?;
    }
    Ok(())
}

/// Members of a multi geometry each carry their own header, without SRID.
fn write_members<W: Write + ?Sized, G: EwkbWrite>(
    w: &mut W,
    members: &[G],
    flavor: Flavor,
    endian: Endian,
) -> io::Result<()> {
    write_count(w, members.len(), endian)?;
    for member in members {
        write_header(w, member.kind(), member.has_z(), None, flavor, endian)?;
        member.write_ewkb_body(w, flavor, endian)?;
    }
    Ok(())
}

impl<S: ReferenceSystem> EwkbWrite for Point<S> {
    fn write_ewkb_body<W: Write + ?Sized>(&self, w: &mut W, _: Flavor, endian: Endian) -> io::Result<()> {
        write_coord(w, self, endian)
    }
}

impl<S: ReferenceSystem> EwkbWrite for LineString<S> {
    fn write_ewkb_body<W: Write + ?Sized>(&self, w: &mut W, _: Flavor, endian: Endian) -> io::Result<()> {
        write_points(w, self.points(), endian)
    }
}

impl<S: ReferenceSystem> EwkbWrite for Polygon<S> {
    fn write_ewkb_body<W: Write + ?Sized>(&self, w: &mut W, _: Flavor, endian: Endian) -> io::Result<()> {
        write_count(w, self.rings().len(), endian)?;
        for ring in self.rings() {
            write_points(w, ring.points(), endian)?;
        }
        Ok(())
    }
}

impl<S: ReferenceSystem> EwkbWrite for MultiPoint<S> {
    fn write_ewkb_body<W: Write + ?Sized>(&self, w: &mut W, flavor: Flavor, endian: Endian) -> io::Result<()> {
        write_members(w, self.points(), flavor, endian)
    }
}

impl<S: ReferenceSystem> EwkbWrite for MultiLineString<S> {
    fn write_ewkb_body<W: Write + ?Sized>(&self, w: &mut W, flavor: Flavor, endian: Endian) -> io::Result<()> {
        write_members(w, self.line_strings(), flavor, endian)
    }
}

impl<S: ReferenceSystem> EwkbWrite for MultiPolygon<S> {
    fn write_ewkb_body<W: Write + ?Sized>(&self, w: &mut W, flavor: Flavor, endian: Endian) -> io::Result<()> {
        write_members(w, self.polygons(), flavor, endian)
    }
}

impl<S: ReferenceSystem> EwkbWrite for GeometryCollection<S> {
    fn write_ewkb_body<W: Write + ?Sized>(&self, w: &mut W, flavor: Flavor, endian: Endian) -> io::Result<()> {
        write_members(w, self.geometries(), flavor, endian)
    }
}

impl<S: ReferenceSystem> EwkbWrite for Geometry<S> {
    fn write_ewkb_body<W: Write + ?Sized>(&self, w: &mut W, flavor: Flavor, endian: Endian) -> io::Result<()> {
        match self {
            Geometry::Point(g) => g.write_ewkb_body(w, flavor, endian),
            Geometry::LineString(g) => g.write_ewkb_body(w, flavor, endian),
            Geometry::Polygon(g) => g.write_ewkb_body(w, flavor, endian),
            Geometry::MultiPoint(g) => g.write_ewkb_body(w, flavor, endian),
            Geometry::MultiLineString(g) => g.write_ewkb_body(w, flavor, endian),
            Geometry::MultiPolygon(g) => g.write_ewkb_body(w, flavor, endian),
            Geometry::GeometryCollection(g) => g.write_ewkb_body(w, flavor, endian),
        }
    }
}

// --- Reading

/// Concrete geometry kinds readable from a WKB buffer.
pub trait EwkbRead: Sized {
    fn read_ewkb(raw: &[u8], flavor: Flavor) -> Result<Self, Error>;
}

impl<S: ReferenceSystem> EwkbRead for Geometry<S> {
    fn read_ewkb(raw: &[u8], flavor: Flavor) -> Result<Self, Error> {
        read(raw, flavor)
    }
}

macro_rules! ewkb_read_kind {
    ($($kind:ident),*) => {
        $(
            impl<S: ReferenceSystem> EwkbRead for $kind<S> {
                fn read_ewkb(raw: &[u8], flavor: Flavor) -> Result<Self, Error> {
                    $kind::try_from(read::<S>(raw, flavor)?)
                }
            }
        )*
    };
}

ewkb_read_kind!(
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection
);

pub fn read<S: ReferenceSystem>(raw: &[u8], flavor: Flavor) -> Result<Geometry<S>, Error> {
    read_with(raw, flavor, Limits::default())
}

/// Decodes exactly one geometry spanning the whole of `raw`.
pub fn read_with<S: ReferenceSystem>(raw: &[u8], flavor: Flavor, limits: Limits) -> Result<Geometry<S>, Error> {
    log::trace!("reading {} bytes of {:?} WKB", raw.len(), flavor);
    let result = WkbReader::new(raw, flavor, limits).read_document();
    if let Err(err) = &result {
        log::debug!("rejected WKB input: {}", err);
    }
    result
}

struct Header {
    kind: GeometryKind,
    endian: Endian,
    has_z: bool,
    srid: Option<u32>,
}

struct WkbReader<'a> {
    raw: Cursor<&'a [u8]>,
    flavor: Flavor,
    limits: Limits,
    /// SRID of the outermost header; nested headers may only repeat it.
    top_srid: Option<u32>,
}

impl<'a> WkbReader<'a> {
    fn new(raw: &'a [u8], flavor: Flavor, limits: Limits) -> Self {
        WkbReader {
            raw: Cursor::new(raw),
            flavor,
            limits,
            top_srid: None,
        }
    }

    fn read_document<S: ReferenceSystem>(&mut self) -> Result<Geometry<S>, Error> {
        let prefix = match self.flavor {
            Flavor::SridPrefixed => Some(self.read_u32(Endian::Little)?),
            _ => None,
        };
        let (geom, embedded) = self.geometry(1)?;
        let trailing = self.remaining();
        if trailing > 0 {
            return Err(DecodeError::TrailingBytes(trailing).into());
        }
        let srid = prefix.or(embedded).filter(|&srid| srid != 0);
        Ok(geom.with_srid(srid))
    }

    fn offset(&self) -> usize {
        self.raw.position() as usize
    }

    fn remaining(&self) -> usize {
        self.raw.get_ref().len().saturating_sub(self.offset())
    }

    fn ensure(&self, expected: usize) -> Result<(), DecodeError> {
        let available = self.remaining();
        if available < expected {
            return Err(DecodeError::Truncated {
                offset: self.offset(),
                expected,
                available,
            });
        }
        Ok(())
    }

    fn read_u8(&mut self) -> Result<u8, DecodeError> {
        self.ensure(1)?;
        let offset = self.offset();
        self.raw.read_u8().map_err(|_| truncated(offset, 1))
    }

    fn read_u32(&mut self, endian: Endian) -> Result<u32, DecodeError> {
        self.ensure(4)?;
        let offset = self.offset();
        let value = match endian {
            Endian::Big => self.raw.read_u32::<BigEndian>(),
            Endian::Little => self.raw.read_u32::<LittleEndian>(),
        };
        value.map_err(|_| truncated(offset, 4))
    }

    fn read_f64(&mut self, endian: Endian) -> Result<f64, DecodeError> {
        self.ensure(8)?;
        let offset = self.offset();
        let value = match endian {
            Endian::Big => self.raw.read_f64::<BigEndian>(),
            Endian::Little => self.raw.read_f64::<LittleEndian>(),
        };
        value.map_err(|_| truncated(offset, 8))
    }

    /// Reads an element count, rejecting counts the remaining bytes cannot hold.
    fn read_count(&mut self, endian: Endian, min_element_size: usize) -> Result<usize, DecodeError> {
        let offset = self.offset();
        let declared = self.read_u32(endian)? as usize;
        let available = self.remaining();
        if declared.saturating_mul(min_element_size) > available {
            return Err(DecodeError::Count {
                offset,
                declared,
                available,
            });
        }
        Ok(declared)
    }

    fn header(&mut self) -> Result<Header, DecodeError> {
        let endian = Endian::from_marker(self.read_u8()?)?;
        let code = self.read_u32(endian)?;
        let flags = if self.flavor == Flavor::Extended { code & EWKB_FLAGS } else { 0 };
        let base = code & !flags;
        if flags & EWKB_M != 0 {
            return Err(DecodeError::Measured);
        }
        let has_z = match base / 1000 {
            0 => flags & EWKB_Z != 0,
            1 => true,
            2 | 3 => return Err(DecodeError::Measured),
            _ => return Err(DecodeError::UnknownType(code)),
        };
        let kind = GeometryKind::from_wkb_code(base % 1000).ok_or(DecodeError::UnknownType(code))?;
        let srid = if flags & EWKB_SRID != 0 {
            Some(self.read_u32(endian)?)
        } else {
            None
        };
        Ok(Header {
            kind,
            endian,
            has_z,
            srid,
        })
    }

    /// Reads a full geometry, returning the SRID its header carried.
    fn geometry<S: ReferenceSystem>(&mut self, depth: usize) -> Result<(Geometry<S>, Option<u32>), Error> {
        if depth > self.limits.max_depth {
            return Err(DecodeError::TooDeep(self.limits.max_depth).into());
        }
        let header = self.header()?;
        if depth == 1 {
            self.top_srid = header.srid.filter(|&srid| srid != 0);
        } else {
            self.check_member_srid(&header)?;
        }
        let geom: Geometry<S> = match header.kind {
            GeometryKind::Point => Geometry::Point(self.point(&header)?),
            GeometryKind::LineString => Geometry::LineString(self.line_string(&header)?),
            GeometryKind::Polygon => Geometry::Polygon(self.polygon(&header)?),
            GeometryKind::MultiPoint => {
                let points = self.members(&header, GeometryKind::Point, 21, |r, h| r.point::<S>(h))?;
                Geometry::MultiPoint(MultiPoint::new(points)?)
            }
            GeometryKind::MultiLineString => {
                let lines =
                    self.members(&header, GeometryKind::LineString, 9, |r, h| r.line_string::<S>(h))?;
                Geometry::MultiLineString(MultiLineString::new(lines)?)
            }
            GeometryKind::MultiPolygon => {
                let polygons = self.members(&header, GeometryKind::Polygon, 9, |r, h| r.polygon::<S>(h))?;
                Geometry::MultiPolygon(MultiPolygon::new(polygons)?)
            }
            GeometryKind::GeometryCollection => {
                let count = self.read_count(header.endian, 9)?;
                let mut geometries = Vec::with_capacity(count);
                for _ in 0..count {
                    geometries.push(self.geometry(depth + 1)?.0);
                }
                Geometry::GeometryCollection(GeometryCollection::new(geometries)?)
            }
        };
        Ok((geom, header.srid))
    }

    fn members<T, F>(
        &mut self,
        container: &Header,
        kind: GeometryKind,
        min_size: usize,
        mut read_body: F,
    ) -> Result<Vec<T>, Error>
    where
        F: FnMut(&mut Self, &Header) -> Result<T, Error>,
    {
        let count = self.read_count(container.endian, min_size)?;
        let mut members = Vec::with_capacity(count);
        for _ in 0..count {
            let header = self.header()?;
            if header.kind != kind {
                return Err(DecodeError::UnexpectedElement {
                    container: container.kind,
                    found: header.kind,
                }
                .into());
            }
            self.check_member_srid(&header)?;
            members.push(read_body(self, &header)?);
        }
        Ok(members)
    }

    fn check_member_srid(&self, header: &Header) -> Result<(), ValueError> {
        match header.srid.filter(|&srid| srid != 0) {
            Some(found) if Some(found) != self.top_srid => Err(ValueError::SridMismatch {
                expected: self.top_srid,
                found: Some(found),
            }),
            _ => Ok(()),
        }
    }

    fn point<S: ReferenceSystem>(&mut self, header: &Header) -> Result<Point<S>, Error> {
        let x = self.read_f64(header.endian)?;
        let y = self.read_f64(header.endian)?;
        let z = if header.has_z {
            Some(self.read_f64(header.endian)?)
        } else {
            None
        };
        // POINT EMPTY is written as NaN coordinates.
        if x.is_nan() && y.is_nan() {
            return Err(ValueError::EmptyPoint.into());
        }
        Point::from_ordinates(x, y, z)
    }

    fn points<S: ReferenceSystem>(&mut self, header: &Header) -> Result<Vec<Point<S>>, Error> {
        let dims = if header.has_z { 3 } else { 2 };
        let count = self.read_count(header.endian, dims * 8)?;
        let mut points = Vec::with_capacity(count);
        for _ in 0..count {
            points.push(self.point(header)?);
        }
        Ok(points)
    }

    fn line_string<S: ReferenceSystem>(&mut self, header: &Header) -> Result<LineString<S>, Error> {
        LineString::new(self.points(header)?)
    }

    fn polygon<S: ReferenceSystem>(&mut self, header: &Header) -> Result<Polygon<S>, Error> {
        let count = self.read_count(header.endian, 4)?;
        let mut rings = Vec::with_capacity(count);
        for _ in 0..count {
            rings.push(LineString::new_ring(self.points(header)?)?);
        }
        Polygon::new(rings)
    }
}

fn truncated(offset: usize, expected: usize) -> DecodeError {
    DecodeError::Truncated {
        offset,
        expected,
        available: 0,
    }
}

#[cfg(test)]
use crate::types::Planar;

#[cfg(test)]
fn hex_to_vec(hexstr: &str) -> Vec<u8> {
    hexstr
        .as_bytes()
        .chunks(2)
        .map(|chars| {
            let digit = |c: u8| match c {
                b'0'..=b'9' => c - b'0',
                b'a'..=b'f' => c - b'a' + 10,
                _ => c - b'A' + 10,
            };
            digit(chars[0]) * 16 + digit(chars[1])
        })
        .collect::<Vec<_>>()
}

#[cfg(test)]
fn read_hex(hexstr: &str, flavor: Flavor) -> Result<Geometry, Error> {
    read::<Planar>(&hex_to_vec(hexstr), flavor)
}

#[test]
fn test_ewkb_write() {
    // 'POINT (10 -20)'
    let point: Point = Point::new(10.0, -20.0).unwrap();
    assert_eq!(
        point.to_hex_ewkb(Flavor::Extended, Endian::Little),
        "0101000000000000000000244000000000000034C0"
    );

    // 'SRID=4326;POINT (10 -20)'
    let point = point.with_srid(Some(4326));
    assert_eq!(
        point.to_hex_ewkb(Flavor::Extended, Endian::Little),
        "0101000020E6100000000000000000244000000000000034C0"
    );
    assert_eq!(
        point.to_hex_ewkb(Flavor::Standard, Endian::Little),
        "0101000000000000000000244000000000000034C0"
    );

    // 'LINESTRING (10 -20, -0 -0.5)'
    let line: LineString = LineString::builder().point(10.0, -20.0).point(0., -0.5).build().unwrap();
    assert_eq!(
        line.to_hex_ewkb(Flavor::Standard, Endian::Little),
        "010200000002000000000000000000244000000000000034C00000000000000000000000000000E0BF"
    );

    // 'SRID=4326;LINESTRING (10 -20, -0 -0.5)'
    let line = line.with_srid(Some(4326));
    assert_eq!(
        line.to_hex_ewkb(Flavor::Extended, Endian::Little),
        "0102000020E610000002000000000000000000244000000000000034C00000000000000000000000000000E0BF"
    );
}

#[test]
fn test_write_byte_orders() {
    let point: Point = Point::new(10.0, -20.0).unwrap();
    assert_eq!(
        point.to_hex_ewkb(Flavor::Standard, Endian::Big),
        "00000000014024000000000000C034000000000000"
    );

    let point = point.with_srid(Some(4326));
    assert_eq!(
        point.to_hex_ewkb(Flavor::SridPrefixed, Endian::Little),
        "E61000000101000000000000000000244000000000000034C0"
    );
    // The MySQL prefix stays little endian whatever the body order.
    assert_eq!(
        point.to_hex_ewkb(Flavor::SridPrefixed, Endian::Big),
        "E610000000000000014024000000000000C034000000000000"
    );
    assert_eq!(
        point.to_hex_ewkb(Flavor::Extended, Endian::Big),
        "0020000001000010E64024000000000000C034000000000000"
    );

    let unset: Point = Point::new(10.0, -20.0).unwrap();
    assert_eq!(
        unset.to_hex_ewkb(Flavor::SridPrefixed, Endian::Little),
        "000000000101000000000000000000244000000000000034C0"
    );
}

#[test]
fn test_write_z() {
    let point: Point = Point::new_3d(1.0, 2.0, 3.0).unwrap();
    assert_eq!(
        point.to_hex_ewkb(Flavor::Standard, Endian::Little),
        "01E9030000000000000000F03F00000000000000400000000000000840"
    );
    assert_eq!(
        point.to_hex_ewkb(Flavor::Extended, Endian::Little),
        "0101000080000000000000F03F00000000000000400000000000000840"
    );

    // Both conventions decode to the same value in every flavor.
    for hex in &[
        "01E9030000000000000000F03F00000000000000400000000000000840",
        "0101000080000000000000F03F00000000000000400000000000000840",
    ] {
        let geom = read_hex(hex, Flavor::Extended).unwrap();
        assert_eq!(geom, Geometry::Point(point));
    }
    assert_eq!(
        read_hex("01E9030000000000000000F03F00000000000000400000000000000840", Flavor::Standard).unwrap(),
        Geometry::Point(point)
    );
}

#[test]
fn test_ewkb_read() {
    // SELECT 'POINT(10 -20)'::geometry
    let ewkb = hex_to_vec("0101000000000000000000244000000000000034C0");
    assert_eq!(ewkb, &[1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 36, 64, 0, 0, 0, 0, 0, 0, 52, 192]);
    let point = Point::<Planar>::read_ewkb(&ewkb, Flavor::Extended).unwrap();
    assert_eq!((point.x(), point.y(), point.z()), (10.0, -20.0, None));
    assert_eq!(point.to_hex_ewkb(Flavor::Extended, Endian::Little), "0101000000000000000000244000000000000034C0");

    // SELECT 'SRID=4326;LINESTRING (10 -20, -0 -0.5)'::geometry
    let hex = "0102000020E610000002000000000000000000244000000000000034C00000000000000000000000000000E0BF";
    let line = LineString::<Planar>::read_ewkb(&hex_to_vec(hex), Flavor::Extended).unwrap();
    assert_eq!(line.srid(), Some(4326));
    assert_eq!(line.len(), 2);
    assert_eq!(line.to_hex_ewkb(Flavor::Extended, Endian::Little), hex);

    let err = LineString::<Planar>::read_ewkb(&ewkb, Flavor::Extended).unwrap_err();
    assert_eq!(
        err,
        Error::Value(ValueError::WrongKind {
            expected: GeometryKind::LineString,
            found: GeometryKind::Point,
        })
    );
}

#[test]
fn test_read_line_string() {
    let geom = read_hex(
        "010200000003000000\
         00000000000000000000000000000000\
         00000000000000400000000000000040\
         00000000000014400000000000001440",
        Flavor::Standard,
    )
    .unwrap();
    assert_eq!(geom.to_string(), "LINESTRING(0 0,2 2,5 5)");
    assert_eq!(geom.srid(), None);
}

#[test]
fn test_read_polygon() {
    let hex = "010300000002000000050000000000000000000000000000000000000000000000000000400000000000000000000000000000004000000000000000400000000000000000000000000000004000000000000000000000000000000000050000000000000000002440000000000000244000000000000000C0000000000000244000000000000000C000000000000000C0000000000000244000000000000000C000000000000024400000000000002440";
    let geom = read_hex(hex, Flavor::Standard).unwrap();
    assert_eq!(
        geom.to_string(),
        "POLYGON((0 0,2 0,2 2,0 2,0 0),(10 10,-2 10,-2 -2,10 -2,10 10))"
    );
    assert_eq!(to_hex(&write(&geom, Flavor::Standard, Endian::Little)), hex);
}

#[test]
fn test_read_multi() {
    let hex = "0104000000020000000101000000000000000000244000000000000034C001010000000000000000000000000000000000F0BF";
    let geom = read_hex(hex, Flavor::Standard).unwrap();
    assert_eq!(geom.to_string(), "MULTIPOINT(10 -20,0 -1)");
    assert_eq!(geom.to_hex_ewkb(Flavor::Standard, Endian::Little), hex);

    let hex = "010500000002000000010200000002000000000000000000244000000000000034C00000000000000000000000000000F0BF0102000000020000000000000000000000000000000000000000000000000000400000000000000000";
    let geom = read_hex(hex, Flavor::Standard).unwrap();
    assert_eq!(geom.to_string(), "MULTILINESTRING((10 -20,0 -1),(0 0,2 0))");
    assert_eq!(geom.to_hex_ewkb(Flavor::Standard, Endian::Little), hex);

    let hex = "010600000002000000010300000001000000050000000000000000000000000000000000000000000000000000400000000000000000000000000000004000000000000000400000000000000000000000000000004000000000000000000000000000000000010300000001000000050000000000000000002440000000000000244000000000000000C0000000000000244000000000000000C000000000000000C0000000000000244000000000000000C000000000000024400000000000002440";
    let geom = read_hex(hex, Flavor::Standard).unwrap();
    assert_eq!(
        geom.to_string(),
        "MULTIPOLYGON(((0 0,2 0,2 2,0 2,0 0)),((10 10,-2 10,-2 -2,10 -2,10 10)))"
    );
    assert_eq!(geom.to_hex_ewkb(Flavor::Standard, Endian::Little), hex);
}

#[test]
fn test_collection_round_trip() {
    let geom: Geometry = "GEOMETRYCOLLECTION(POINT(1 2),LINESTRING(0 0,1 1),GEOMETRYCOLLECTION EMPTY)"
        .parse()
        .unwrap();
    let geom = geom.with_srid(Some(3857));
    for &endian in &[Endian::Big, Endian::Little] {
        for &flavor in &[Flavor::SridPrefixed, Flavor::Extended] {
            let decoded: Geometry = read(&write(&geom, flavor, endian), flavor).unwrap();
            assert_eq!(decoded, geom);
        }
        let decoded: Geometry = read(&write(&geom, Flavor::Standard, endian), Flavor::Standard).unwrap();
        assert_eq!(decoded, geom.clone().with_srid(None));
    }
}

#[test]
fn test_read_srid_prefixed() {
    let geom = read_hex("E61000000101000000000000000000244000000000000034C0", Flavor::SridPrefixed).unwrap();
    assert_eq!(geom.srid(), Some(4326));
    assert_eq!(geom.to_string(), "POINT(10 -20)");

    let geom = read_hex("000000000101000000000000000000244000000000000034C0", Flavor::SridPrefixed).unwrap();
    assert_eq!(geom.srid(), None);
}

#[test]
fn test_read_errors() {
    assert_eq!(
        read_hex("0101000000000000000000244000000000", Flavor::Standard).unwrap_err(),
        Error::Decode(DecodeError::Truncated {
            offset: 13,
            expected: 8,
            available: 4
        })
    );
    assert_eq!(
        read_hex("", Flavor::Standard).unwrap_err(),
        Error::Decode(DecodeError::Truncated {
            offset: 0,
            expected: 1,
            available: 0
        })
    );
    assert_eq!(
        read_hex("0109000000", Flavor::Standard).unwrap_err(),
        Error::Decode(DecodeError::UnknownType(9))
    );
    assert_eq!(
        read_hex("0201000000", Flavor::Standard).unwrap_err(),
        Error::Decode(DecodeError::ByteOrder(2))
    );
    // The SRID flag is only meaningful in EWKB.
    assert_eq!(
        read_hex("0101000020E6100000000000000000244000000000000034C0", Flavor::Standard).unwrap_err(),
        Error::Decode(DecodeError::UnknownType(0x2000_0001))
    );
    assert_eq!(
        read_hex("0101000040000000000000F03F00000000000000400000000000000840", Flavor::Extended).unwrap_err(),
        Error::Decode(DecodeError::Measured)
    );
    assert_eq!(
        read_hex("01D1070000000000000000F03F00000000000000400000000000000840", Flavor::Standard).unwrap_err(),
        Error::Decode(DecodeError::Measured)
    );
    assert_eq!(
        read_hex("0101000000000000000000244000000000000034C000", Flavor::Standard).unwrap_err(),
        Error::Decode(DecodeError::TrailingBytes(1))
    );
    assert_eq!(
        read_hex(
            "01020000000500000000000000000000000000000000000000",
            Flavor::Standard
        )
        .unwrap_err(),
        Error::Decode(DecodeError::Count {
            offset: 5,
            declared: 5,
            available: 16
        })
    );
    assert_eq!(
        read_hex(
            "0105000000010000000101000000000000000000244000000000000034C0",
            Flavor::Standard
        )
        .unwrap_err(),
        Error::Decode(DecodeError::UnexpectedElement {
            container: GeometryKind::MultiLineString,
            found: GeometryKind::Point,
        })
    );
}

#[test]
fn test_read_invalid_values() {
    // LINESTRING with a single point
    assert_eq!(
        read_hex("0102000000010000000000000000000000000000000000F03F", Flavor::Standard).unwrap_err(),
        Error::Value(ValueError::TooFewPoints {
            role: "line string",
            required: 2,
            found: 1
        })
    );
    // POINT EMPTY as written by PostGIS
    assert_eq!(
        read_hex("0101000000000000000000F87F000000000000F87F", Flavor::Standard).unwrap_err(),
        Error::Value(ValueError::EmptyPoint)
    );
    // POINT(200 0) is out of range for geography
    let bytes = hex_to_vec("010100000000000000000069400000000000000000");
    assert!(read::<Planar>(&bytes, Flavor::Standard).is_ok());
    assert!(matches!(
        read::<crate::types::Geodetic>(&bytes, Flavor::Standard).unwrap_err(),
        Error::Value(ValueError::OutOfRange { .. })
    ));
}

#[cfg(test)]
fn nested(depth: usize) -> Geometry {
    let mut geom: Geometry = Point::new(1., 2.).unwrap().into();
    for _ in 1..depth {
        geom = GeometryCollection::new(vec![geom]).unwrap().into();
    }
    geom
}

#[test]
fn test_depth_limit() {
    let ok = write(&nested(64), Flavor::Standard, Endian::Little);
    assert_eq!(read::<Planar>(&ok, Flavor::Standard).unwrap(), nested(64));

    let deep = write(&nested(65), Flavor::Standard, Endian::Little);
    assert_eq!(
        read::<Planar>(&deep, Flavor::Standard).unwrap_err(),
        Error::Decode(DecodeError::TooDeep(64))
    );

    let limits = Limits::default().with_max_depth(2);
    assert!(read_with::<Planar>(&write(&nested(2), Flavor::Extended, Endian::Big), Flavor::Extended, limits).is_ok());
    assert_eq!(
        read_with::<Planar>(&write(&nested(3), Flavor::Extended, Endian::Big), Flavor::Extended, limits)
            .unwrap_err(),
        Error::Decode(DecodeError::TooDeep(2))
    );
}

#[test]
fn test_nested_srid() {
    // SRID=4326;GEOMETRYCOLLECTION(POINT(1 2)) with the point repeating the SRID
    let geom = read_hex(
        "0107000020E6100000010000000101000020E6100000000000000000F03F0000000000000040",
        Flavor::Extended,
    )
    .unwrap();
    assert_eq!(geom.srid(), Some(4326));
    assert_eq!(geom.to_string(), "GEOMETRYCOLLECTION(POINT(1 2))");

    // Point member tagged 3857 inside a 4326 collection
    assert_eq!(
        read_hex(
            "0107000020E6100000010000000101000020110F0000000000000000F03F0000000000000040",
            Flavor::Extended
        )
        .unwrap_err(),
        Error::Value(ValueError::SridMismatch {
            expected: Some(4326),
            found: Some(3857)
        })
    );
    // The same inside a MULTIPOINT
    assert_eq!(
        read_hex(
            "0104000020E6100000010000000101000020110F0000000000000000F03F0000000000000040",
            Flavor::Extended
        )
        .unwrap_err(),
        Error::Value(ValueError::SridMismatch {
            expected: Some(4326),
            found: Some(3857)
        })
    );
    // A member SRID under an outer value without one
    assert_eq!(
        read_hex(
            "0107000000010000000101000020E6100000000000000000F03F0000000000000040",
            Flavor::Extended
        )
        .unwrap_err(),
        Error::Value(ValueError::SridMismatch {
            expected: None,
            found: Some(4326)
        })
    );
}

#[test]
fn test_srid_zero_reads_as_unset() {
    let point: Point = Point::new(1.0, 2.0).unwrap().with_srid(Some(0));
    assert_eq!(point.srid(), Some(0));
    for &flavor in &[Flavor::SridPrefixed, Flavor::Extended] {
        let geom: Geometry = read(&point.to_ewkb(flavor, Endian::Little), flavor).unwrap();
        assert_eq!(geom.srid(), None);
    }
}

#[test]
fn test_empty_members_in_3d_collection() {
    let geom: Geometry = "GEOMETRYCOLLECTION(MULTILINESTRING(EMPTY),POINT Z(1 2 3))".parse().unwrap();
    assert!(geom.has_z());
    let geom = geom.with_srid(Some(4326));
    for &endian in &[Endian::Big, Endian::Little] {
        for &flavor in &[Flavor::SridPrefixed, Flavor::Extended] {
            let decoded: Geometry = read(&write(&geom, flavor, endian), flavor).unwrap();
            assert_eq!(decoded, geom);
        }
        let decoded: Geometry = read(&write(&geom, Flavor::Standard, endian), Flavor::Standard).unwrap();
        assert_eq!(decoded, geom.clone().with_srid(None));
    }
}
