//
// Copyright (c) Pirmin Kalberer. All rights reserved.
//

//! `FromSql`/`ToSql` for PostGIS `geometry` and `geography` columns.
//!
//! Values travel as EWKB. Writes are little endian and carry the SRID flag
//! when the value has an SRID.

use crate::collection::{
    Geometry, GeometryCollection, MultiLineString, MultiPoint, MultiPolygon,
};
use crate::ewkb::{Endian, EwkbRead, EwkbWrite, Flavor};
use crate::geometry::{LineString, Point, Polygon};
use crate::types::ReferenceSystem;
use bytes::{BufMut, BytesMut};
use postgres_types::{to_sql_checked, FromSql, IsNull, ToSql, Type};
use std::error::Error;

macro_rules! accepts_geography {
    () => {
        fn accepts(ty: &Type) -> bool {
            match ty.name() {
                "geography" => true,
                "geometry" => true,
                _ => false,
            }
        }
    };
}

macro_rules! impl_sql {
    ($($kind:ident),*) => {
        $(
            impl<'a, S: ReferenceSystem> FromSql<'a> for $kind<S> {
                fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, Box<dyn Error + Sync + Send>> {
                    <$kind<S> as EwkbRead>::read_ewkb(raw, Flavor::Extended).map_err(|err| {
                        log::debug!("rejected {} value from column of type {}", S::NAME, ty);
                        format!("cannot convert {} to {}: {}", ty, stringify!($kind), err).into()
                    })
                }

                accepts_geography!();
            }

            impl<S: ReferenceSystem> ToSql for $kind<S> {
                fn to_sql(&self, _: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
                    let mut writer = out.writer();
                    self.write_ewkb(&mut writer, Flavor::Extended, Endian::Little)?;
                    Ok(IsNull::No)
                }

                accepts_geography!();
                to_sql_checked!();
            }
        )*
    };
}

impl_sql!(
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
    Geometry
);

#[cfg(test)]
mod tests {
    use crate::ewkb::{to_hex, Endian, EwkbWrite, Flavor};
    use crate::types::{Geodetic, GeometryValue};
    use crate::{Geometry, LineString, Point};
    use bytes::BytesMut;
    use postgres_types::{FromSql, Kind, ToSql, Type};

    fn postgis_type(name: &str) -> Type {
        Type::new(name.to_string(), 0, Kind::Simple, "public".to_string())
    }

    #[test]
    fn test_accepts() {
        assert!(<Point as ToSql>::accepts(&postgis_type("geometry")));
        assert!(<Geometry<Geodetic> as FromSql>::accepts(&postgis_type("geography")));
        assert!(!<LineString as FromSql>::accepts(&Type::TEXT));
        assert!(!<Geometry as ToSql>::accepts(&Type::BYTEA));
    }

    #[test]
    fn test_to_sql() {
        let ty = postgis_type("geometry");
        let point: Point = Point::new(10.0, -20.0).unwrap().with_srid(Some(4326));
        let mut buf = BytesMut::new();
        point.to_sql_checked(&ty, &mut buf).unwrap();
        assert_eq!(to_hex(&buf), "0101000020E6100000000000000000244000000000000034C0");

        let geom: Geometry = "LINESTRING(10 -20,0 -0.5)".parse().unwrap();
        let mut buf = BytesMut::new();
        geom.to_sql(&ty, &mut buf).unwrap();
        assert_eq!(
            to_hex(&buf),
            "010200000002000000000000000000244000000000000034C00000000000000000000000000000E0BF"
        );

        assert!(point.to_sql_checked(&Type::TEXT, &mut BytesMut::new()).is_err());
    }

    #[test]
    fn test_from_sql() {
        let ty = postgis_type("geography");
        let line: LineString<Geodetic> = LineString::builder()
            .point(10.0, -20.0)
            .point(0., -0.5)
            .srid(Some(4326))
            .build()
            .unwrap();
        let raw = line.to_ewkb(Flavor::Extended, Endian::Big);

        let decoded = LineString::<Geodetic>::from_sql(&ty, &raw).unwrap();
        assert_eq!(decoded, line);
        let geom = Geometry::<Geodetic>::from_sql(&ty, &raw).unwrap();
        assert_eq!(geom.srid(), Some(4326));

        let err = Point::<Geodetic>::from_sql(&ty, &raw).unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot convert geography to Point: invalid geometry value: expected a Point, found a LineString"
        );
        assert!(Geometry::<Geodetic>::from_sql(&ty, &raw[..7]).is_err());
    }
}
