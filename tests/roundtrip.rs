use proptest::prelude::*;
use spatial::ewkb::{self, Flavor};
use spatial::{
    Endian, Geometry, GeometryCollection, GeometryValue, LineString, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon,
};

fn ordinate() -> impl Strategy<Value = f64> {
    -1.0e9..1.0e9f64
}

fn point(has_z: bool) -> BoxedStrategy<Point> {
    if has_z {
        (ordinate(), ordinate(), ordinate())
            .prop_map(|(x, y, z)| Point::new_3d(x, y, z).unwrap())
            .boxed()
    } else {
        (ordinate(), ordinate())
            .prop_map(|(x, y)| Point::new(x, y).unwrap())
            .boxed()
    }
}

fn line_string(has_z: bool) -> BoxedStrategy<LineString> {
    prop::collection::vec(point(has_z), 2..6)
        .prop_map(|points| LineString::new(points).unwrap())
        .boxed()
}

fn ring(has_z: bool) -> BoxedStrategy<LineString> {
    prop::collection::vec(point(has_z), 3..6)
        .prop_map(|mut points| {
            points.push(points[0]);
            LineString::new_ring(points).unwrap()
        })
        .boxed()
}

fn polygon(has_z: bool) -> BoxedStrategy<Polygon> {
    prop::collection::vec(ring(has_z), 1..3)
        .prop_map(|rings| Polygon::new(rings).unwrap())
        .boxed()
}

fn simple(has_z: bool) -> BoxedStrategy<Geometry> {
    prop_oneof![
        point(has_z).prop_map(Geometry::from),
        line_string(has_z).prop_map(Geometry::from),
        polygon(has_z).prop_map(Geometry::from),
        prop::collection::vec(point(has_z), 0..4)
            .prop_map(|points| Geometry::from(MultiPoint::new(points).unwrap())),
        prop::collection::vec(line_string(has_z), 0..3)
            .prop_map(|lines| Geometry::from(MultiLineString::new(lines).unwrap())),
        prop::collection::vec(polygon(has_z), 0..3)
            .prop_map(|polygons| Geometry::from(MultiPolygon::new(polygons).unwrap())),
    ]
    .boxed()
}

fn geometry() -> impl Strategy<Value = Geometry> {
    any::<bool>().prop_flat_map(|has_z| {
        simple(has_z).prop_recursive(3, 16, 4, |inner| {
            prop::collection::vec(inner, 0..4)
                .prop_map(|geometries| Geometry::from(GeometryCollection::new(geometries).unwrap()))
        })
    })
}

proptest! {
    #[test]
    fn text_round_trip(geom in geometry()) {
        let text = spatial::write_text(&geom);
        let parsed: Geometry = spatial::parse_text(&text, None).unwrap();
        prop_assert_eq!(parsed, geom);
    }

    #[test]
    fn text_round_trip_with_srid(geom in geometry(), srid in 1..100_000u32) {
        let geom = geom.with_srid(Some(srid));
        let parsed: Geometry = spatial::parse_text(&spatial::wkt::write_ewkt(&geom), None).unwrap();
        prop_assert_eq!(parsed.srid(), Some(srid));
        prop_assert_eq!(&parsed, &geom);

        let parsed: Geometry = spatial::parse_text(&spatial::write_text(&geom), Some(srid)).unwrap();
        prop_assert_eq!(parsed, geom);
    }

    #[test]
    fn binary_round_trip(geom in geometry(), srid in proptest::option::of(1..100_000u32)) {
        let geom = geom.with_srid(srid);
        for &order in &[Endian::Big, Endian::Little] {
            let bytes = spatial::write_binary(&geom, true, order);
            let decoded: Geometry = spatial::parse_binary(&bytes, true).unwrap();
            prop_assert_eq!(&decoded, &geom);

            let bytes = spatial::write_binary(&geom, false, order);
            let decoded: Geometry = spatial::parse_binary(&bytes, false).unwrap();
            prop_assert_eq!(decoded, geom.clone().with_srid(None));

            let bytes = ewkb::write(&geom, Flavor::Extended, order);
            let decoded: Geometry = ewkb::read(&bytes, Flavor::Extended).unwrap();
            prop_assert_eq!(&decoded, &geom);
        }
    }

    #[test]
    fn truncated_binary_is_rejected(geom in geometry(), cut in any::<prop::sample::Index>()) {
        let bytes = spatial::write_binary(&geom, false, Endian::Little);
        let len = cut.index(bytes.len());
        prop_assert!(spatial::parse_binary::<spatial::Planar>(&bytes[..len], false).is_err());
    }
}

#[test]
fn parse_point() {
    let geom: Geometry = spatial::parse_text("POINT(1 2)", None).unwrap();
    match geom {
        Geometry::Point(point) => {
            assert_eq!((point.x(), point.y(), point.z()), (1.0, 2.0, None));
            assert_eq!(point.srid(), None);
        }
        other => panic!("expected a point, got {:?}", other),
    }
}

#[test]
fn write_line_string() {
    let geom: Geometry = spatial::parse_text("LINESTRING(0 0,1 1,2 2,3 3)", None).unwrap();
    assert_eq!(spatial::write_text(&geom), "LINESTRING(0 0,1 1,2 2,3 3)");
}

#[test]
fn parse_binary_line_string() {
    let hex = "010200000003000000000000000000000000000000000000000000000000000040000000000000004000000000000014400000000000001440";
    let bytes: Vec<u8> = (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).unwrap())
        .collect();
    let geom: Geometry = spatial::parse_binary(&bytes, false).unwrap();
    let line = match geom {
        Geometry::LineString(line) => line,
        other => panic!("expected a line string, got {:?}", other),
    };
    let coords: Vec<(f64, f64)> = line.points().iter().map(|p| (p.x(), p.y())).collect();
    assert_eq!(coords, vec![(0., 0.), (2., 2.), (5., 5.)]);
}

#[test]
fn polygon_perimeter() {
    let geom: Geometry = spatial::parse_text("POLYGON((0 0,10 0,10 10,0 10,0 0))", None).unwrap();
    let polygon = match geom {
        Geometry::Polygon(polygon) => polygon,
        other => panic!("expected a polygon, got {:?}", other),
    };
    assert_eq!(polygon.rings().len(), 1);
    assert_eq!(polygon.ring(0).unwrap().len(), 5);
    assert_eq!(polygon.perimeter(), 40.0);
}

#[test]
fn unclosed_ring_is_rejected() {
    let err = spatial::parse_text::<spatial::Planar>("POLYGON((0 0,1 0,1 1))", None).unwrap_err();
    assert!(matches!(
        err,
        spatial::Error::Value(spatial::ValueError::UnclosedRing { .. })
    ));
}

#[test]
fn polygon_negative_ring_index() {
    let polygon: Polygon = Polygon::builder()
        .ring(vec![(0., 0.), (10., 0.), (10., 10.), (0., 10.), (0., 0.)])
        .ring(vec![(1., 1.), (2., 1.), (2., 2.), (1., 1.)])
        .ring(vec![(5., 5.), (6., 5.), (6., 6.), (5., 5.)])
        .build()
        .unwrap();
    assert_eq!(polygon.ring(-1).unwrap(), polygon.ring(2).unwrap());
    assert_eq!(polygon.ring(-3).unwrap(), polygon.exterior().unwrap());
    assert!(polygon.ring(-4).is_err());
}

#[test]
fn geography_rejects_out_of_range() {
    assert!(spatial::parse_text::<spatial::Geodetic>("POINT(181 0)", None).is_err());
    let geom: spatial::geography::Geometry = spatial::parse_text("POINT(-73.9 40.7)", Some(4326)).unwrap();
    assert_eq!(geom.srid(), Some(4326));
}
