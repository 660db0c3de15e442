use std::thread;

use float_cmp::approx_eq;
use gridconvert::{
    Convergence, DatumConversion, Error, GridCoordinate, GridRef, LatLon, Stage, TransverseMercator,
};

fn grid(easting: f64, northing: f64) -> GridCoordinate {
    GridCoordinate::create(easting, northing).unwrap()
}

#[test]
fn ordnance_survey_worked_example() {
    let example = grid(651_409.903, 313_177.270);

    // Before the datum shift: 52°39'27.2531"N 1°43'4.5177"E on OSGB36
    let (osgb36, _) = TransverseMercator::national_grid()
        .invert(&example, &Convergence::default())
        .unwrap();
    assert!(approx_eq!(f64, osgb36.latitude().to_degrees(), 52.657_6, epsilon = 1e-4));
    assert!(approx_eq!(f64, osgb36.longitude().to_degrees(), 1.718_0, epsilon = 1e-4));

    let wgs84 = gridconvert::convert(example.easting(), example.northing()).unwrap();
    assert!(approx_eq!(f64, wgs84.latitude(), 52.657_978, epsilon = 1e-4));
    assert!(approx_eq!(f64, wgs84.longitude(), 1.716_067, epsilon = 1e-4));
}

#[test]
fn reference_points() {
    // (easting, northing, latitude, longitude) on WGS84
    let points = [
        (530_000., 180_000., 51.503_991, -0.128_340),
        (0., 0., 49.766_808, -7.557_146),
        (700_000., 1_300_000., 61.464_590, 3.632_039),
        (0., 1_200_000., 60.483_943, -9.289_628),
    ];

    for (easting, northing, lat, lon) in points {
        let latlon = gridconvert::convert(easting, northing).unwrap();
        let expected = LatLon::create(lat, lon).unwrap();

        assert!(latlon.haversine(&expected) < 0.5, "({easting}, {northing}) gave {latlon}");
    }
}

#[test]
fn false_origin_maps_to_true_origin() {
    let origin = grid(400_000., -100_000.);

    let (osgb36, warning) = TransverseMercator::national_grid()
        .invert(&origin, &Convergence::default())
        .unwrap();
    assert!(approx_eq!(f64, osgb36.latitude().to_degrees(), 49., epsilon = 1e-12));
    assert!(approx_eq!(f64, osgb36.longitude().to_degrees(), -2., epsilon = 1e-12));
    assert!(warning.is_none());

    // The Helmert shift moves it by roughly a hundred metres
    let shifted = origin.to_latlon().unwrap();
    let true_origin = LatLon::create(49., -2.).unwrap();
    let distance = shifted.haversine(&true_origin);

    assert!(shifted.latitude().is_finite() && shifted.longitude().is_finite());
    assert!(distance > 10. && distance < 500., "shift of {distance}m");
}

#[test]
fn conversion_is_deterministic() {
    let coord = grid(651_409.903, 313_177.270);
    let first = coord.to_latlon().unwrap();

    for _ in 0..100 {
        let again = coord.to_latlon().unwrap();
        assert_eq!(first.latitude().to_bits(), again.latitude().to_bits());
        assert_eq!(first.longitude().to_bits(), again.longitude().to_bits());
    }
}

#[test]
fn results_stay_in_range_across_the_grid() {
    let conversion = DatumConversion::osgb36_to_wgs84();

    for e in (0..=700_000_i32).step_by(25_000) {
        for n in (0..=1_300_000_i32).step_by(25_000) {
            let converted = conversion.convert(&grid(f64::from(e), f64::from(n))).unwrap();
            let latlon = converted.latlon();

            assert!((-90.0..=90.0).contains(&latlon.latitude()));
            assert!(latlon.longitude() > -180. && latlon.longitude() <= 180.);
            assert!(converted.warning().is_none());
        }
    }
}

#[test]
fn northing_increases_latitude_and_easting_increases_longitude() {
    let base = grid(651_409.903, 313_177.270).to_latlon().unwrap();
    let north = grid(651_409.903, 313_177.370).to_latlon().unwrap();
    let east = grid(651_410.003, 313_177.270).to_latlon().unwrap();

    assert!(north.latitude() > base.latitude());
    assert!(east.longitude() > base.longitude());

    for e in (50_000..=650_000_i32).step_by(100_000) {
        let mut previous = f64::NEG_INFINITY;
        for n in (50_000..=1_250_000_i32).step_by(100_000) {
            let lat = grid(f64::from(e), f64::from(n)).to_latlon().unwrap().latitude();
            assert!(lat > previous);
            previous = lat;
        }
    }
}

#[test]
fn height_is_recovered_on_the_target_ellipsoid() {
    let conversion = DatumConversion::osgb36_to_wgs84();
    let coord = grid(651_409.903, 313_177.270);

    let ground = conversion.convert(&coord).unwrap();
    let raised = conversion.convert_with_height(&coord, 100.).unwrap();

    // OSGB36 sits roughly 45m below WGS84 in East Anglia
    assert!(approx_eq!(f64, ground.height(), 44.72, epsilon = 0.05));
    assert!(approx_eq!(f64, raised.height() - ground.height(), 100., epsilon = 0.01));
    assert!(ground.latlon().haversine(&raised.latlon()) < 0.01);

    assert!(matches!(conversion.convert_with_height(&coord, f64::NAN), Err(Error::InvalidCoord(_))));
}

#[test]
fn far_coordinates_are_flagged_not_rejected() {
    let conversion = DatumConversion::osgb36_to_wgs84();

    let converted = conversion.convert(&grid(2_000_000., 300_000.)).unwrap();
    let warning = converted.warning().unwrap();

    assert!(approx_eq!(f64, warning.easting(), 2_000_000.));
    assert!(approx_eq!(f64, warning.distance_from_false_origin(), 1_600_000f64.hypot(400_000.), epsilon = 1e-6));
    assert!(converted.latlon().latitude().is_finite());
}

#[test]
fn exhausted_iterations_are_reported() {
    let coord = grid(651_409.903, 313_177.270);

    let strict_arc = DatumConversion::osgb36_to_wgs84()
        .with_convergence(Convergence::default().with_max_arc_iterations(1));
    assert!(matches!(
        strict_arc.convert(&coord),
        Err(Error::NonConvergence { stage: Stage::MeridionalArc, .. })
    ));

    let strict_latitude = DatumConversion::osgb36_to_wgs84()
        .with_convergence(Convergence::default().with_max_latitude_iterations(1));
    assert!(matches!(
        strict_latitude.convert(&coord),
        Err(Error::NonConvergence { stage: Stage::LatitudeRecovery, iterations: 1, .. })
    ));
}

#[test]
fn non_finite_input_is_rejected() {
    assert!(matches!(gridconvert::convert(f64::NAN, 0.), Err(Error::InvalidCoord(_))));
    assert!(matches!(gridconvert::convert(0., f64::NEG_INFINITY), Err(Error::InvalidCoord(_))));
}

#[test]
fn overflowing_coordinates_are_invalid_not_unconverged() {
    match gridconvert::convert(1e45, 300_000.) {
        Err(Error::InvalidCoord(message)) => assert!(message.contains("overflows")),
        other => panic!("expected invalid coordinate, got {other:?}"),
    }
}

#[test]
fn grid_references_convert_like_numeric_coordinates() {
    let gridref = GridRef::parse_str("TG 51409 13177").unwrap();
    let numeric: GridCoordinate = gridconvert::from_str("651409 313177").unwrap();

    assert_eq!(gridref.to_grid(), numeric);
    assert_eq!(
        gridref.to_grid().to_latlon().unwrap(),
        numeric.to_latlon().unwrap(),
    );
    assert_eq!(numeric.to_gridref(5).unwrap(), gridref);
}

#[test]
fn concurrent_conversions_match_sequential_ones() {
    let coords = (0..200_i32)
        .map(|i| grid(f64::from(i) * 3_500., f64::from(i) * 6_500.))
        .collect::<Vec<_>>();

    let sequential = coords
        .iter()
        .map(|coord| coord.to_latlon().unwrap())
        .collect::<Vec<_>>();

    let parallel = DatumConversion::osgb36_to_wgs84()
        .convert_all(&coords)
        .into_iter()
        .map(|result| result.unwrap().latlon())
        .collect::<Vec<_>>();
    assert_eq!(sequential, parallel);

    let threaded = thread::scope(|scope| {
        let handles = coords
            .chunks(50)
            .map(|chunk| scope.spawn(move || {
                chunk.iter().map(|coord| coord.to_latlon().unwrap()).collect::<Vec<_>>()
            }))
            .collect::<Vec<_>>();

        handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect::<Vec<_>>()
    });
    assert_eq!(sequential, threaded);
}
