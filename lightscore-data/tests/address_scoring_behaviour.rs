//! Behavioural tests wiring ingestion, geocoding and the solar provider into
//! the scorer.

use std::cell::RefCell;
use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use lightscore_core::{Address, LightScoreError, LightScoreReport, LightScorer, ProximityIndex};
use lightscore_data::test_support::serve_once;
use lightscore_data::{
    AlgorithmicSunProvider, LocationIqConfig, LocationIqGeocoder, ingest_geojson,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

const GEOCODED_LAT: f64 = 43.65;
const GEOCODED_LNG: f64 = -79.3832;

#[derive(Default)]
struct Scene {
    index: Option<Arc<ProximityIndex>>,
    base_url: Option<String>,
    server: Option<JoinHandle<String>>,
    outcome: Option<Result<LightScoreReport, LightScoreError>>,
}

#[fixture]
fn scene() -> RefCell<Scene> {
    RefCell::new(Scene::default())
}

fn address() -> Address {
    Address {
        street_number: "100".into(),
        street_name: "Queen St W".into(),
        city: "Toronto".into(),
        postal_code: "M5H 2N2".into(),
        country: "Canada".into(),
    }
}

fn solstice_noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 20, 17, 19, 0)
        .single()
        .expect("valid timestamp")
}

fn score(scene: &RefCell<Scene>, direction: &str) {
    let mut scene = scene.borrow_mut();
    let index = scene.index.clone().expect("index loaded");
    let base_url = scene.base_url.clone().expect("geocoder prepared");
    let geocoder = LocationIqGeocoder::with_config(
        LocationIqConfig::new("behaviour-key")
            .with_base_url(base_url)
            .with_timeout(Duration::from_secs(5)),
    )
    .expect("geocoder builds");
    let scorer = LightScorer::new(index, AlgorithmicSunProvider);
    let outcome = scorer.score_address(&geocoder, &address(), 3, direction, Some(solstice_noon()));
    scene.outcome = Some(outcome);
    if let Some(server) = scene.server.take() {
        let request_line = server.join().expect("stub server thread");
        assert!(request_line.contains("key=behaviour-key"));
    }
}

fn expect_report(scene: &RefCell<Scene>) -> LightScoreReport {
    scene
        .borrow()
        .outcome
        .as_ref()
        .expect("scoring was attempted")
        .as_ref()
        .expect("expected a report")
        .clone()
}

#[given("the Queen Street footprint export loaded into an index")]
fn load_export(#[from(scene)] scene: &RefCell<Scene>) {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/queen_street.geojson");
    let (catalog, _) = ingest_geojson(&path).expect("fixture ingests");
    scene.borrow_mut().index = Some(Arc::new(ProximityIndex::build(&catalog)));
}

#[given("a LocationIQ service that resolves the address south of the towers")]
fn resolving_service(#[from(scene)] scene: &RefCell<Scene>) {
    let (base_url, server) = serve_once(
        "200 OK",
        r#"[{"lat":"43.6500","lon":"-79.3832","display_name":"100 Queen St W, Toronto"}]"#,
    );
    let mut scene = scene.borrow_mut();
    scene.base_url = Some(base_url);
    scene.server = Some(server);
}

#[given("a LocationIQ service that cannot find the address")]
fn empty_service(#[from(scene)] scene: &RefCell<Scene>) {
    let (base_url, server) = serve_once("404 Not Found", r#"{"error":"Unable to geocode"}"#);
    let mut scene = scene.borrow_mut();
    scene.base_url = Some(base_url);
    scene.server = Some(server);
}

#[given("an unreachable LocationIQ service")]
fn unreachable_service(#[from(scene)] scene: &RefCell<Scene>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    scene.borrow_mut().base_url = Some(format!("http://{addr}"));
}

#[when("I score the third floor facing north at the summer solstice")]
fn score_north(#[from(scene)] scene: &RefCell<Scene>) {
    score(scene, "N");
}

#[when("I score the third floor facing upwards")]
fn score_upwards(#[from(scene)] scene: &RefCell<Scene>) {
    score(scene, "up");
}

#[then("the report is located at the geocoded coordinates")]
fn located(#[from(scene)] scene: &RefCell<Scene>) {
    let report = expect_report(scene);
    assert_eq!(report.coordinates.lat, GEOCODED_LAT);
    assert_eq!(report.coordinates.lng, GEOCODED_LNG);
}

#[then("the three exported buildings are reported nearest first")]
fn buildings_reported(#[from(scene)] scene: &RefCell<Scene>) {
    let report = expect_report(scene);
    assert_eq!(report.building_data.len(), 3);
    let distances: Vec<f64> = report.building_data.iter().map(|b| b.distance).collect();
    assert!(distances.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(report.building_data.first().map(|b| b.height), Some(172.9));
}

#[then("the light score lies between 0 and 100")]
fn score_in_range(#[from(scene)] scene: &RefCell<Scene>) {
    let report = expect_report(scene);
    assert!((0.0..=100.0).contains(&report.light_score));
    assert!(report.sun_position.elevation > 60.0);
}

#[then("the address is reported as unresolved")]
fn unresolved(#[from(scene)] scene: &RefCell<Scene>) {
    let scene = scene.borrow();
    match scene.outcome.as_ref().expect("scoring was attempted") {
        Err(LightScoreError::LocationUnresolved { address }) => {
            assert!(address.contains("Queen St W"));
        }
        other => panic!("expected an unresolved address, got {other:?}"),
    }
}

#[then("the direction is reported as invalid")]
fn invalid_direction(#[from(scene)] scene: &RefCell<Scene>) {
    let scene = scene.borrow();
    match scene.outcome.as_ref().expect("scoring was attempted") {
        Err(LightScoreError::InvalidDirection(err)) => assert_eq!(err.value, "up"),
        other => panic!("expected an invalid direction, got {other:?}"),
    }
}

#[scenario(path = "tests/features/address_scoring.feature", index = 0)]
fn scoring_a_geocoded_address(scene: RefCell<Scene>) {
    let _ = scene;
}

#[scenario(path = "tests/features/address_scoring.feature", index = 1)]
fn reporting_an_unresolved_address(scene: RefCell<Scene>) {
    let _ = scene;
}

#[scenario(path = "tests/features/address_scoring.feature", index = 2)]
fn rejecting_an_unknown_direction(scene: RefCell<Scene>) {
    let _ = scene;
}
