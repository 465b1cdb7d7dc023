//! Fixtures shared by the data crate's tests and downstream crates.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

use serde_json::{Value, json};

/// A footprint feature in the municipal export's column layout.
#[must_use]
pub fn building_feature(latitude: f64, longitude: f64, height: f64) -> Value {
    json!({
        "type": "Feature",
        "properties": {
            "LATITUDE": latitude,
            "LONGITUDE": longitude,
            "MIN_HEIGHT": 0.0,
            "MAX_HEIGHT": height,
            "AVG_HEIGHT": height,
            "HEIGHT_MSL": null,
            "SHAPE_AREA": 100.0
        },
        "geometry": {
            "type": "Point",
            "coordinates": [longitude, latitude]
        }
    })
}

/// Serialise `features` as a GeoJSON `FeatureCollection`.
#[must_use]
pub fn feature_collection(features: impl IntoIterator<Item = Value>) -> String {
    json!({
        "type": "FeatureCollection",
        "features": features.into_iter().collect::<Vec<_>>()
    })
    .to_string()
}

/// Answer exactly one HTTP request with `status` and a JSON `body`.
///
/// Returns the base URL to point a client at and a handle yielding the
/// request line the server received.
///
/// # Panics
/// Panics when the loopback listener cannot be bound, or (inside the server
/// thread) when the exchange fails.
#[must_use]
pub fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
    let addr = listener.local_addr().expect("stub server address");
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let mut buf = [0_u8; 4096];
        let read = stream.read(&mut buf).expect("read request");
        let request = String::from_utf8_lossy(buf.get(..read).unwrap_or_default()).into_owned();
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        stream
            .write_all(response.as_bytes())
            .expect("write response");
        request.lines().next().unwrap_or_default().to_owned()
    });
    (format!("http://{addr}"), handle)
}
