//! Best-effort reverse geocoding used to pre-fill the location field.

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{config::Config, error::ClimaError};

/// Returned when the service knows the point but has no usable address parts.
pub const UNKNOWN_LOCATION: &str = "Unknown location";

const USER_AGENT: &str = concat!("climasense/", env!("CARGO_PKG_VERSION"));

/// Client for a Nominatim-compatible `/reverse` endpoint.
#[derive(Debug, Clone)]
pub struct ReverseGeocoder {
    base_url: String,
    http: Client,
}

impl ReverseGeocoder {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClimaError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ClimaError::Geocoding(e.to_string()))?;

        Ok(Self { base_url: base_url.into().trim_end_matches('/').to_string(), http })
    }

    pub fn from_config(config: &Config) -> Result<Self, ClimaError> {
        Self::new(config.geocoding_base_url())
    }

    /// Turn coordinates into a `"city, state, country"` string.
    pub async fn reverse(&self, lat: f64, lon: f64) -> Result<String, ClimaError> {
        check_coordinates(lat, lon)?;
        debug!(lat, lon, "reverse geocoding");

        let lat = lat.to_string();
        let lon = lon.to_string();

        let res = self
            .http
            .get(format!("{}/reverse", self.base_url))
            .query(&[("format", "json"), ("lat", lat.as_str()), ("lon", lon.as_str())])
            .send()
            .await
            .map_err(|e| geocoding_failure(format!("request failed: {e}")))?;

        let status = res.status();
        if !status.is_success() {
            return Err(geocoding_failure(format!("service answered with status {status}")));
        }

        let parsed: NmResponse = res
            .json()
            .await
            .map_err(|e| geocoding_failure(format!("failed to parse response: {e}")))?;

        Ok(format_address(&parsed))
    }
}

#[derive(Debug, Default, Deserialize)]
struct NmResponse {
    address: Option<NmAddress>,
}

#[derive(Debug, Default, Deserialize)]
struct NmAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    hamlet: Option<String>,
    state: Option<String>,
    state_district: Option<String>,
    country: Option<String>,
}

fn format_address(response: &NmResponse) -> String {
    let Some(address) = &response.address else {
        return UNKNOWN_LOCATION.to_string();
    };

    let settlement = first_present(&[&address.city, &address.town, &address.village, &address.hamlet]);
    let region = first_present(&[&address.state, &address.state_district]);
    let country = first_present(&[&address.country]);

    let parts: Vec<&str> = [settlement, region, country].into_iter().flatten().collect();
    if parts.is_empty() { UNKNOWN_LOCATION.to_string() } else { parts.join(", ") }
}

fn first_present<'a>(candidates: &[&'a Option<String>]) -> Option<&'a str> {
    candidates
        .iter()
        .copied()
        .filter_map(Option::as_deref)
        .map(str::trim)
        .find(|s| !s.is_empty())
}

fn check_coordinates(lat: f64, lon: f64) -> Result<(), ClimaError> {
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(ClimaError::invalid_input(format!(
            "coordinates ({lat}, {lon}) are outside the valid range"
        )));
    }
    Ok(())
}

fn geocoding_failure(detail: String) -> ClimaError {
    warn!(%detail, "reverse geocoding failed");
    ClimaError::Geocoding(detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
        task::JoinHandle,
    };

    /// Answer exactly one HTTP request with `status` and `body`; the handle yields the raw request.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            String::from_utf8_lossy(&request).into_owned()
        });

        (base_url, handle)
    }

    fn parse(body: &str) -> NmResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn city_state_country() {
        let r = parse(r#"{"address": {"city": "Paris", "state": "Île-de-France", "country": "France", "postcode": "75001"}}"#);
        assert_eq!(format_address(&r), "Paris, Île-de-France, France");
    }

    #[test]
    fn falls_back_through_settlement_kinds() {
        let r = parse(r#"{"address": {"village": "Hallstatt", "state_district": "Gmunden", "country": "Österreich"}}"#);
        assert_eq!(format_address(&r), "Hallstatt, Gmunden, Österreich");

        let r = parse(r#"{"address": {"hamlet": "Tiny", "country": "Nowhereland"}}"#);
        assert_eq!(format_address(&r), "Tiny, Nowhereland");
    }

    #[test]
    fn city_wins_over_town() {
        let r = parse(r#"{"address": {"town": "T", "city": "C"}}"#);
        assert_eq!(format_address(&r), "C");
    }

    #[test]
    fn missing_address_is_unknown() {
        assert_eq!(format_address(&parse(r#"{"error": "Unable to geocode"}"#)), UNKNOWN_LOCATION);
    }

    #[test]
    fn address_without_known_parts_is_unknown() {
        let r = parse(r#"{"address": {"road": "Somewhere Rd", "city": " "}}"#);
        assert_eq!(format_address(&r), UNKNOWN_LOCATION);
    }

    #[test]
    fn coordinates_out_of_range_are_rejected() {
        assert!(check_coordinates(48.85, 2.35).is_ok());
        assert!(check_coordinates(-90.0, 180.0).is_ok());
        assert!(matches!(check_coordinates(91.0, 0.0), Err(ClimaError::InvalidInput(_))));
        assert!(matches!(check_coordinates(0.0, -181.0), Err(ClimaError::InvalidInput(_))));
        assert!(check_coordinates(f64::NAN, 0.0).is_err());
    }

    #[tokio::test]
    async fn unreachable_service_is_geocoding_error() {
        let geocoder = ReverseGeocoder::new("http://127.0.0.1:9").unwrap();
        let err = geocoder.reverse(48.85, 2.35).await.unwrap_err();
        assert!(matches!(err, ClimaError::Geocoding(_)));
    }

    #[tokio::test]
    async fn reverse_formats_served_address() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"address": {"city": "Paris", "state": "Île-de-France", "country": "France"}}"#,
        )
        .await;

        let address = ReverseGeocoder::new(base_url).unwrap().reverse(48.85, 2.35).await.unwrap();
        assert_eq!(address, "Paris, Île-de-France, France");

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /reverse?"));
        assert!(request.contains("format=json"));
        assert!(request.contains("lat=48.85"));
        assert!(request.contains("lon=2.35"));
        assert!(request.to_lowercase().contains("user-agent: climasense/"));
    }

    #[tokio::test]
    async fn server_error_status_is_geocoding_error() {
        let (base_url, server) = serve_once("500 Internal Server Error", r#"{"error": "boom"}"#).await;

        let err = ReverseGeocoder::new(base_url).unwrap().reverse(48.85, 2.35).await.unwrap_err();
        assert!(matches!(&err, ClimaError::Geocoding(detail) if detail.contains("500")));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn undecodable_body_is_geocoding_error() {
        let (base_url, server) = serve_once("200 OK", "<html>not json</html>").await;

        let err = ReverseGeocoder::new(base_url).unwrap().reverse(48.85, 2.35).await.unwrap_err();
        assert!(matches!(err, ClimaError::Geocoding(_)));
        server.await.unwrap();
    }
}
