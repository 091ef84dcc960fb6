use crate::features::error::LocationError;
use crate::features::outcome::StepOutcome;
use chrono::{DateTime, Utc};
use reverse_geocoder::ReverseGeocoder;
use serde::{Deserialize, Serialize};
use std::future::Future;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Coords {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Option<f64>,
    pub accuracy: Option<f64>,
}

/// One geolocation reading. `timestamp` is in milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionReading {
    pub coords: Coords,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationData {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Option<f64>,
    pub accuracy: Option<f64>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

/// Platform geolocation capability. Every call is a single attempt.
pub trait LocationProvider {
    fn request_permission(
        &self,
    ) -> impl Future<Output = Result<PermissionStatus, LocationError>> + Send;

    fn current_position(&self) -> impl Future<Output = Result<PositionReading, LocationError>> + Send;

    /// Candidate addresses for the coordinates, best match first.
    fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> impl Future<Output = Result<Vec<Address>, LocationError>> + Send;
}

/// A platform without location access: permission is always denied.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeniedLocation;

impl LocationProvider for DeniedLocation {
    async fn request_permission(&self) -> Result<PermissionStatus, LocationError> {
        Ok(PermissionStatus::Denied)
    }

    async fn current_position(&self) -> Result<PositionReading, LocationError> {
        Err(LocationError::Position("location permission denied".to_string()))
    }

    async fn reverse_geocode(&self, _: f64, _: f64) -> Result<Vec<Address>, LocationError> {
        Ok(Vec::new())
    }
}

/// Reports a fixed position and geocodes it offline against the bundled
/// GeoNames city table.
pub struct OfflineLocation {
    reading: PositionReading,
    geocoder: ReverseGeocoder,
}

impl OfflineLocation {
    pub fn new(reading: PositionReading) -> Self {
        Self {
            reading,
            geocoder: ReverseGeocoder::new(),
        }
    }
}

impl LocationProvider for OfflineLocation {
    async fn request_permission(&self) -> Result<PermissionStatus, LocationError> {
        Ok(PermissionStatus::Granted)
    }

    async fn current_position(&self) -> Result<PositionReading, LocationError> {
        Ok(self.reading)
    }

    async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<Address>, LocationError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(LocationError::Geocode(format!(
                "coordinates out of range: {latitude}, {longitude}"
            )));
        }
        let search_result = self.geocoder.search((latitude, longitude));
        let record = search_result.record;
        let country = rust_iso3166::from_alpha2(&record.cc)
            .map_or_else(|| record.cc.clone(), |c| c.name.to_string());

        Ok(vec![Address {
            street: None,
            city: Some(record.name.clone()),
            region: Some(record.admin1.clone()),
            country: Some(country),
            postal_code: None,
        }])
    }
}

/// Looks up an address for the coordinates. Only the first result is used.
pub async fn resolve_address<L: LocationProvider>(
    provider: &L,
    latitude: f64,
    longitude: f64,
) -> StepOutcome<Address> {
    match provider.reverse_geocode(latitude, longitude).await {
        Ok(results) => results
            .into_iter()
            .next()
            .map_or(StepOutcome::Unavailable, StepOutcome::Available),
        Err(e) => {
            log::debug!("Reverse geocoding failed: {e}");
            StepOutcome::Failed(e.to_string())
        }
    }
}

/// Permission, then one position read, then one reverse-geocode lookup.
///
/// A missing address does not make the location unavailable; the record is
/// returned with coordinates only.
pub async fn resolve_location<L: LocationProvider>(provider: &L) -> StepOutcome<LocationData> {
    match provider.request_permission().await {
        Ok(PermissionStatus::Granted) => {}
        Ok(status) => {
            log::debug!("Location permission not granted: {status:?}");
            return StepOutcome::Unavailable;
        }
        Err(e) => {
            log::warn!("Location access denied or failed: {e}");
            return StepOutcome::Failed(e.to_string());
        }
    }

    let reading = match provider.current_position().await {
        Ok(reading) => reading,
        Err(e) => {
            log::warn!("Location access denied or failed: {e}");
            return StepOutcome::Failed(e.to_string());
        }
    };
    let Some(timestamp) = DateTime::from_timestamp_millis(reading.timestamp) else {
        return StepOutcome::Failed(format!(
            "position timestamp out of range: {}",
            reading.timestamp
        ));
    };

    let Coords {
        latitude,
        longitude,
        altitude,
        accuracy,
    } = reading.coords;
    let address = resolve_address(provider, latitude, longitude).await.ok();

    StepOutcome::Available(LocationData {
        latitude,
        longitude,
        altitude,
        accuracy,
        timestamp,
        address,
    })
}

/// Replays fixed answers and counts geocode calls.
#[cfg(test)]
pub(crate) struct ScriptedLocation {
    pub permission: Result<PermissionStatus, LocationError>,
    pub position: Result<PositionReading, LocationError>,
    pub geocode: Result<Vec<Address>, LocationError>,
    pub geocode_calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl ScriptedLocation {
    pub fn granted(reading: PositionReading, geocode: Result<Vec<Address>, LocationError>) -> Self {
        Self {
            permission: Ok(PermissionStatus::Granted),
            position: Ok(reading),
            geocode,
            geocode_calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }
}

#[cfg(test)]
impl LocationProvider for ScriptedLocation {
    async fn request_permission(&self) -> Result<PermissionStatus, LocationError> {
        self.permission.clone()
    }

    async fn current_position(&self) -> Result<PositionReading, LocationError> {
        self.position.clone()
    }

    async fn reverse_geocode(&self, _: f64, _: f64) -> Result<Vec<Address>, LocationError> {
        self.geocode_calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.geocode.clone()
    }
}

#[cfg(test)]
pub(crate) fn amsterdam() -> PositionReading {
    PositionReading {
        coords: Coords {
            latitude: 52.379_189,
            longitude: 4.899_431,
            altitude: Some(10.5),
            accuracy: Some(12.7),
        },
        timestamp: 1_717_243_200_000,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    fn street_address() -> Address {
        Address {
            street: Some("Damrak 1".into()),
            city: Some("Amsterdam".into()),
            region: Some("North Holland".into()),
            country: Some("Netherlands".into()),
            postal_code: Some("1012 LG".into()),
        }
    }

    #[tokio::test]
    async fn test_granted_location_with_address() {
        let provider = ScriptedLocation::granted(amsterdam(), Ok(vec![street_address()]));

        let location = resolve_location(&provider)
            .await
            .ok()
            .expect("Granted permission should yield a location");

        assert_eq!(location.latitude, 52.379_189);
        assert_eq!(location.longitude, 4.899_431);
        assert_eq!(location.accuracy, Some(12.7));
        assert_eq!(location.timestamp.to_rfc3339(), "2024-06-01T12:00:00+00:00");
        assert_eq!(location.address, Some(street_address()));
        assert_eq!(provider.geocode_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_denied_permission_is_unavailable() {
        let outcome = resolve_location(&DeniedLocation).await;
        assert_eq!(outcome, StepOutcome::Unavailable);
    }

    #[tokio::test]
    async fn test_permission_error_is_failed() {
        let mut provider = ScriptedLocation::granted(amsterdam(), Ok(vec![]));
        provider.permission = Err(LocationError::Permission("prompt dismissed".into()));

        let outcome = resolve_location(&provider).await;

        assert!(matches!(outcome, StepOutcome::Failed(_)));
        assert_eq!(provider.geocode_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_position_error_is_failed() {
        let mut provider = ScriptedLocation::granted(amsterdam(), Ok(vec![]));
        provider.position = Err(LocationError::Position("GPS timeout".into()));

        let outcome = resolve_location(&provider).await;
        assert_eq!(
            outcome,
            StepOutcome::Failed("Current position is unavailable: GPS timeout".into())
        );
    }

    #[tokio::test]
    async fn test_geocode_failure_keeps_coordinates() {
        let provider = ScriptedLocation::granted(
            amsterdam(),
            Err(LocationError::Geocode("service offline".into())),
        );

        let location = resolve_location(&provider).await.ok().unwrap();

        assert!(location.address.is_none());
        assert_eq!(location.latitude, 52.379_189);
        assert_eq!(provider.geocode_calls.load(Ordering::SeqCst), 1, "No retries");
    }

    #[tokio::test]
    async fn test_empty_geocode_result_is_unavailable() {
        let provider = ScriptedLocation::granted(amsterdam(), Ok(vec![]));
        let outcome = resolve_address(&provider, 0.0, 0.0).await;
        assert_eq!(outcome, StepOutcome::Unavailable);
    }

    #[tokio::test]
    async fn test_first_geocode_result_wins() {
        let second = Address {
            city: Some("Haarlem".into()),
            ..Default::default()
        };
        let provider = ScriptedLocation::granted(amsterdam(), Ok(vec![street_address(), second]));
        let outcome = resolve_address(&provider, 52.37, 4.89).await;
        assert_eq!(outcome, StepOutcome::Available(street_address()));
    }

    #[tokio::test]
    async fn test_offline_location_geocodes_without_network() {
        let provider = OfflineLocation::new(amsterdam());

        let location = resolve_location(&provider).await.ok().unwrap();
        let address = location.address.expect("Offline geocoder always has a nearest city");

        assert_eq!(address.city.as_deref(), Some("Amsterdam"));
        assert_eq!(address.region.as_deref(), Some("North Holland"));
        assert_eq!(address.country.as_deref(), Some("Netherlands"));
        assert!(address.street.is_none());
    }

    #[tokio::test]
    async fn test_offline_geocode_rejects_invalid_coordinates() {
        let provider = OfflineLocation::new(amsterdam());
        let outcome = resolve_address(&provider, 123.0, 4.0).await;
        assert!(matches!(outcome, StepOutcome::Failed(_)));
    }
}
