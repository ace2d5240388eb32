//! iRail HTTP client.
//!
//! Provides async methods for the five consumed endpoints: station
//! directory, disturbances, liveboard, vehicle itinerary and composition.
//! Every request is bounded by a per-endpoint timeout and carries the
//! language hint derived from the configured locale.

use std::time::Duration;

use chrono::NaiveTime;
use serde::de::DeserializeOwned;

use crate::domain::{
    BoardEntry, BoardMode, Composition, Disturbance, ServiceDay, Station, VehicleId,
    VehicleJourney,
};

use super::convert;
use super::error::IrailError;
use super::types::{
    CompositionResponse, DisturbancesResponse, LiveboardResponse, StationsResponse,
    VehicleResponse,
};

/// Default base URL for the iRail API.
const DEFAULT_BASE_URL: &str = "https://api.irail.be";

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(7);

/// Timeout for the (large) station directory response.
const STATIONS_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for the optional disturbances feed.
const DISTURBANCES_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for the iRail client.
#[derive(Debug, Clone)]
pub struct IrailConfig {
    /// Base URL for the API.
    pub base_url: String,
    /// Runtime locale the language hint is derived from, e.g. `fr-BE`.
    pub locale: String,
    /// Timeout for liveboard, vehicle and composition requests.
    pub timeout: Duration,
    /// Timeout for the station directory request.
    pub stations_timeout: Duration,
    /// Timeout for the disturbances request.
    pub disturbances_timeout: Duration,
}

impl IrailConfig {
    /// Create a config with the default endpoints and timeouts.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            locale: "fr-BE".to_string(),
            timeout: DEFAULT_TIMEOUT,
            stations_timeout: STATIONS_TIMEOUT,
            disturbances_timeout: DISTURBANCES_TIMEOUT,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the locale the language hint is derived from.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Set the default per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The language hint passed to every endpoint.
    pub fn lang(&self) -> &'static str {
        if self.locale.starts_with("fr") { "fr" } else { "en" }
    }
}

impl Default for IrailConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// iRail API client.
#[derive(Debug, Clone)]
pub struct IrailClient {
    http: reqwest::Client,
    config: IrailConfig,
}

impl IrailClient {
    /// Create a new client with the given configuration.
    pub fn new(config: IrailConfig) -> Result<Self, IrailError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &IrailConfig {
        &self.config
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        timeout: Duration,
    ) -> Result<T, IrailError> {
        let url = format!("{}/{}/", self.config.base_url, path);

        let response = self
            .http
            .get(&url)
            .query(query)
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(IrailError::HttpStatus(status.as_u16()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| IrailError::Parse {
            message: e.to_string(),
        })
    }

    /// Fetch the full station directory.
    pub async fn stations(&self) -> Result<Vec<Station>, IrailError> {
        let query = [
            ("format", "json".to_string()),
            ("lang", self.config.lang().to_string()),
        ];
        let resp: StationsResponse = self
            .fetch_json("stations", &query, self.config.stations_timeout)
            .await?;
        Ok(convert::stations(resp))
    }

    /// Fetch current network disturbances.
    pub async fn disturbances(&self) -> Result<Vec<Disturbance>, IrailError> {
        let query = [
            ("format", "json".to_string()),
            ("lang", self.config.lang().to_string()),
        ];
        let resp: DisturbancesResponse = self
            .fetch_json("disturbances", &query, self.config.disturbances_timeout)
            .await?;
        Ok(convert::disturbances(resp))
    }

    /// Fetch the live board for a station.
    ///
    /// `day` and `time` are pagination hints; when omitted the upstream
    /// serves the board for "now". An HTTP 400 commonly means "no data for
    /// this exact time slice" and is surfaced as [`IrailError::HttpStatus`]
    /// for the resolver to handle.
    pub async fn liveboard(
        &self,
        station: &str,
        mode: BoardMode,
        day: Option<ServiceDay>,
        time: Option<NaiveTime>,
    ) -> Result<Vec<BoardEntry>, IrailError> {
        let mut query = vec![
            ("station", station.to_string()),
            ("arrdep", mode.arrdep().to_string()),
            ("format", "json".to_string()),
            ("lang", self.config.lang().to_string()),
        ];
        if let Some(day) = day {
            query.push(("date", day.ddmmyy()));
        }
        if let Some(time) = time {
            query.push(("time", time.format("%H%M").to_string()));
        }

        let resp: LiveboardResponse = self
            .fetch_json("liveboard", &query, self.config.timeout)
            .await?;
        Ok(convert::board_entries(resp, mode))
    }

    /// Fetch the stop-by-stop itinerary of a vehicle on a day.
    pub async fn vehicle(
        &self,
        id: &VehicleId,
        day: ServiceDay,
    ) -> Result<VehicleJourney, IrailError> {
        let query = [
            ("id", id.as_str().to_string()),
            ("date", day.ddmmyy()),
            ("format", "json".to_string()),
            ("lang", self.config.lang().to_string()),
        ];
        let resp: VehicleResponse = self.fetch_json("vehicle", &query, self.config.timeout).await?;
        Ok(convert::vehicle_journey(resp, id, day))
    }

    /// Fetch the physical composition of a vehicle on a day.
    ///
    /// The composition endpoint takes no language hint.
    pub async fn composition(
        &self,
        id: &VehicleId,
        day: ServiceDay,
    ) -> Result<Composition, IrailError> {
        let query = [
            ("id", id.as_str().to_string()),
            ("date", day.ddmmyy()),
            ("format", "json".to_string()),
        ];
        let resp: CompositionResponse = self
            .fetch_json("composition", &query, self.config.timeout)
            .await?;
        Ok(convert::composition(resp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = IrailConfig::new();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(7));
        assert_eq!(config.stations_timeout, Duration::from_secs(10));
        assert_eq!(config.disturbances_timeout, Duration::from_secs(5));
    }

    #[test]
    fn config_builder() {
        let config = IrailConfig::new()
            .with_base_url("http://localhost:8080")
            .with_locale("nl-BE")
            .with_timeout(Duration::from_secs(2));

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.locale, "nl-BE");
        assert_eq!(config.timeout, Duration::from_secs(2));
    }

    #[test]
    fn language_hint_from_locale() {
        assert_eq!(IrailConfig::new().with_locale("fr-BE").lang(), "fr");
        assert_eq!(IrailConfig::new().with_locale("fr").lang(), "fr");
        assert_eq!(IrailConfig::new().with_locale("nl-BE").lang(), "en");
        assert_eq!(IrailConfig::new().with_locale("en-GB").lang(), "en");
    }

    #[test]
    fn client_creation() {
        assert!(IrailClient::new(IrailConfig::new()).is_ok());
    }
}
