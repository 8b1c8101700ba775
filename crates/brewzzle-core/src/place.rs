//! Places provider data model.
//!
//! These types mirror the JSON returned by the places web service. Only the
//! fields the search pipeline reads are typed; everything else is kept in a
//! flattened map so passthrough endpoints re-emit exactly what the provider
//! sent.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A place as returned by a search or details request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Stable provider identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,

    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Full postal address (text and details endpoints).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_address: Option<String>,

    /// Short address snippet (nearby endpoint).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vicinity: Option<String>,

    /// Opening hours, when the provider knows them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<OpeningHours>,

    /// Every other field, untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Place {
    /// The summary `open_now` flag carried on list results.
    #[must_use]
    pub fn open_now(&self) -> Option<bool> {
        self.opening_hours.as_ref().and_then(|oh| oh.open_now)
    }

    /// Returns `true` when the provider sent an empty object.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.place_id.is_none()
            && self.name.is_none()
            && self.formatted_address.is_none()
            && self.vicinity.is_none()
            && self.opening_hours.is_none()
            && self.extra.is_empty()
    }
}

/// Weekly opening schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpeningHours {
    /// Whether the place is open right now, as computed by the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_now: Option<bool>,

    /// Opening periods. A period without `close` means open around the clock.
    #[serde(default)]
    pub periods: Vec<Period>,

    /// `weekday_text` and anything else the provider adds.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One open/close pair within a [`OpeningHours`] schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    /// When the period starts. Only absent in irregular provider data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<DayTime>,

    /// When the period ends. Absent for places that never close.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close: Option<DayTime>,
}

/// A day-of-week plus `HHMM` time stamp.
///
/// Every field is optional and `time` stays a string; the evaluator in
/// [`crate::hours`] rejects missing or malformed values only when a filter
/// actually reads them, so irregular schedules still pass through search
/// pages untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayTime {
    /// 0 = Sunday .. 6 = Saturday.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u8>,

    /// Local time as `HHMM`, unparsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    /// Provider extras such as `date` or `truncated`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DayTime {
    /// Convenience constructor used by tests and fakes.
    #[must_use]
    pub fn new(day: u8, time: impl Into<String>) -> Self {
        Self {
            day: Some(day),
            time: Some(time.into()),
            extra: Map::new(),
        }
    }
}

/// Envelope returned by every provider endpoint.
///
/// Search endpoints fill `results`; the details endpoint fills `result`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// Search hits.
    #[serde(default)]
    pub results: Vec<Place>,

    /// Details hit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Place>,

    /// Opaque continuation token. Never inspected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,

    /// Provider status string (`OK`, `ZERO_RESULTS`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Human-readable detail sent with error statuses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Every other field (`html_attributions`, ...), untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProviderResponse {
    /// Build a search page from a list of places.
    #[must_use]
    pub fn page(results: Vec<Place>, next_page_token: Option<String>) -> Self {
        Self {
            results,
            next_page_token,
            status: Some("OK".to_string()),
            ..Self::default()
        }
    }

    /// Build a details response around a single place.
    #[must_use]
    pub fn details(result: Option<Place>) -> Self {
        Self {
            result,
            status: Some("OK".to_string()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_place_keeps_unknown_fields() {
        let raw = json!({
            "place_id": "abc",
            "name": "Blue Bottle",
            "rating": 4.5,
            "geometry": {"location": {"lat": 1.0, "lng": 2.0}},
            "opening_hours": {"open_now": true, "weekday_text": ["Mon: 7-5"]}
        });

        let place: Place = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(place.place_id.as_deref(), Some("abc"));
        assert_eq!(place.open_now(), Some(true));
        assert!(place.extra.contains_key("rating"));

        let back = serde_json::to_value(&place).unwrap();
        assert_eq!(back["geometry"], raw["geometry"]);
        assert_eq!(back["opening_hours"]["weekday_text"], raw["opening_hours"]["weekday_text"]);
        assert!(back.get("vicinity").is_none());
    }

    #[test]
    fn test_periods_without_close() {
        let raw = json!({
            "periods": [{"open": {"day": 0, "time": "0000"}}]
        });
        let hours: OpeningHours = serde_json::from_value(raw).unwrap();
        assert_eq!(hours.periods.len(), 1);
        assert!(hours.periods[0].close.is_none());
        assert_eq!(hours.open_now, None);
    }

    #[test]
    fn test_irregular_periods_pass_through() {
        let raw = json!({
            "status": "OK",
            "results": [
                {"place_id": "ok"},
                {"place_id": "odd", "opening_hours": {"periods": [
                    {"open": {"day": 1}},
                    {"close": {"day": 2, "time": "1800"}}
                ]}}
            ]
        });

        let resp: ProviderResponse = serde_json::from_value(raw.clone()).unwrap();
        let periods = &resp.results[1].opening_hours.as_ref().unwrap().periods;
        assert_eq!(periods[0].open.as_ref().unwrap().time, None);
        assert!(periods[1].open.is_none());

        assert_eq!(serde_json::to_value(&resp).unwrap(), raw);
    }

    #[test]
    fn test_empty_place() {
        let place: Place = serde_json::from_value(json!({})).unwrap();
        assert!(place.is_empty());

        let place: Place = serde_json::from_value(json!({"rating": 3})).unwrap();
        assert!(!place.is_empty());
    }

    #[test]
    fn test_provider_response_defaults() {
        let resp: ProviderResponse =
            serde_json::from_value(json!({"status": "ZERO_RESULTS", "html_attributions": []}))
                .unwrap();
        assert!(resp.results.is_empty());
        assert!(resp.result.is_none());
        assert!(resp.next_page_token.is_none());
        assert!(resp.extra.contains_key("html_attributions"));
    }
}
