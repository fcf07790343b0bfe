//! Canned provider payloads used by the suite.

use serde_json::{Value, json};

pub const TOKYO_QUERY: &str = "tokyo, jp";
pub const HONOLULU_QUERY: &str = "honolulu, us";
pub const UNKNOWN_QUERY: &str = "askjdnfks";

pub const TOKYO_DT: i64 = 1647843122;
pub const HONOLULU_DT: i64 = 1647845849;

pub fn tokyo() -> Value {
    json!({
        "coord": { "lon": 139.6917, "lat": 35.6895 },
        "weather": [
            { "id": 801, "main": "Clouds", "description": "few clouds", "icon": "02d" }
        ],
        "base": "stations",
        "main": {
            "temp": 55.42,
            "feels_like": 52.74,
            "temp_min": 50.67,
            "temp_max": 58.59,
            "pressure": 1020,
            "humidity": 44
        },
        "visibility": 10000,
        "wind": { "speed": 4.61, "deg": 90 },
        "clouds": { "all": 20 },
        "dt": TOKYO_DT,
        "sys": {
            "type": 2,
            "id": 268395,
            "country": "JP",
            "sunrise": 1647809057,
            "sunset": 1647852769
        },
        "timezone": 32400,
        "id": 1850144,
        "name": "Tokyo",
        "cod": 200
    })
}

/// Trimmed-down payload: only the consumed fields plus a few extras.
pub fn honolulu() -> Value {
    json!({
        "coord": { "lon": -157.8583, "lat": 21.3069 },
        "weather": [
            { "main": "Clouds", "description": "broken clouds", "icon": "04n" }
        ],
        "main": { "temp": 73.67, "feels_like": 74.88 },
        "dt": HONOLULU_DT,
        "sys": { "country": "US" },
        "id": 5856195,
        "name": "Honolulu"
    })
}

pub fn not_found() -> Value {
    json!({ "data": { "cod": 404 } })
}
