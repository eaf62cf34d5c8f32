#![allow(dead_code)]

use serde_json::{Value, json};

/// 2024-01-01T00:00:00Z, a Monday
pub const MONDAY_MIDNIGHT: i64 = 1_704_067_200;
pub const HOUR: i64 = 3_600;

pub fn current_body(name: &str, label: &str, description: &str, kelvin: f64) -> Value {
    json!({
        "coord": {"lon": -0.1257, "lat": 51.5085},
        "weather": [{"id": 500, "main": label, "description": description, "icon": "10d"}],
        "main": {"temp": kelvin, "feels_like": kelvin - 1.0, "humidity": 81},
        "dt": MONDAY_MIDNIGHT,
        "name": name,
        "cod": 200
    })
}

/// Two days of three-hourly samples: Monday at 280/290/300 K under "Rain",
/// Tuesday at a flat 285 K under "Clouds"
pub fn forecast_body() -> Value {
    let mut list = Vec::new();
    for (i, kelvin) in [280.0, 290.0, 300.0].into_iter().enumerate() {
        let label = if i == 0 { "Rain" } else { "Clear" };
        list.push(entry(MONDAY_MIDNIGHT + i as i64 * 3 * HOUR, kelvin, label));
    }
    for i in 0..8 {
        list.push(entry(MONDAY_MIDNIGHT + 24 * HOUR + i * 3 * HOUR, 285.0, "Clouds"));
    }
    json!({"cod": "200", "message": 0, "cnt": list.len(), "list": list})
}

fn entry(dt: i64, kelvin: f64, label: &str) -> Value {
    json!({
        "dt": dt,
        "main": {"temp": kelvin},
        "weather": [{"main": label, "description": format!("{} today", label.to_lowercase())}],
        "dt_txt": ""
    })
}
