use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::function::{parse_args, Function, FunctionError, FunctionValue};

const HISTORY_ENDPOINT: &str =
    "https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services/weatherdata/history";

#[derive(Debug, Deserialize)]
struct WeatherHistoryArgs {
    locations: String,
    month: u32,
}

/// Daily historical weather (previous year) for a location and month, via
/// Visual Crossing. Only temperature, precipitation and date survive the
/// reshape.
pub struct WeatherHistoryFunction {
    api_key: String,
    client: reqwest::Client,
}

impl WeatherHistoryFunction {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
        }
    }

    fn month_window(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let next_month = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };
        Some((start, next_month.pred_opt()?))
    }

    /// Keep only the temp/precip columns (renamed to their display names)
    /// plus the record date, per location.
    fn reshape(full: &serde_json::Value) -> serde_json::Value {
        let (Some(columns), Some(locations)) = (
            full.get("columns").and_then(|value| value.as_object()),
            full.get("locations").and_then(|value| value.as_object()),
        ) else {
            // unexpected shape is passed through untouched
            return full.clone();
        };

        let mut transformed = serde_json::Map::new();
        for (location_key, location) in locations {
            let values = location
                .get("values")
                .and_then(|value| value.as_array())
                .map(|values| {
                    values
                        .iter()
                        .map(|value| {
                            let mut record = serde_json::Map::new();
                            for (key, column) in columns {
                                if key != "temp" && key != "precip" {
                                    continue;
                                }
                                if let Some(name) = column.get("name").and_then(|n| n.as_str()) {
                                    record.insert(
                                        name.to_string(),
                                        value.get(key).cloned().unwrap_or(serde_json::Value::Null),
                                    );
                                }
                            }
                            if let Some(date) = value.get("datetimeStr") {
                                record.insert("datetimeStr".to_string(), date.clone());
                            }
                            serde_json::Value::Object(record)
                        })
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default();
            transformed.insert(location_key.clone(), serde_json::Value::Array(values));
        }
        serde_json::Value::Object(transformed)
    }
}

#[async_trait]
impl Function for WeatherHistoryFunction {
    fn name(&self) -> &str {
        "weather_history"
    }

    fn description(&self) -> &str {
        "Retrieves daily historical weather records for a given location and month. \
         The temperature unit is Fahrenheit. When processing tool output, do not include links."
    }

    fn parameters(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "locations": {
                    "description": "Location to get the weather for (must be a full name, no abbreviations).",
                    "type": "string"
                },
                "month": {
                    "description": "Month number. Must be between 1 and 12.",
                    "type": "number"
                }
            },
            "required": ["locations", "month"]
        })
    }

    async fn call(&self, args: &str) -> Result<FunctionValue, FunctionError> {
        let args: WeatherHistoryArgs = parse_args(self.name(), args)?;

        let year = Utc::now().year() - 1;
        let (start, end) =
            Self::month_window(year, args.month).ok_or_else(|| FunctionError::UnexpectedResult {
                name: self.name().to_string(),
                detail: format!("month {} is out of range", args.month),
            })?;

        let response = self
            .client
            .get(HISTORY_ENDPOINT)
            .query(&[
                ("key", self.api_key.as_str()),
                ("aggregateHours", "24"),
                ("unitGroup", "us"),
                ("contentType", "json"),
                ("outputDateTimeFormat", "yyyy-MM-dd"),
                ("startDateTime", &start.format("%Y-%m-%d").to_string()),
                ("endDateTime", &end.format("%Y-%m-%d").to_string()),
                ("locations", args.locations.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FunctionError::Upstream {
                name: self.name().to_string(),
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let full: serde_json::Value = response.json().await?;
        Ok(FunctionValue::Json(Self::reshape(&full).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_window_handles_december() {
        let (start, end) = WeatherHistoryFunction::month_window(2024, 12).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());

        let (_, feb_end) = WeatherHistoryFunction::month_window(2024, 2).unwrap();
        assert_eq!(feb_end.day(), 29); // leap year

        assert!(WeatherHistoryFunction::month_window(2024, 13).is_none());
    }

    #[test]
    fn test_reshape_extracts_temp_and_precip() {
        let full = json!({
            "columns": {
                "temp": {"name": "Temperature"},
                "precip": {"name": "Precipitation"},
                "wspd": {"name": "Wind Speed"}
            },
            "locations": {
                "Seattle": {
                    "values": [
                        {"temp": 54.3, "precip": 0.2, "wspd": 9.1, "datetimeStr": "2024-03-01"}
                    ]
                }
            }
        });
        let reshaped = WeatherHistoryFunction::reshape(&full);
        let record = &reshaped["Seattle"][0];
        assert_eq!(record["Temperature"], 54.3);
        assert_eq!(record["Precipitation"], 0.2);
        assert_eq!(record["datetimeStr"], "2024-03-01");
        assert!(record.get("Wind Speed").is_none());
    }

    #[test]
    fn test_reshape_passes_through_unknown_shape() {
        let odd = json!({"message": "rate limited"});
        assert_eq!(WeatherHistoryFunction::reshape(&odd), odd);
    }
}
