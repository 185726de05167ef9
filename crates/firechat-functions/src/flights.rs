use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::function::{parse_args, Function, FunctionError, FunctionValue};

const PRICES_ENDPOINT: &str = "https://api.travelpayouts.com/aviasales/v3/prices_for_dates";
const DESTINATIONS_ENDPOINT: &str =
    "https://travelpayouts-travelpayouts-flight-data-v1.p.rapidapi.com/v1/city-directions";
const DESTINATIONS_HOST: &str = "travelpayouts-travelpayouts-flight-data-v1.p.rapidapi.com";
const RESULTS_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
struct FlightPricesArgs {
    origin: String,
    destination: Option<String>,
    departure_at: Option<String>,
    return_at: Option<String>,
    one_way: Option<bool>,
    direct: Option<bool>,
    sorting: Option<String>,
}

/// Flight ticket prices between IATA codes, via the Travelpayouts data API.
/// The ticket list is passed through to the model untouched.
pub struct FlightPricesFunction {
    token: String,
    client: reqwest::Client,
}

impl FlightPricesFunction {
    pub fn new(token: String) -> Self {
        Self {
            token,
            client: reqwest::Client::new(),
        }
    }

    fn query_params(&self, args: &FlightPricesArgs) -> Vec<(&'static str, String)> {
        let mut params = vec![("origin", args.origin.clone())];
        if let Some(destination) = &args.destination {
            params.push(("destination", destination.clone()));
        }
        if let Some(departure_at) = &args.departure_at {
            params.push(("departure_at", departure_at.clone()));
        }
        if let Some(return_at) = &args.return_at {
            params.push(("return_at", return_at.clone()));
        }
        if let Some(sorting) = &args.sorting {
            params.push(("sorting", sorting.clone()));
        }
        if let Some(direct) = args.direct {
            params.push(("direct", direct.to_string()));
        }
        if let Some(one_way) = args.one_way {
            params.push(("one_way", one_way.to_string()));
        }
        params.push(("currency", "USD".to_string()));
        params.push(("market", "us".to_string()));
        params.push(("limit", RESULTS_LIMIT.to_string()));
        params.push(("token", self.token.clone()));
        params
    }
}

#[async_trait]
impl Function for FlightPricesFunction {
    fn name(&self) -> &str {
        "flight_prices"
    }

    fn description(&self) -> &str {
        "Returns flight tickets for specific destinations and dates."
    }

    fn parameters(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "origin": {
                    "type": "string",
                    "pattern": "^[A-Z]{3}$",
                    "description": "An IATA code of a city or an airport of the origin."
                },
                "destination": {
                    "type": "string",
                    "pattern": "^[A-Z]{3}$",
                    "description": "An IATA code of a city or an airport of the destination. Required if \"origin\" is not specified."
                },
                "departure_at": {
                    "type": "string",
                    "pattern": "^\\d{4}-\\d{2}(-\\d{2})?$",
                    "description": "The departure date in \"YYYY-MM\" or \"YYYY-MM-DD\" format."
                },
                "return_at": {
                    "type": "string",
                    "pattern": "^\\d{4}-\\d{2}(-\\d{2})?$",
                    "description": "The return date in \"YYYY-MM\" or \"YYYY-MM-DD\" format. Do not specify for one-way tickets."
                },
                "one_way": {
                    "type": "boolean",
                    "description": "Indicates if the ticket is one-way (true) or round-trip (false)."
                },
                "direct": {
                    "type": "boolean",
                    "default": false,
                    "description": "Indicates if only non-stop tickets should be returned. Default is false."
                },
                "sorting": {
                    "type": "string",
                    "enum": ["price", "route"],
                    "default": "price",
                    "description": "The sorting method of prices. Default is \"price\"."
                }
            },
            "required": ["origin"]
        })
    }

    async fn call(&self, args: &str) -> Result<FunctionValue, FunctionError> {
        let args: FlightPricesArgs = parse_args(self.name(), args)?;

        let response = self
            .client
            .get(PRICES_ENDPOINT)
            .query(&self.query_params(&args))
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

        Ok(FunctionValue::Json(response.text().await?))
    }
}

#[derive(Debug, Deserialize)]
struct PopularDestinationsArgs {
    origin_iata: String,
}

/// Most popular flight directions from a city, via the Travelpayouts flight
/// data API on RapidAPI. Only destination and price survive the reshape.
pub struct PopularDestinationsFunction {
    access_token: String,
    rapidapi_key: String,
    client: reqwest::Client,
}

impl PopularDestinationsFunction {
    pub fn new(access_token: String, rapidapi_key: String) -> Self {
        Self {
            access_token,
            rapidapi_key,
            client: reqwest::Client::new(),
        }
    }

    fn reshape(&self, full: &serde_json::Value) -> Result<serde_json::Value, FunctionError> {
        let directions = full
            .get("data")
            .and_then(|value| value.as_object())
            .ok_or_else(|| FunctionError::UnexpectedResult {
                name: self.name().to_string(),
                detail: "missing 'data' object".to_string(),
            })?;

        let trimmed: Vec<serde_json::Value> = directions
            .values()
            .take(RESULTS_LIMIT)
            .map(|direction| {
                json!({
                    "destination": direction.get("destination"),
                    "price": direction.get("price"),
                })
            })
            .collect();

        Ok(serde_json::Value::Array(trimmed))
    }
}

#[async_trait]
impl Function for PopularDestinationsFunction {
    fn name(&self) -> &str {
        "popular_destinations"
    }

    fn description(&self) -> &str {
        "Gets the most popular directions from a specified city. Convert tool output to full city names."
    }

    fn parameters(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "origin_iata": {
                    "type": "string",
                    "pattern": "^[A-Z]{2,3}$",
                    "description": "The point of departure. Must be an IATA city code or a country code, 2 to 3 symbols in length."
                }
            },
            "required": ["origin_iata"]
        })
    }

    async fn call(&self, args: &str) -> Result<FunctionValue, FunctionError> {
        let args: PopularDestinationsArgs = parse_args(self.name(), args)?;

        let response = self
            .client
            .get(DESTINATIONS_ENDPOINT)
            .query(&[("origin", args.origin_iata.as_str()), ("currency", "USD")])
            .header("X-Access-Token", &self.access_token)
            .header("X-RapidAPI-Key", &self.rapidapi_key)
            .header("X-RapidAPI-Host", DESTINATIONS_HOST)
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
        let reshaped = self.reshape(&full)?;
        Ok(FunctionValue::Json(reshaped.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params_include_only_provided_args() {
        let function = FlightPricesFunction::new("tok".to_string());
        let args = FlightPricesArgs {
            origin: "SFO".to_string(),
            destination: Some("LIS".to_string()),
            departure_at: Some("2026-09".to_string()),
            return_at: None,
            one_way: Some(true),
            direct: None,
            sorting: None,
        };
        let params = function.query_params(&args);
        assert!(params.contains(&("origin", "SFO".to_string())));
        assert!(params.contains(&("destination", "LIS".to_string())));
        assert!(params.contains(&("departure_at", "2026-09".to_string())));
        assert!(params.contains(&("one_way", "true".to_string())));
        assert!(!params.iter().any(|(key, _)| *key == "return_at"));
        assert!(!params.iter().any(|(key, _)| *key == "direct"));
        // fixed request shape
        assert!(params.contains(&("currency", "USD".to_string())));
        assert!(params.contains(&("market", "us".to_string())));
        assert!(params.contains(&("limit", "10".to_string())));
        assert!(params.contains(&("token", "tok".to_string())));
    }

    #[tokio::test]
    async fn test_flight_prices_require_origin() {
        let function = FlightPricesFunction::new("tok".to_string());
        let result = function.call("{\"destination\":\"LIS\"}").await;
        assert!(matches!(result, Err(FunctionError::BadArguments { .. })));
    }

    #[test]
    fn test_reshape_keeps_destination_and_price() {
        let function = PopularDestinationsFunction::new("t".to_string(), "k".to_string());
        let full = json!({
            "data": {
                "LAX": {"destination": "LAX", "price": 150, "airline": "AA", "flight_number": 11},
                "JFK": {"destination": "JFK", "price": 99, "airline": "DL", "flight_number": 22}
            }
        });
        let reshaped = function.reshape(&full).unwrap();
        let entries = reshaped.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        for entry in entries {
            assert!(entry.get("destination").is_some());
            assert!(entry.get("price").is_some());
            assert!(entry.get("airline").is_none());
        }
    }

    #[test]
    fn test_reshape_rejects_missing_data() {
        let function = PopularDestinationsFunction::new("t".to_string(), "k".to_string());
        let result = function.reshape(&json!({"error": "no access"}));
        assert!(matches!(result, Err(FunctionError::UnexpectedResult { .. })));
    }
}
