use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::function::{parse_args, Function, FunctionError, FunctionValue};

const NEWS_ENDPOINT: &str = "https://api.bing.microsoft.com/v7.0/news/search";
const RESULTS_COUNT: usize = 5;

#[derive(Debug, Deserialize)]
struct NewsSearchArgs {
    query: String,
}

/// Recent news articles for a query, via the Bing news API. Only article
/// descriptions are fed back to keep the tool output small.
pub struct NewsSearchFunction {
    api_key: String,
    client: reqwest::Client,
}

impl NewsSearchFunction {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
        }
    }

    fn reshape(&self, full: &serde_json::Value) -> Result<serde_json::Value, FunctionError> {
        let items = full
            .get("value")
            .and_then(|value| value.as_array())
            .ok_or_else(|| FunctionError::UnexpectedResult {
                name: self.name().to_string(),
                detail: "missing 'value' array".to_string(),
            })?;

        let descriptions: Vec<serde_json::Value> = items
            .iter()
            .map(|item| json!({ "description": item.get("description") }))
            .collect();

        Ok(json!({ "newsArticles": { "value": descriptions } }))
    }
}

#[async_trait]
impl Function for NewsSearchFunction {
    fn name(&self) -> &str {
        "news_search"
    }

    fn description(&self) -> &str {
        "get recent news articles related to a query"
    }

    fn parameters(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "description": "news search query",
                    "type": "string"
                }
            },
            "required": ["query"]
        })
    }

    async fn call(&self, args: &str) -> Result<FunctionValue, FunctionError> {
        let args: NewsSearchArgs = parse_args(self.name(), args)?;

        let response = self
            .client
            .get(NEWS_ENDPOINT)
            .query(&[
                ("q", args.query.as_str()),
                ("count", &RESULTS_COUNT.to_string()),
                ("sortBy", "date"),
                ("mkt", "en-us"),
            ])
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
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
    fn test_reshape_keeps_descriptions_only() {
        let function = NewsSearchFunction::new("k".to_string());
        let full = json!({
            "value": [
                {"name": "a", "url": "http://a", "description": "first"},
                {"name": "b", "url": "http://b", "description": "second"}
            ]
        });
        let reshaped = function.reshape(&full).unwrap();
        let value = reshaped["newsArticles"]["value"].as_array().unwrap();
        assert_eq!(value.len(), 2);
        assert_eq!(value[0]["description"], "first");
        assert!(value[0].get("url").is_none());
    }

    #[test]
    fn test_reshape_rejects_unexpected_payload() {
        let function = NewsSearchFunction::new("k".to_string());
        let result = function.reshape(&json!({"oops": true}));
        assert!(matches!(result, Err(FunctionError::UnexpectedResult { .. })));
    }
}
