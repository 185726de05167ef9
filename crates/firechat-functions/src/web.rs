use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::function::{parse_args, Function, FunctionError, FunctionValue};

const SEARCH_ENDPOINT: &str = "https://api.bing.microsoft.com/v7.0/search";
const RESULTS_COUNT: usize = 5;

#[derive(Debug, Deserialize)]
struct WebSearchArgs {
    query: String,
}

/// General web search via the Bing search API. Results are cut down to
/// name, url and snippet per page.
pub struct WebSearchFunction {
    api_key: String,
    client: reqwest::Client,
}

impl WebSearchFunction {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
        }
    }

    fn reshape(&self, full: &serde_json::Value) -> Result<serde_json::Value, FunctionError> {
        let pages = full
            .get("webPages")
            .and_then(|value| value.get("value"))
            .and_then(|value| value.as_array())
            .ok_or_else(|| FunctionError::UnexpectedResult {
                name: self.name().to_string(),
                detail: "missing 'webPages.value' array".to_string(),
            })?;

        let trimmed: Vec<serde_json::Value> = pages
            .iter()
            .map(|page| {
                json!({
                    "name": page.get("name"),
                    "url": page.get("url"),
                    "snippet": page.get("snippet"),
                })
            })
            .collect();

        Ok(json!({ "webPages": { "value": trimmed } }))
    }
}

#[async_trait]
impl Function for WebSearchFunction {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "get information from the web"
    }

    fn parameters(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "description": "search query",
                    "type": "string"
                }
            },
            "required": ["query"]
        })
    }

    async fn call(&self, args: &str) -> Result<FunctionValue, FunctionError> {
        let args: WebSearchArgs = parse_args(self.name(), args)?;

        let response = self
            .client
            .get(SEARCH_ENDPOINT)
            .query(&[
                ("q", args.query.as_str()),
                ("count", &RESULTS_COUNT.to_string()),
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
