use async_trait::async_trait;
use serde::Deserialize;

use crate::function::{parse_args, Function, FunctionError, FunctionValue};

#[derive(Debug, Deserialize)]
struct StockQuoteArgs {
    symbol: String,
}

/// Latest price and volume for a stock ticker, via Alpha Vantage.
pub struct StockQuoteFunction {
    api_key: String,
    client: reqwest::Client,
}

impl StockQuoteFunction {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Function for StockQuoteFunction {
    fn name(&self) -> &str {
        "stock_quote"
    }

    fn description(&self) -> &str {
        "Obtains the latest price and volume information for a given stock ticker symbol."
    }

    fn parameters(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "symbol": {
                    "description": "the stock ticker symbol whose price should be quoted",
                    "type": "string"
                }
            },
            "required": ["symbol"]
        })
    }

    async fn call(&self, args: &str) -> Result<FunctionValue, FunctionError> {
        let args: StockQuoteArgs = parse_args(self.name(), args)?;

        let url = format!(
            "https://www.alphavantage.co/query?function=GLOBAL_QUOTE&symbol={}&apikey={}",
            args.symbol, self.api_key
        );
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FunctionError::Upstream {
                name: self.name().to_string(),
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        // quote payload is passed through to the model untouched
        Ok(FunctionValue::Json(response.text().await?))
    }
}
