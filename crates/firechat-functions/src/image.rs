use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::function::{parse_args, Function, FunctionError, FunctionValue, ResultKind};

const DEFAULT_IMAGE_MODEL: &str = "stable-diffusion-xl-1024-v1-0";
const CHART_ENDPOINT: &str = "https://quickchart.io/chart";

#[derive(Debug, Deserialize)]
struct GenerateImageArgs {
    prompt: String,
}

/// Text-to-image generation against the inference platform. Result is a
/// binary PNG, declared as such so the orchestrator stores it and feeds an
/// `image_url` reference back to the model.
pub struct GenerateImageFunction {
    api_key: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl GenerateImageFunction {
    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url,
            model: DEFAULT_IMAGE_MODEL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn generation_url(&self) -> String {
        format!(
            "{}/image_generation/accounts/fireworks/models/{}",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl Function for GenerateImageFunction {
    fn name(&self) -> &str {
        "generate_image"
    }

    fn description(&self) -> &str {
        "Generates an image from a text prompt and returns it for display."
    }

    fn parameters(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "prompt": {
                    "description": "text description of the image to generate",
                    "type": "string"
                }
            },
            "required": ["prompt"]
        })
    }

    fn result_kind(&self) -> ResultKind {
        ResultKind::BinaryImage
    }

    async fn call(&self, args: &str) -> Result<FunctionValue, FunctionError> {
        let args: GenerateImageArgs = parse_args(self.name(), args)?;

        let response = self
            .client
            .post(self.generation_url())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "image/png")
            .json(&json!({ "prompt": args.prompt }))
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

        Ok(FunctionValue::Image(response.bytes().await?.to_vec()))
    }
}

#[derive(Debug, Deserialize)]
struct RenderChartArgs {
    /// Chart.js configuration object.
    config: serde_json::Value,
}

/// Renders a Chart.js configuration to a PNG via QuickChart.
pub struct RenderChartFunction {
    client: reqwest::Client,
}

impl RenderChartFunction {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for RenderChartFunction {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Function for RenderChartFunction {
    fn name(&self) -> &str {
        "render_chart"
    }

    fn description(&self) -> &str {
        "Renders a chart from a Chart.js configuration object and returns it as an image."
    }

    fn parameters(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "config": {
                    "description": "Chart.js configuration object describing the chart to render",
                    "type": "object"
                }
            },
            "required": ["config"]
        })
    }

    fn result_kind(&self) -> ResultKind {
        ResultKind::BinaryImage
    }

    async fn call(&self, args: &str) -> Result<FunctionValue, FunctionError> {
        let args: RenderChartArgs = parse_args(self.name(), args)?;

        let response = self
            .client
            .get(CHART_ENDPOINT)
            .query(&[("c", args.config.to_string()), ("format", "png".to_string())])
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

        Ok(FunctionValue::Image(response.bytes().await?.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_functions_declare_binary_kind() {
        let image = GenerateImageFunction::new("k".to_string(), "https://example.test/v1".to_string());
        assert_eq!(image.result_kind(), ResultKind::BinaryImage);
        assert_eq!(
            image.generation_url(),
            "https://example.test/v1/image_generation/accounts/fireworks/models/stable-diffusion-xl-1024-v1-0"
        );

        let chart = RenderChartFunction::new();
        assert_eq!(chart.result_kind(), ResultKind::BinaryImage);
    }

    #[tokio::test]
    async fn test_chart_args_require_config() {
        let chart = RenderChartFunction::new();
        let result = chart.call("{\"data\":[1,2]}").await;
        assert!(matches!(result, Err(FunctionError::BadArguments { .. })));
    }
}
