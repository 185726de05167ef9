use std::env;

use anyhow::{bail, Result};
use firechat_functions::{
    FlightPricesFunction, FunctionRegistry, GenerateImageFunction, NewsSearchFunction,
    PopularDestinationsFunction, RenderChartFunction, StockQuoteFunction,
    WeatherHistoryFunction, WebSearchFunction,
};

/// Provider credentials pulled from the environment. A missing key disables
/// the function rather than failing startup, unless it was explicitly
/// requested.
struct ProviderKeys {
    alphavantage: Option<String>,
    bing: Option<String>,
    visualcrossing: Option<String>,
    travelpayouts: Option<String>,
    rapidapi: Option<String>,
}

impl ProviderKeys {
    fn from_env() -> Self {
        Self {
            alphavantage: env::var("ALPHAVANTAGE_KEY").ok(),
            bing: env::var("BING_SEARCH_KEY").ok(),
            visualcrossing: env::var("VISUALCROSSING_KEY").ok(),
            travelpayouts: env::var("TRAVELPAYOUTS_KEY").ok(),
            rapidapi: env::var("RAPIDAPI_KEY").ok(),
        }
    }
}

/// Assemble the function registry from an allowlist of names. An empty
/// allowlist means "everything with credentials available".
pub fn build_registry(
    allowlist: &[String],
    fireworks_api_key: &str,
    api_base: &str,
) -> Result<FunctionRegistry> {
    let keys = ProviderKeys::from_env();
    let explicit = !allowlist.is_empty();
    let wanted = |name: &str| !explicit || allowlist.iter().any(|n| n == name);

    let mut registry = FunctionRegistry::new();

    if wanted("stock_quote") {
        match &keys.alphavantage {
            Some(key) => registry.register(StockQuoteFunction::new(key.clone())),
            None if explicit => bail!("stock_quote requires ALPHAVANTAGE_KEY"),
            None => {}
        }
    }
    if wanted("news_search") {
        match &keys.bing {
            Some(key) => registry.register(NewsSearchFunction::new(key.clone())),
            None if explicit => bail!("news_search requires BING_SEARCH_KEY"),
            None => {}
        }
    }
    if wanted("web_search") {
        match &keys.bing {
            Some(key) => registry.register(WebSearchFunction::new(key.clone())),
            None if explicit => bail!("web_search requires BING_SEARCH_KEY"),
            None => {}
        }
    }
    if wanted("flight_prices") {
        match &keys.travelpayouts {
            Some(token) => registry.register(FlightPricesFunction::new(token.clone())),
            None if explicit => bail!("flight_prices requires TRAVELPAYOUTS_KEY"),
            None => {}
        }
    }
    if wanted("popular_destinations") {
        match (&keys.travelpayouts, &keys.rapidapi) {
            (Some(token), Some(key)) => registry
                .register(PopularDestinationsFunction::new(token.clone(), key.clone())),
            _ if explicit => {
                bail!("popular_destinations requires TRAVELPAYOUTS_KEY and RAPIDAPI_KEY")
            }
            _ => {}
        }
    }
    if wanted("weather_history") {
        match &keys.visualcrossing {
            Some(key) => registry.register(WeatherHistoryFunction::new(key.clone())),
            None if explicit => bail!("weather_history requires VISUALCROSSING_KEY"),
            None => {}
        }
    }
    if wanted("generate_image") {
        registry.register(GenerateImageFunction::new(
            fireworks_api_key.to_string(),
            api_base.to_string(),
        ));
    }
    if wanted("render_chart") {
        registry.register(RenderChartFunction::new());
    }

    if explicit {
        for name in allowlist {
            if !registry.has(name) {
                bail!("unknown function '{}'", name);
            }
        }
    }

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_allowlist_enables_keyless_functions() {
        let registry = build_registry(&[], "fw-key", "https://example.test/v1").unwrap();
        assert!(registry.has("generate_image"));
        assert!(registry.has("render_chart"));
    }

    #[test]
    fn test_unknown_function_name_is_rejected() {
        let allowlist = vec!["does_not_exist".to_string()];
        assert!(build_registry(&allowlist, "fw-key", "https://example.test/v1").is_err());
    }

    #[test]
    fn test_travel_functions_register_with_keys() {
        env::set_var("TRAVELPAYOUTS_KEY", "tp-token");
        env::set_var("RAPIDAPI_KEY", "ra-key");
        let allowlist = vec![
            "flight_prices".to_string(),
            "popular_destinations".to_string(),
        ];
        let registry = build_registry(&allowlist, "fw-key", "https://example.test/v1").unwrap();
        assert!(registry.has("flight_prices"));
        assert!(registry.has("popular_destinations"));
        assert!(!registry.has("web_search"));
    }

    #[test]
    fn test_explicit_selection_limits_registry() {
        let allowlist = vec!["render_chart".to_string()];
        let registry = build_registry(&allowlist, "fw-key", "https://example.test/v1").unwrap();
        assert!(registry.has("render_chart"));
        assert!(!registry.has("generate_image"));
    }
}
