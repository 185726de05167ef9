//! Named external functions the model can call, and the registry that
//! exposes their specs to the chat completion request.

mod flights;
mod function;
mod image;
mod news;
mod registry;
mod stock;
mod weather;
mod web;

pub use flights::{FlightPricesFunction, PopularDestinationsFunction};
pub use function::{Function, FunctionError, FunctionValue, ResultKind};
pub use image::{GenerateImageFunction, RenderChartFunction};
pub use news::NewsSearchFunction;
pub use registry::FunctionRegistry;
pub use stock::StockQuoteFunction;
pub use weather::WeatherHistoryFunction;
pub use web::WebSearchFunction;
