//! Application use cases

pub mod batch;
pub mod quote_service;

pub use batch::{generate_quote_report, quote_batch, BatchQuoteResult};
pub use quote_service::{estimate_route, resolve_vehicle, QuoteRequest, QuoteResponse, QuoteService, RouteReport};
