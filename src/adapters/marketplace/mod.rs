//! Marketplace adapters.
//!
//! - `HttpMarketplaceClient` - the marketplace REST API
//! - `InMemoryMarketplace` - local gigs and profiles for tests and offline runs

mod http_client;
mod in_memory;

pub use http_client::{HttpMarketplaceClient, MarketplaceClientConfig};
pub use in_memory::InMemoryMarketplace;
