pub mod config;
pub mod error;
pub mod logging;

// Delivery plumbing
pub mod client;
pub mod payload;
pub mod retry;
pub mod transport;

// Resolvers
pub mod http_post;
pub mod log_resolver;
pub mod resolver;

pub use config::RuleConfig;
pub use error::{AlertDeliveryError, ConfigError, PayloadError, ResolveError};
pub use http_post::HttpResolver;
pub use log_resolver::LogResolver;
pub use resolver::{Resolver, ResolverKind};
