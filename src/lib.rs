pub mod config;
pub mod error;
pub mod goal_markets;
pub mod http_client;
pub mod logging;
pub mod model;
pub mod notifier;
pub mod pipeline;
pub mod squad_stats_fetch;
