//! Market data aggregate: assets, snapshots, the repository port and stats.

pub mod entities;
pub mod repositories;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use repositories::MarketDataRepository;
pub use services::{MarketStats, MarketStatsService};
pub use value_objects::*;
