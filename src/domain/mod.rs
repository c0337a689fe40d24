//! Pure dashboard model, free of browser APIs.

pub mod chart;
pub mod errors;
pub mod events;
pub mod export;
pub mod logging;
pub mod market_data;
pub mod preferences;
pub mod selection;
