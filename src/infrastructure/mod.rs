//! Browser-facing adapters: HTTP, storage, console and clock.

pub mod http;
pub mod services;
pub mod storage;
