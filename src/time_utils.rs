use js_sys::Date;
use std::time::Duration;
use wasm_bindgen::JsValue;

/// Suspends the current task; lets retry and refresh logic run without a browser.
#[allow(async_fn_in_trait)]
pub trait Timer {
    async fn sleep(&self, duration: Duration);
}

/// `setTimeout`-backed timer
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTimer;

impl Timer for GlooTimer {
    async fn sleep(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }
}

/// `HH:MM:SS` from raw hour/minute/second components
pub fn format_hms(hours: u32, minutes: u32, seconds: u32) -> String {
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Local wall-clock time of a millisecond timestamp
pub fn format_local_time(timestamp: u64) -> String {
    let date = Date::new(&JsValue::from_f64(timestamp as f64));
    format_hms(date.get_hours(), date.get_minutes(), date.get_seconds())
}

/// Caption under the asset list
pub fn format_last_update(timestamp: Option<u64>) -> String {
    match timestamp {
        Some(ts) => format!("Last updated: {}", format_local_time(ts)),
        None => "Last updated: Never".to_string(),
    }
}
