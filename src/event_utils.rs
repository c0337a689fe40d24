use gloo::events::{EventListener, EventListenerOptions};
use gloo::utils::window;
use wasm_bindgen::JsCast;
use web_sys::KeyboardEvent;

pub fn is_escape(key: &str) -> bool {
    matches!(key, "Escape" | "Esc")
}

/// Calls `cb` whenever Escape is pressed anywhere in the window.
///
/// The listener is removed when the returned handle is dropped.
pub fn on_escape(mut cb: impl FnMut() + 'static) -> EventListener {
    EventListener::new_with_options(&window(), "keydown", EventListenerOptions::default(), move |event| {
        if let Some(key_event) = event.dyn_ref::<KeyboardEvent>() {
            if is_escape(&key_event.key()) {
                cb();
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_both_escape_spellings() {
        assert!(is_escape("Escape"));
        assert!(is_escape("Esc"));
        assert!(!is_escape("Enter"));
    }
}
