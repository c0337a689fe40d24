use crate::domain::export::ExportArtifact;
use gloo::utils::document;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

/// Hands the artifact to the browser as a file download via a temporary object URL.
pub fn download_artifact(artifact: &ExportArtifact) -> Result<(), JsValue> {
    let parts = js_sys::Array::of1(&JsValue::from_str(&artifact.content));
    let options = BlobPropertyBag::new();
    options.set_type(&artifact.mime_type);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let anchor: HtmlAnchorElement = document().create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(&artifact.file_name);
    anchor.click();

    Url::revoke_object_url(&url)
}
