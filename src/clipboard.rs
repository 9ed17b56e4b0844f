use wasm_bindgen_futures::JsFuture;

/// Write `text` to the system clipboard. Returns whether the write
/// succeeded; permission failures just come back as `false` and the caller
/// decides how to surface them.
pub async fn write_text(text: &str) -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    let clipboard = window.navigator().clipboard();
    JsFuture::from(clipboard.write_text(text)).await.is_ok()
}
