mod app;
mod clipboard;
mod config;
mod entry;
mod markdown;
#[cfg(feature = "supabase")]
mod realtime;
mod storage;

use app::App;

fn main() {
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(App);
}
