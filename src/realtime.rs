use std::cell::Cell;

use leptos::logging;
use serde_json::{json, Value};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{MessageEvent, WebSocket};

const TABLE: &str = "clipboard_entries";
const HEARTBEAT_INTERVAL_MS: i32 = 30_000;

/// Push-based change notifications from the Supabase realtime service.
///
/// One long-lived WebSocket joined to the table's Phoenix channel; any
/// insert/update/delete event fires `on_change`, and the caller responds
/// with a full reload of the top-50 list. Last full read wins; there is no
/// incremental patching. The browser callbacks and the heartbeat interval
/// are owned here and released on drop.
pub struct RealtimeListener {
    socket: WebSocket,
    heartbeat_handle: i32,
    _on_open: Closure<dyn FnMut()>,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    _on_error: Closure<dyn FnMut(web_sys::Event)>,
    _heartbeat: Closure<dyn FnMut()>,
}

impl RealtimeListener {
    pub fn connect(
        base_url: &str,
        anon_key: &str,
        on_change: impl Fn() + 'static,
    ) -> Result<Self, JsValue> {
        let ws_url = format!(
            "{}/realtime/v1/websocket?apikey={}&vsn=1.0.0",
            base_url.replacen("http", "ws", 1).trim_end_matches('/'),
            anon_key
        );
        let socket = WebSocket::new(&ws_url)?;

        let join_socket = socket.clone();
        let on_open = Closure::<dyn FnMut()>::new(move || {
            let join = json!({
                "topic": format!("realtime:public:{TABLE}"),
                "event": "phx_join",
                "payload": {
                    "config": {
                        "postgres_changes": [
                            { "event": "*", "schema": "public", "table": TABLE }
                        ]
                    }
                },
                "ref": "1",
            });
            if join_socket.send_with_str(&join.to_string()).is_err() {
                logging::error!("realtime: channel join could not be sent");
            }
        });
        socket.set_onopen(Some(on_open.as_ref().unchecked_ref()));

        let on_message = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
            let Some(text) = event.data().as_string() else {
                return;
            };
            let Ok(message) = serde_json::from_str::<Value>(&text) else {
                return;
            };
            match message["event"].as_str() {
                Some("postgres_changes") => on_change(),
                Some("phx_reply") if message["payload"]["status"] == "error" => {
                    logging::error!("realtime: channel join rejected: {}", message["payload"]);
                }
                _ => {}
            }
        });
        socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));

        let on_error = Closure::<dyn FnMut(web_sys::Event)>::new(move |_| {
            logging::warn!("realtime: websocket error");
        });
        socket.set_onerror(Some(on_error.as_ref().unchecked_ref()));

        let heartbeat_socket = socket.clone();
        let heartbeat_ref = Cell::new(2u64);
        let heartbeat = Closure::<dyn FnMut()>::new(move || {
            let frame = json!({
                "topic": "phoenix",
                "event": "heartbeat",
                "payload": {},
                "ref": heartbeat_ref.get().to_string(),
            });
            heartbeat_ref.set(heartbeat_ref.get() + 1);
            // Send errors here just mean the socket is not open yet.
            let _ = heartbeat_socket.send_with_str(&frame.to_string());
        });
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let heartbeat_handle = window.set_interval_with_callback_and_timeout_and_arguments_0(
            heartbeat.as_ref().unchecked_ref(),
            HEARTBEAT_INTERVAL_MS,
        )?;

        Ok(Self {
            socket,
            heartbeat_handle,
            _on_open: on_open,
            _on_message: on_message,
            _on_error: on_error,
            _heartbeat: heartbeat,
        })
    }
}

impl Drop for RealtimeListener {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(self.heartbeat_handle);
        }
        self.socket.set_onopen(None);
        self.socket.set_onmessage(None);
        self.socket.set_onerror(None);
        let _ = self.socket.close();
    }
}
