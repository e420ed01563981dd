//! `window.history` backend.

use super::{HistoryBackend, HistoryState, PopStateEvent, PopStateHandler, Subscription};
use crate::error::HistoryError;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

const POPSTATE: &str = "popstate";

fn window() -> Result<web_sys::Window, HistoryError> {
	web_sys::window().ok_or_else(|| HistoryError::Unavailable("no global window".to_string()))
}

fn js_error(value: JsValue) -> HistoryError {
	HistoryError::Platform(format!("{:?}", value))
}

fn state_to_js(state: &HistoryState) -> Result<JsValue, HistoryError> {
	let json = serde_json::to_string(state)?;
	js_sys::JSON::parse(&json).map_err(js_error)
}

fn state_from_js(value: &JsValue) -> Option<HistoryState> {
	if value.is_null() || value.is_undefined() {
		return None;
	}
	let json: String = js_sys::JSON::stringify(value).ok()?.into();
	serde_json::from_str(&json).ok()
}

/// History backed by the browser's session history.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserHistory;

impl BrowserHistory {
	pub fn new() -> Self {
		Self
	}
}

impl HistoryBackend for BrowserHistory {
	fn location(&self) -> Result<String, HistoryError> {
		let location = window()?.location();
		let pathname = location.pathname().map_err(js_error)?;
		let search = location.search().map_err(js_error)?;
		Ok(format!("{}{}", pathname, search))
	}

	fn push_state(&self, state: &HistoryState, url: &str) -> Result<(), HistoryError> {
		let history = window()?.history().map_err(js_error)?;
		history
			.push_state_with_url(&state_to_js(state)?, "", Some(url))
			.map_err(js_error)
	}

	fn subscribe(&self, mut handler: PopStateHandler) -> Result<Subscription, HistoryError> {
		let window = window()?;
		let closure = Closure::wrap(Box::new(move |event: web_sys::Event| {
			let state = event
				.dyn_ref::<web_sys::PopStateEvent>()
				.and_then(|event| state_from_js(&event.state()));
			handler(PopStateEvent::new(state));
		}) as Box<dyn FnMut(web_sys::Event)>);

		window
			.add_event_listener_with_callback(POPSTATE, closure.as_ref().unchecked_ref())
			.map_err(js_error)?;

		Ok(Subscription::new(move || {
			if let Err(error) = window
				.remove_event_listener_with_callback(POPSTATE, closure.as_ref().unchecked_ref())
			{
				tracing::warn!(?error, "failed to remove popstate listener");
			}
		}))
	}
}
