use std::time::Duration;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};

use super::timers::{Cancel, TimerSlot};

#[wasm_bindgen]
extern "C" {
	#[wasm_bindgen(js_namespace = ["navigator", "clipboard"], js_name = writeText, catch)]
	fn clipboard_write_text(text: &str) -> Result<js_sys::Promise, JsValue>;
}

/// Writes `text` to the system clipboard. Failures are reported, never thrown.
pub async fn write_clipboard(text: &str) -> bool {
	let promise = match clipboard_write_text(text) {
		Ok(promise) => promise,
		Err(err) => {
			warn!("clipboard unavailable: {err:?}");
			return false;
		}
	};
	match JsFuture::from(promise).await {
		Ok(_) => true,
		Err(err) => {
			warn!("clipboard write failed: {err:?}");
			false
		}
	}
}

/// Transient outcome of the last copy, shown until the reset timer fires.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CopyFeedback {
	#[default]
	Idle,
	Copied,
	Failed,
}

impl CopyFeedback {
	pub fn from_outcome(copied: bool) -> Self {
		if copied {
			CopyFeedback::Copied
		} else {
			CopyFeedback::Failed
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			CopyFeedback::Idle => "Copy",
			CopyFeedback::Copied => "Copied",
			CopyFeedback::Failed => "Copy failed",
		}
	}
}

/// Copy feedback together with the timer that will put it back to idle.
#[derive(Debug)]
pub struct CopyIndicator<H: Cancel> {
	feedback: CopyFeedback,
	reset: TimerSlot<H>,
}

impl<H: Cancel> Default for CopyIndicator<H> {
	fn default() -> Self {
		Self {
			feedback: CopyFeedback::Idle,
			reset: TimerSlot::default(),
		}
	}
}

impl<H: Cancel> CopyIndicator<H> {
	pub fn feedback(&self) -> CopyFeedback {
		self.feedback
	}

	/// Shows the outcome of a copy. `reset` replaces any earlier reset timer,
	/// so a second click restarts the countdown.
	pub fn show(&mut self, copied: bool, reset: Option<H>) {
		self.feedback = CopyFeedback::from_outcome(copied);
		match reset {
			Some(handle) => self.reset.replace(handle),
			None => self.reset.cancel(),
		}
	}

	/// The reset timer ran.
	pub fn expire(&mut self) {
		self.reset.fired();
		self.feedback = CopyFeedback::Idle;
	}

	pub fn cancel(&mut self) {
		self.reset.cancel();
	}
}

#[component]
pub fn CopyButton(
	#[prop(into)] text: Signal<String>,
	#[prop(default = Duration::from_secs(2))] reset: Duration,
) -> impl IntoView {
	let indicator = RwSignal::new(CopyIndicator::<TimeoutHandle>::default());

	on_cleanup(move || {
		indicator.try_update_untracked(CopyIndicator::cancel);
	});

	let on_click = move |_: web_sys::MouseEvent| {
		let text = text.get_untracked();
		spawn_local(async move {
			let copied = write_clipboard(&text).await;
			let handle = set_timeout_with_handle(
				move || {
					indicator.try_update(CopyIndicator::expire);
				},
				reset,
			);
			let handle = match handle {
				Ok(handle) => Some(handle),
				Err(err) => {
					warn!("could not schedule copy reset: {err:?}");
					None
				}
			};
			// view may already be gone
			indicator.try_update(|i| i.show(copied, handle));
		});
	};

	view! {
		<button class="copy-button" title="Copy to clipboard" on:click=on_click>
			{move || indicator.with(|i| i.feedback().label())}
		</button>
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;
	use std::rc::Rc;

	use super::*;
	use crate::components::timers::fake::FakeHandle;

	#[test]
	fn feedback_labels_follow_outcome() {
		assert_eq!(CopyFeedback::default().label(), "Copy");
		assert_eq!(CopyFeedback::from_outcome(true), CopyFeedback::Copied);
		assert_eq!(CopyFeedback::from_outcome(false).label(), "Copy failed");
	}

	#[test]
	fn feedback_returns_to_idle_when_the_reset_fires() {
		let cancelled = Rc::new(RefCell::new(Vec::new()));
		let mut indicator = CopyIndicator::default();

		indicator.show(
			false,
			Some(FakeHandle {
				id: 1,
				cancelled: cancelled.clone(),
			}),
		);
		assert_eq!(indicator.feedback(), CopyFeedback::Failed);

		indicator.expire();
		assert_eq!(indicator.feedback(), CopyFeedback::Idle);
		indicator.cancel();
		assert!(cancelled.borrow().is_empty());
	}

	#[test]
	fn a_second_copy_restarts_the_reset_timer() {
		let cancelled = Rc::new(RefCell::new(Vec::new()));
		let handle = |id| FakeHandle {
			id,
			cancelled: cancelled.clone(),
		};
		let mut indicator = CopyIndicator::default();

		indicator.show(true, Some(handle(1)));
		indicator.show(true, Some(handle(2)));
		assert_eq!(*cancelled.borrow(), [1]);
		assert_eq!(indicator.feedback(), CopyFeedback::Copied);

		// teardown before the second reset fires
		indicator.cancel();
		assert_eq!(*cancelled.borrow(), [1, 2]);
		assert_eq!(indicator.feedback(), CopyFeedback::Copied);

		indicator.expire();
		assert_eq!(indicator.feedback(), CopyFeedback::Idle);
	}
}
