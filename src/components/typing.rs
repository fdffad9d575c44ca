use std::time::Duration;

use leptos::prelude::*;
use log::warn;

use super::timers::TimerSlot;

/// Progress of a one-character-per-tick reveal.
#[derive(Clone, Debug, PartialEq)]
pub struct TypingState {
	text: String,
	revealed: usize,
}

impl TypingState {
	pub fn new(text: impl Into<String>) -> Self {
		Self {
			text: text.into(),
			revealed: 0,
		}
	}

	/// Reveals the next character. Returns false once there is nothing left.
	pub fn tick(&mut self) -> bool {
		if self.is_complete() {
			return false;
		}
		self.revealed += 1;
		true
	}

	pub fn displayed(&self) -> &str {
		match self.text.char_indices().nth(self.revealed) {
			Some((end, _)) => &self.text[..end],
			None => &self.text,
		}
	}

	pub fn is_complete(&self) -> bool {
		self.revealed >= self.text.chars().count()
	}
}

type TickSlot = StoredValue<TimerSlot<TimeoutHandle>>;

fn schedule_tick(typing: RwSignal<TypingState>, slot: TickSlot, speed: Duration) {
	let idle = slot.try_with_value(|s| !s.is_pending()).unwrap_or(false);
	if !idle || typing.with_untracked(TypingState::is_complete) {
		return;
	}
	let handle = set_timeout_with_handle(
		move || {
			slot.try_update_value(TimerSlot::fired);
			if typing.try_update(|t| t.tick()).is_some() {
				schedule_tick(typing, slot, speed);
			}
		},
		speed,
	);
	match handle {
		Ok(handle) => {
			slot.try_update_value(|s| s.replace(handle));
		}
		Err(err) => warn!("typing animation stopped: {err:?}"),
	}
}

/// Shell prompt that types `text` out one character at a time.
#[component]
pub fn TypingAnimation(
	#[prop(into)] text: String,
	#[prop(default = Duration::from_millis(100))] speed: Duration,
) -> impl IntoView {
	let typing = RwSignal::new(TypingState::new(text));
	let tick_slot: TickSlot = StoredValue::new(TimerSlot::default());

	schedule_tick(typing, tick_slot, speed);
	on_cleanup(move || {
		tick_slot.try_update_value(TimerSlot::cancel);
	});

	view! {
		<div class="typing">
			<span class="typing-prompt">"$"</span>
			<span class="typing-text">
				{move || typing.with(|t| t.displayed().to_string())}
				<Show when=move || !typing.with(TypingState::is_complete)>
					<span class="typing-caret">"|"</span>
				</Show>
			</span>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn reveals_one_character_per_tick() {
		let mut typing = TypingState::new("nail");
		assert_eq!(typing.displayed(), "");
		assert!(typing.tick());
		assert_eq!(typing.displayed(), "n");
		assert!(typing.tick());
		assert!(typing.tick());
		assert!(!typing.is_complete());
		assert!(typing.tick());
		assert_eq!(typing.displayed(), "nail");
		assert!(typing.is_complete());
		assert!(!typing.tick());
		assert_eq!(typing.displayed(), "nail");
	}

	#[test]
	fn respects_multibyte_characters() {
		let mut typing = TypingState::new("é$");
		typing.tick();
		assert_eq!(typing.displayed(), "é");
	}

	#[test]
	fn empty_text_is_complete_immediately() {
		assert!(TypingState::new("").is_complete());
	}
}
