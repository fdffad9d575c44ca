//! One-pending-task-per-concern timer slots.
//!
//! Each slot owns at most one scheduled callback. Scheduling again cancels the
//! one already pending, which is what debounces resize bursts; dropping the
//! owning view cancels whatever is left.

use leptos::prelude::TimeoutHandle;

/// Something that can stop a scheduled callback from running.
pub trait Cancel {
	fn cancel(self);
}

impl Cancel for TimeoutHandle {
	fn cancel(self) {
		self.clear();
	}
}

#[derive(Debug)]
pub struct TimerSlot<H: Cancel> {
	pending: Option<H>,
}

impl<H: Cancel> Default for TimerSlot<H> {
	fn default() -> Self {
		Self { pending: None }
	}
}

impl<H: Cancel> TimerSlot<H> {
	/// Stores `handle`, cancelling the previously pending one.
	pub fn replace(&mut self, handle: H) {
		if let Some(previous) = self.pending.replace(handle) {
			previous.cancel();
		}
	}

	/// Marks the pending callback as having run.
	pub fn fired(&mut self) {
		self.pending = None;
	}

	pub fn cancel(&mut self) {
		if let Some(handle) = self.pending.take() {
			handle.cancel();
		}
	}

	pub fn is_pending(&self) -> bool {
		self.pending.is_some()
	}
}


#[cfg(test)]
mod tests {
	use std::cell::RefCell;
	use std::rc::Rc;

	use super::fake::FakeHandle;
	use super::*;

	#[test]
	fn replacing_cancels_the_pending_handle() {
		let cancelled = Rc::new(RefCell::new(Vec::new()));
		let handle = |id| FakeHandle {
			id,
			cancelled: cancelled.clone(),
		};
		let mut slot = TimerSlot::default();

		// a burst of three resizes leaves only the last one scheduled
		slot.replace(handle(1));
		slot.replace(handle(2));
		slot.replace(handle(3));
		assert_eq!(*cancelled.borrow(), [1, 2]);
		assert!(slot.is_pending());

		slot.fired();
		assert!(!slot.is_pending());
		slot.cancel();
		assert_eq!(*cancelled.borrow(), [1, 2]);
	}

	#[test]
	fn teardown_cancels_what_is_left() {
		let cancelled = Rc::new(RefCell::new(Vec::new()));
		let mut slot = TimerSlot::default();
		slot.replace(FakeHandle {
			id: 7,
			cancelled: cancelled.clone(),
		});
		slot.cancel();
		assert_eq!(*cancelled.borrow(), [7]);
		assert!(!slot.is_pending());
	}
}
