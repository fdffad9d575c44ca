use log::{debug, info, trace};

use super::error::DiagramError;

/// Whether the diagram may be edited right now.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EditMode {
	/// No capability. Only relayout on resize happens.
	#[default]
	Locked,
	/// Capability present, operator has not switched editing on.
	UnlockedInactive,
	UnlockedActive,
}

/// Edit-mode state machine plus the current edge selection.
///
/// Every mutating diagram operation calls [`EditSession::authorize`] first, so
/// the gate holds even when the visible controls are bypassed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditSession {
	mode: EditMode,
	selected_edge: Option<String>,
}

impl EditSession {
	pub fn mode(&self) -> EditMode {
		self.mode
	}

	pub fn editing_enabled(&self) -> bool {
		self.mode != EditMode::Locked
	}

	pub fn editing_active(&self) -> bool {
		self.mode == EditMode::UnlockedActive
	}

	pub fn selected_edge(&self) -> Option<&str> {
		self.selected_edge.as_deref()
	}

	/// Feeds the trusted-environment check. Losing it always locks.
	pub fn set_capability(&mut self, trusted: bool) {
		let next = match (trusted, self.mode) {
			(false, _) => EditMode::Locked,
			(true, EditMode::Locked) => EditMode::UnlockedInactive,
			(true, mode) => mode,
		};
		if next != self.mode {
			info!("edit mode {:?} -> {:?}", self.mode, next);
		}
		self.mode = next;
		if !self.editing_active() {
			self.selected_edge = None;
		}
	}

	/// Operator toggle. Does nothing while locked; returns whether editing is active.
	pub fn toggle(&mut self) -> bool {
		self.mode = match self.mode {
			EditMode::Locked => {
				debug!("editing toggle ignored: no capability");
				EditMode::Locked
			}
			EditMode::UnlockedInactive => EditMode::UnlockedActive,
			EditMode::UnlockedActive => {
				self.selected_edge = None;
				EditMode::UnlockedInactive
			}
		};
		self.editing_active()
	}

	pub fn authorize(&self) -> Result<(), DiagramError> {
		if self.editing_active() {
			Ok(())
		} else {
			trace!("mutation refused in {:?}", self.mode);
			Err(DiagramError::CapabilityDenied)
		}
	}

	pub fn select_edge(&mut self, id: impl Into<String>) -> Result<(), DiagramError> {
		self.authorize()?;
		self.selected_edge = Some(id.into());
		Ok(())
	}

	pub fn clear_selection(&mut self) {
		self.selected_edge = None;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn active() -> EditSession {
		let mut session = EditSession::default();
		session.set_capability(true);
		assert!(session.toggle());
		session
	}

	#[test]
	fn starts_locked() {
		let session = EditSession::default();
		assert_eq!(session.mode(), EditMode::Locked);
		assert!(!session.editing_enabled());
		assert_eq!(session.authorize(), Err(DiagramError::CapabilityDenied));
	}

	#[test]
	fn toggle_without_capability_stays_inactive() {
		let mut session = EditSession::default();
		session.set_capability(false);
		assert!(!session.toggle());
		assert!(!session.editing_active());
		assert_eq!(session.mode(), EditMode::Locked);
	}

	#[test]
	fn capability_then_toggle_flips_between_unlocked_states() {
		let mut session = EditSession::default();
		session.set_capability(true);
		assert_eq!(session.mode(), EditMode::UnlockedInactive);
		assert_eq!(session.authorize(), Err(DiagramError::CapabilityDenied));

		assert!(session.toggle());
		assert_eq!(session.mode(), EditMode::UnlockedActive);
		assert!(session.authorize().is_ok());

		assert!(!session.toggle());
		assert_eq!(session.mode(), EditMode::UnlockedInactive);
	}

	#[test]
	fn toggling_off_clears_selection() {
		let mut session = active();
		session.select_edge("a-b").unwrap();
		assert_eq!(session.selected_edge(), Some("a-b"));

		session.toggle();
		assert_eq!(session.selected_edge(), None);
	}

	#[test]
	fn losing_capability_locks_and_clears_selection() {
		let mut session = active();
		session.select_edge("a-b").unwrap();

		session.set_capability(false);
		assert_eq!(session.mode(), EditMode::Locked);
		assert_eq!(session.selected_edge(), None);

		session.set_capability(true);
		assert_eq!(session.mode(), EditMode::UnlockedInactive);
	}

	#[test]
	fn repeated_capability_keeps_active_mode() {
		let mut session = active();
		session.set_capability(true);
		assert_eq!(session.mode(), EditMode::UnlockedActive);
	}

	#[test]
	fn selection_requires_active_editing() {
		let mut session = EditSession::default();
		session.set_capability(true);
		assert_eq!(session.select_edge("a-b"), Err(DiagramError::CapabilityDenied));
		assert_eq!(session.selected_edge(), None);
	}
}
