use std::time::Duration;

/// Hosts on which the diagram editor is unlocked.
pub const TRUSTED_HOSTS: &[&str] = &["localhost", "127.0.0.1", "[::1]", "::1", "0.0.0.0"];

/// Tunables of the hero diagram and its widgets.
#[derive(Clone, Debug, PartialEq)]
pub struct DiagramConfig {
	/// Quiet time after the last resize event before relayout + fit.
	pub resize_settle: Duration,
	/// Space left around the diagram by fit-to-view, as a fraction of its size.
	pub fit_padding: f64,
	/// How long copy feedback stays visible.
	pub copy_reset: Duration,
	/// Delay between revealed characters of the typing animation.
	pub typing_speed: Duration,
	pub trusted_hosts: Vec<String>,
}

impl Default for DiagramConfig {
	fn default() -> Self {
		Self {
			resize_settle: Duration::from_millis(100),
			fit_padding: 0.3,
			copy_reset: Duration::from_secs(2),
			typing_speed: Duration::from_millis(50),
			trusted_hosts: TRUSTED_HOSTS.iter().map(|h| h.to_string()).collect(),
		}
	}
}

impl DiagramConfig {
	pub fn is_trusted_host(&self, host: &str) -> bool {
		let host = host.trim().to_ascii_lowercase();
		self.trusted_hosts.iter().any(|h| *h == host)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn only_local_hosts_are_trusted() {
		let config = DiagramConfig::default();
		assert!(config.is_trusted_host("localhost"));
		assert!(config.is_trusted_host("LOCALHOST"));
		assert!(config.is_trusted_host("127.0.0.1"));
		assert!(!config.is_trusted_host("zodula.dev"));
		assert!(!config.is_trusted_host("localhost.evil.com"));
		assert!(!config.is_trusted_host(""));
	}
}
