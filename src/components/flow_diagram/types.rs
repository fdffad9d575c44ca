use std::fmt;
use std::str::FromStr;

/// A point in layout units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
	pub x: f64,
	pub y: f64,
}

impl Position {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// Discriminant of a [`NodePayload`], as spelled in the DSL.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
	CodeBlock,
	Feature,
	Tagline,
	Command,
}

impl NodeKind {
	pub const ALL: [NodeKind; 4] = [
		NodeKind::CodeBlock,
		NodeKind::Feature,
		NodeKind::Tagline,
		NodeKind::Command,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			NodeKind::CodeBlock => "codeBlock",
			NodeKind::Feature => "feature",
			NodeKind::Tagline => "tagline",
			NodeKind::Command => "command",
		}
	}

	/// Footprint (width, height) in layout units.
	pub fn size(self) -> (f64, f64) {
		match self {
			NodeKind::CodeBlock => (450.0, 520.0),
			NodeKind::Feature => (220.0, 60.0),
			NodeKind::Tagline => (520.0, 96.0),
			NodeKind::Command => (400.0, 56.0),
		}
	}
}

impl fmt::Display for NodeKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for NodeKind {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		NodeKind::ALL.into_iter().find(|k| k.as_str() == s).ok_or(())
	}
}

/// Side of a node an edge attaches to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Anchor {
	Top,
	Right,
	Bottom,
	Left,
}

impl Anchor {
	pub const ALL: [Anchor; 4] = [Anchor::Top, Anchor::Right, Anchor::Bottom, Anchor::Left];

	pub fn as_str(self) -> &'static str {
		match self {
			Anchor::Top => "top",
			Anchor::Right => "right",
			Anchor::Bottom => "bottom",
			Anchor::Left => "left",
		}
	}

	/// Unit vector pointing away from the node on this side.
	pub fn normal(self) -> (f64, f64) {
		match self {
			Anchor::Top => (0.0, -1.0),
			Anchor::Right => (1.0, 0.0),
			Anchor::Bottom => (0.0, 1.0),
			Anchor::Left => (-1.0, 0.0),
		}
	}
}

impl fmt::Display for Anchor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Anchor {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Anchor::ALL.into_iter().find(|a| a.as_str() == s).ok_or(())
	}
}

/// Icons available to feature nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Icon {
	FileText,
	Layers,
	Zap,
	Database,
}

impl Icon {
	/// Single glyph drawn inside the icon badge.
	pub fn glyph(self) -> &'static str {
		match self {
			Icon::FileText => "\u{1F4C4}",
			Icon::Layers => "\u{2261}",
			Icon::Zap => "\u{26A1}",
			Icon::Database => "\u{26C1}",
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CodeBlock {
	pub file_name: String,
	pub source: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
	pub title: String,
	pub icon: Icon,
	/// CSS colour of the icon badge.
	pub accent: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tagline {
	pub title: String,
	pub subtitle: String,
	pub description: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Command {
	pub command: String,
}

/// Kind-specific data of a node. Positioning and connections never look inside.
#[derive(Clone, Debug, PartialEq)]
pub enum NodePayload {
	CodeBlock(CodeBlock),
	Feature(Feature),
	Tagline(Tagline),
	Command(Command),
}

impl NodePayload {
	pub fn kind(&self) -> NodeKind {
		match self {
			NodePayload::CodeBlock(_) => NodeKind::CodeBlock,
			NodePayload::Feature(_) => NodeKind::Feature,
			NodePayload::Tagline(_) => NodeKind::Tagline,
			NodePayload::Command(_) => NodeKind::Command,
		}
	}

	/// Blank payload of the given kind, used when nothing can be re-attached.
	pub fn empty(kind: NodeKind) -> Self {
		match kind {
			NodeKind::CodeBlock => NodePayload::CodeBlock(CodeBlock::default()),
			NodeKind::Feature => NodePayload::Feature(Feature {
				title: String::new(),
				icon: Icon::FileText,
				accent: "#f97316".into(),
			}),
			NodeKind::Tagline => NodePayload::Tagline(Tagline::default()),
			NodeKind::Command => NodePayload::Command(Command::default()),
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: String,
	pub position: Position,
	pub payload: NodePayload,
}

impl Node {
	pub fn new(id: impl Into<String>, position: Position, payload: NodePayload) -> Self {
		Self {
			id: id.into(),
			position,
			payload,
		}
	}

	pub fn kind(&self) -> NodeKind {
		self.payload.kind()
	}

	pub fn size(&self) -> (f64, f64) {
		self.kind().size()
	}
}

/// A directed connection between two node ids.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	pub id: String,
	pub source: String,
	pub target: String,
	pub source_anchor: Anchor,
	pub target_anchor: Anchor,
}

impl Edge {
	/// Builds an edge with the conventional `<source>-<target>` id.
	pub fn new(
		source: impl Into<String>,
		target: impl Into<String>,
		source_anchor: Anchor,
		target_anchor: Anchor,
	) -> Self {
		let (source, target) = (source.into(), target.into());
		Self {
			id: edge_id(&source, &target),
			source,
			target,
			source_anchor,
			target_anchor,
		}
	}

	pub fn touches(&self, node_id: &str) -> bool {
		self.source == node_id || self.target == node_id
	}
}

pub fn edge_id(source: &str, target: &str) -> String {
	format!("{source}-{target}")
}

/// Ids end up as single DSL tokens, so they must be non-empty and whitespace-free.
pub fn is_valid_id(id: &str) -> bool {
	!id.is_empty() && !id.contains(char::is_whitespace)
}

/// The conventional id for `source -> target`, suffixed with `-2`, `-3`, ... when
/// a different connection already holds it (`a-b -> c` and `a -> b-c` both
/// format as `a-b-c`).
pub fn unique_edge_id(source: &str, target: &str, existing: &[Edge]) -> String {
	let base = edge_id(source, target);
	let clashes = |id: &str| {
		existing
			.iter()
			.any(|e| e.id == id && (e.source != source || e.target != target))
	};
	if !clashes(&base) {
		return base;
	}
	(2..=existing.len() + 1)
		.map(|n| format!("{base}-{n}"))
		.find(|id| !clashes(id))
		.unwrap_or(base)
}

/// Visual emphasis of an edge, derived from the current selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeStyle {
	Default,
	Selected,
}

impl EdgeStyle {
	pub fn for_edge(edge: &Edge, selected: Option<&str>) -> Self {
		if selected == Some(edge.id.as_str()) {
			EdgeStyle::Selected
		} else {
			EdgeStyle::Default
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn kinds_and_anchors_parse_their_own_names() {
		for kind in NodeKind::ALL {
			assert_eq!(kind.as_str().parse::<NodeKind>(), Ok(kind));
		}
		for anchor in Anchor::ALL {
			assert_eq!(anchor.to_string().parse::<Anchor>(), Ok(anchor));
		}
		assert!("codeblock".parse::<NodeKind>().is_err());
		assert!("up".parse::<Anchor>().is_err());
	}

	#[test]
	fn ids_must_be_single_tokens() {
		assert!(is_valid_id("feature-1"));
		assert!(!is_valid_id(""));
		assert!(!is_valid_id("my node"));
		assert!(!is_valid_id("tab\there"));
	}

	#[test]
	fn hyphenated_ids_get_a_distinct_edge_id() {
		let existing = [Edge::new("a-b", "c", Anchor::Right, Anchor::Left)];
		assert_eq!(unique_edge_id("a", "b-c", &existing), "a-b-c-2");
		// the same connection keeps its conventional id
		assert_eq!(unique_edge_id("a-b", "c", &existing), "a-b-c");
		assert_eq!(unique_edge_id("x", "y", &existing), "x-y");
	}

	#[test]
	fn edge_style_follows_selection() {
		let edge = Edge::new("a", "b", Anchor::Right, Anchor::Left);
		assert_eq!(edge.id, "a-b");
		assert_eq!(EdgeStyle::for_edge(&edge, Some("a-b")), EdgeStyle::Selected);
		assert_eq!(EdgeStyle::for_edge(&edge, Some("b-a")), EdgeStyle::Default);
		assert_eq!(EdgeStyle::for_edge(&edge, None), EdgeStyle::Default);
	}
}
