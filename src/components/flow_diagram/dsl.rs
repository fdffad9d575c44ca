//! Line-oriented text export of a diagram.
//!
//! ```text
//! feature feature-1 at (1000, 371)
//! connect doctype -> feature-1 right left
//! ```
//!
//! Payloads (titles, icons, code) are not part of the format; callers join
//! them back on (kind, id) with [`DslDocument::into_graph`].

use std::collections::HashSet;
use std::fmt::Write;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use super::error::DiagramError;
use super::graph::Graph;
use super::types::{Anchor, Edge, Node, NodeKind, NodePayload, Position, unique_edge_id};

static NODE_LINE: Lazy<Regex> = Lazy::new(|| {
	Regex::new(r"^(\S+) (\S+) at \(([^,()]*), ([^,()]*)\)$")
		.expect("valid node line regex")
});

static CONNECT_LINE: Lazy<Regex> = Lazy::new(|| {
	Regex::new(
		r"^connect (\S+) -> (\S+)(?: (top|right|bottom|left) (top|right|bottom|left))?$",
	)
	.expect("valid connect line regex")
});

/// Writes one line per node, then one line per edge.
pub fn serialize(graph: &Graph) -> String {
	let mut out = String::new();
	for node in graph.nodes() {
		let _ = writeln!(
			out,
			"{} {} at ({}, {})",
			node.kind(),
			node.id,
			node.position.x,
			node.position.y
		);
	}
	for edge in graph.edges() {
		let _ = writeln!(
			out,
			"connect {} -> {} {} {}",
			edge.source, edge.target, edge.source_anchor, edge.target_anchor
		);
	}
	out
}

/// A node as described by the DSL: everything but the payload.
#[derive(Clone, Debug, PartialEq)]
pub struct DslNode {
	pub id: String,
	pub kind: NodeKind,
	pub position: Position,
}

/// An edge line that was understood but could not be kept.
#[derive(Clone, Debug, PartialEq)]
pub struct DslWarning {
	pub line: usize,
	pub error: DiagramError,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DslDocument {
	pub nodes: Vec<DslNode>,
	pub edges: Vec<Edge>,
	/// Dropped edges: self-loops, unknown endpoints and repeated connections.
	pub warnings: Vec<DslWarning>,
}

impl DslDocument {
	/// Re-attaches payloads by (kind, id). Missing ones fall back to an empty payload.
	pub fn into_graph(self, payloads: impl Fn(NodeKind, &str) -> Option<NodePayload>) -> Graph {
		let nodes = self
			.nodes
			.into_iter()
			.map(|n| {
				let payload = payloads(n.kind, &n.id).unwrap_or_else(|| NodePayload::empty(n.kind));
				Node::new(n.id, n.position, payload)
			})
			.collect();
		Graph::from_parts(nodes, self.edges)
	}
}

/// Parses DSL text. Unrecognised lines, unknown node kinds and `#` comments
/// are skipped.
pub fn parse(text: &str) -> Result<DslDocument, DiagramError> {
	let mut doc = DslDocument::default();
	let mut node_ids = HashSet::new();
	let mut pending_edges = Vec::new();

	for (idx, raw) in text.lines().enumerate() {
		let line_no = idx + 1;
		let line = raw.trim();
		if line.is_empty() || line.starts_with('#') {
			continue;
		}

		if let Some(caps) = NODE_LINE.captures(line) {
			let malformed = |reason: String| DiagramError::MalformedDslLine {
				line: line_no,
				content: line.to_string(),
				reason,
			};
			let Ok(kind) = caps[1].parse::<NodeKind>() else {
				debug!("line {line_no}: skipping unknown node kind `{}`", &caps[1]);
				continue;
			};
			let id = caps[2].to_string();
			let x = parse_coord(&caps[3]).map_err(&malformed)?;
			let y = parse_coord(&caps[4]).map_err(&malformed)?;
			if !node_ids.insert(id.clone()) {
				return Err(malformed(format!("duplicate node id `{id}`")));
			}
			doc.nodes.push(DslNode {
				id,
				kind,
				position: Position::new(x, y),
			});
		} else if let Some(caps) = CONNECT_LINE.captures(line) {
			let anchor = |i: usize, default: Anchor| {
				caps.get(i)
					.and_then(|m| m.as_str().parse().ok())
					.unwrap_or(default)
			};
			let edge = Edge::new(
				&caps[1],
				&caps[2],
				anchor(3, Anchor::Right),
				anchor(4, Anchor::Left),
			);
			pending_edges.push((line_no, edge));
		}
	}

	for (line, mut edge) in pending_edges {
		let missing = [&edge.source, &edge.target]
			.into_iter()
			.find(|id| !node_ids.contains(id.as_str()))
			.cloned();
		let repeated = doc
			.edges
			.iter()
			.find(|e| e.source == edge.source && e.target == edge.target);
		let error = if let Some(node) = missing {
			Some(DiagramError::UnknownEndpoint {
				edge: edge.id.clone(),
				node,
			})
		} else if edge.source == edge.target {
			Some(DiagramError::SelfLoop(edge.id.clone()))
		} else {
			repeated.map(|e| DiagramError::DuplicateId(e.id.clone()))
		};

		match error {
			Some(error) => doc.warnings.push(DslWarning { line, error }),
			None => {
				edge.id = unique_edge_id(&edge.source, &edge.target, &doc.edges);
				doc.edges.push(edge);
			}
		}
	}

	Ok(doc)
}

fn parse_coord(literal: &str) -> Result<f64, String> {
	match literal.trim().parse::<f64>() {
		Ok(v) if v.is_finite() => Ok(v),
		Ok(_) => Err(format!("coordinate `{literal}` is not finite")),
		Err(_) => Err(format!("malformed number `{literal}`")),
	}
}
