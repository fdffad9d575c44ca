//! Hand-placed diagram layouts, one per viewport orientation.

use super::graph::Graph;
use super::types::{
	Anchor, CodeBlock, Command, Edge, Feature, Icon, Node, NodeKind, NodePayload, Position,
	Tagline,
};

pub const TAGLINE_ID: &str = "tagline";
pub const DOCTYPE_ID: &str = "doctype";
pub const COMMAND_ID: &str = "command";
pub const FEATURE_IDS: [&str; 4] = ["feature-1", "feature-2", "feature-3", "feature-4"];

/// Shell command shown in the command node and in the hero prompt.
pub const INSTALL_COMMAND: &str = "nailgun create my-app --branch v0";

const DOCTYPE_SAMPLE: &str = r#"export default $doctype<"zodula__User">({
    name: {
        type: "Text",
        in_list_view: 1
    },
    email: {
        type: "Email",
        required: 1,
        unique: 1,
        in_list_view: 1
    },
    password: {
        type: "Password",
        required: 1,
        no_copy: 1
    },
    is_active: {
        type: "Check",
        default: "1",
        in_list_view: 1
    }
}, {
    label: "User",
    search_fields: "email\nname\nid"
})
.on("before_change", async ({ doc, old }) => {
    doc.password = await Bun.password.hash(doc.password as string);
});"#;

const FEATURES: [(&str, Icon, &str); 4] = [
	("OpenAPI Docs", Icon::FileText, "#3b82f6"),
	("CRUD Operations", Icon::Layers, "#22c55e"),
	("Event Triggers", Icon::Zap, "#eab308"),
	("Database Schema", Icon::Database, "#a855f7"),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutMode {
	Portrait,
	Landscape,
}

impl LayoutMode {
	pub fn from_viewport(width: f64, height: f64) -> Self {
		if height > width {
			LayoutMode::Portrait
		} else {
			LayoutMode::Landscape
		}
	}
}

struct Placement {
	tagline: (f64, f64),
	command: (f64, f64),
	doctype: (f64, f64),
	features: [(f64, f64); 4],
	/// (source, target) anchors of command -> feature links.
	command_link: (Anchor, Anchor),
	/// (source, target) anchors of doctype -> feature links.
	doctype_link: (Anchor, Anchor),
}

const LANDSCAPE: Placement = Placement {
	tagline: (450.0, 60.0),
	command: (510.0, 190.0),
	doctype: (200.0, 290.0),
	features: [
		(1000.0, 371.0),
		(1000.0, 471.0),
		(1000.0, 571.0),
		(1000.0, 671.0),
	],
	command_link: (Anchor::Right, Anchor::Left),
	doctype_link: (Anchor::Right, Anchor::Left),
};

const PORTRAIT: Placement = Placement {
	tagline: (-30.0, 0.0),
	command: (30.0, 130.0),
	doctype: (10.0, 480.0),
	features: [(0.0, 260.0), (240.0, 260.0), (0.0, 360.0), (240.0, 360.0)],
	command_link: (Anchor::Bottom, Anchor::Top),
	doctype_link: (Anchor::Top, Anchor::Bottom),
};

/// The complete diagram for `mode`. Switching modes replaces everything.
pub fn layout(mode: LayoutMode) -> Graph {
	let (nodes, edges) = layout_parts(mode);
	Graph::from_parts(nodes, edges)
}

fn layout_parts(mode: LayoutMode) -> (Vec<Node>, Vec<Edge>) {
	let placement = match mode {
		LayoutMode::Portrait => &PORTRAIT,
		LayoutMode::Landscape => &LANDSCAPE,
	};
	let at = |(x, y): (f64, f64)| Position::new(x, y);

	let mut nodes = vec![
		node(TAGLINE_ID, NodeKind::Tagline, at(placement.tagline)),
		node(DOCTYPE_ID, NodeKind::CodeBlock, at(placement.doctype)),
		node(COMMAND_ID, NodeKind::Command, at(placement.command)),
	];
	nodes.extend(
		FEATURE_IDS
			.iter()
			.zip(placement.features)
			.map(|(id, pos)| node(id, NodeKind::Feature, at(pos))),
	);

	let (cmd_src, cmd_tgt) = placement.command_link;
	let (doc_src, doc_tgt) = placement.doctype_link;
	let edges = FEATURE_IDS
		.iter()
		.map(|id| Edge::new(COMMAND_ID, *id, cmd_src, cmd_tgt))
		.chain(
			FEATURE_IDS
				.iter()
				.map(|id| Edge::new(DOCTYPE_ID, *id, doc_src, doc_tgt)),
		)
		.collect();

	(nodes, edges)
}

fn node(id: &str, kind: NodeKind, position: Position) -> Node {
	let payload = payload_for(kind, id).unwrap_or_else(|| NodePayload::empty(kind));
	Node::new(id, position, payload)
}

/// Payload catalogue keyed by (kind, id), used to re-attach parsed DSL nodes.
pub fn payload_for(kind: NodeKind, id: &str) -> Option<NodePayload> {
	let payload = match (kind, id) {
		(NodeKind::Tagline, TAGLINE_ID) => NodePayload::Tagline(Tagline {
			title: "Build Full Stack Apps".into(),
			subtitle: "10x Faster".into(),
			description: "Less files, more productivity.".into(),
		}),
		(NodeKind::CodeBlock, DOCTYPE_ID) => NodePayload::CodeBlock(CodeBlock {
			file_name: "User.doctype.ts".into(),
			source: DOCTYPE_SAMPLE.into(),
		}),
		(NodeKind::Command, COMMAND_ID) => NodePayload::Command(Command {
			command: INSTALL_COMMAND.into(),
		}),
		(NodeKind::Feature, _) => {
			let idx = FEATURE_IDS.iter().position(|f| *f == id)?;
			let (title, icon, accent) = FEATURES[idx];
			NodePayload::Feature(Feature {
				title: title.into(),
				icon,
				accent: accent.into(),
			})
		}
		_ => return None,
	};
	Some(payload)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn mode_is_portrait_only_when_taller_than_wide() {
		assert_eq!(LayoutMode::from_viewport(800.0, 1200.0), LayoutMode::Portrait);
		assert_eq!(LayoutMode::from_viewport(1200.0, 800.0), LayoutMode::Landscape);
		assert_eq!(LayoutMode::from_viewport(900.0, 900.0), LayoutMode::Landscape);
	}

	#[test]
	fn layout_tables_are_self_consistent() {
		for mode in [LayoutMode::Portrait, LayoutMode::Landscape] {
			let (nodes, edges) = layout_parts(mode);
			let mut graph = Graph::default();
			assert!(graph.set_graph(nodes, edges).is_empty(), "{mode:?}");
			assert_eq!(graph.nodes().len(), 7);
			assert_eq!(graph.edges().len(), 8);
		}
	}

	#[test]
	fn layout_depends_on_mode_alone() {
		let direct = layout(LayoutMode::Portrait);
		let _ = layout(LayoutMode::Portrait);
		let _ = layout(LayoutMode::Landscape);
		assert_eq!(layout(LayoutMode::Portrait), direct);
		assert_ne!(layout(LayoutMode::Landscape), direct);
	}

	#[test]
	fn anchors_differ_between_modes() {
		let landscape = layout(LayoutMode::Landscape);
		let portrait = layout(LayoutMode::Portrait);

		let l = landscape.edge("command-feature-1").unwrap();
		assert_eq!((l.source_anchor, l.target_anchor), (Anchor::Right, Anchor::Left));
		let p = portrait.edge("command-feature-1").unwrap();
		assert_eq!((p.source_anchor, p.target_anchor), (Anchor::Bottom, Anchor::Top));
		let p = portrait.edge("doctype-feature-4").unwrap();
		assert_eq!((p.source_anchor, p.target_anchor), (Anchor::Top, Anchor::Bottom));
	}

	#[test]
	fn landscape_places_first_feature_at_known_spot() {
		let graph = layout(LayoutMode::Landscape);
		let node = graph.node("feature-1").unwrap();
		assert_eq!(node.position, Position::new(1000.0, 371.0));
		assert_eq!(node.kind(), NodeKind::Feature);
	}

	#[test]
	fn catalogue_only_knows_its_own_nodes() {
		assert!(payload_for(NodeKind::Feature, "feature-3").is_some());
		assert!(payload_for(NodeKind::Feature, "feature-9").is_none());
		assert!(payload_for(NodeKind::Tagline, COMMAND_ID).is_none());
	}
}
