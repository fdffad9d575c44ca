use log::{debug, info, warn};

use super::dsl::{self, DslWarning};
use super::edit::EditSession;
use super::error::DiagramError;
use super::geometry::{
	EDGE_HIT_TOLERANCE, HANDLE_RADIUS, ViewTransform, anchor_point, contains, distance_to_curve,
	edge_curve, nearest_anchor,
};
use super::graph::{EdgeChange, Graph, NodeChange};
use super::layout::{LayoutMode, layout, payload_for};
use super::types::{Anchor, Edge, EdgeStyle, Position};

#[derive(Clone, Debug, PartialEq)]
pub struct DragState {
	pub node_id: String,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start: Position,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConnectState {
	pub source: String,
	pub source_anchor: Anchor,
	/// Current pointer position in layout units.
	pub cursor: (f64, f64),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Gesture {
	#[default]
	Idle,
	Drag(DragState),
	Connect(ConnectState),
}

/// What lies under a screen point.
#[derive(Clone, Debug, PartialEq)]
pub enum Hit {
	Handle { node_id: String, anchor: Anchor },
	Node(String),
	Edge(String),
	Background,
}

/// Edit-session flags mirrored into the page's reactive UI.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionFlags {
	pub editing_enabled: bool,
	pub editing_active: bool,
	pub selected_edge: Option<String>,
}

/// Everything the canvas shows, plus the gestures in flight.
///
/// All mutations pass through [`EditSession::authorize`]; the pointer and key
/// handlers only translate raw input into those calls.
pub struct DiagramState {
	pub graph: Graph,
	pub session: EditSession,
	pub transform: ViewTransform,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
	mode: Option<LayoutMode>,
	gesture: Gesture,
	fit_padding: f64,
}

impl DiagramState {
	pub fn new(width: f64, height: f64, trusted: bool, fit_padding: f64) -> Self {
		let mut state = Self {
			graph: Graph::default(),
			session: EditSession::default(),
			transform: ViewTransform::default(),
			width,
			height,
			flow_time: 0.0,
			mode: None,
			gesture: Gesture::Idle,
			fit_padding,
		};
		state.session.set_capability(trusted);
		state.resize(width, height);
		state
	}

	pub fn mode(&self) -> Option<LayoutMode> {
		self.mode
	}

	pub fn gesture(&self) -> &Gesture {
		&self.gesture
	}

	/// Settled viewport change. Regenerates the graph when the orientation
	/// flips and always re-fits. Returns whether a relayout happened.
	pub fn resize(&mut self, width: f64, height: f64) -> bool {
		self.width = width;
		self.height = height;
		let mode = LayoutMode::from_viewport(width, height);
		let relayout = self.mode != Some(mode);
		if relayout {
			info!("layout {:?} -> {:?} at {width}x{height}", self.mode, mode);
			self.mode = Some(mode);
			self.gesture = Gesture::Idle;
			self.graph = layout(mode);
			let stale = self
				.session
				.selected_edge()
				.is_some_and(|id| self.graph.edge(id).is_none());
			if stale {
				self.session.clear_selection();
			}
		}
		self.fit_view();
		relayout
	}

	pub fn fit_view(&mut self) {
		self.transform = ViewTransform::fit(&self.graph, self.width, self.height, self.fit_padding);
	}

	pub fn set_capability(&mut self, trusted: bool) {
		self.session.set_capability(trusted);
		if !self.session.editing_active() {
			self.gesture = Gesture::Idle;
		}
	}

	pub fn toggle_editing(&mut self) -> bool {
		let active = self.session.toggle();
		if !active {
			self.gesture = Gesture::Idle;
		}
		active
	}

	pub fn flags(&self) -> SessionFlags {
		SessionFlags {
			editing_enabled: self.session.editing_enabled(),
			editing_active: self.session.editing_active(),
			selected_edge: self.session.selected_edge().map(str::to_string),
		}
	}

	pub fn edge_style(&self, edge: &Edge) -> EdgeStyle {
		EdgeStyle::for_edge(edge, self.session.selected_edge())
	}

	pub fn export_dsl(&self) -> String {
		dsl::serialize(&self.graph)
	}

	/// Replaces the graph with a pasted DSL document. Payloads come back from
	/// the layout catalogue; dropped edge lines are returned as warnings.
	pub fn import_dsl(&mut self, text: &str) -> Result<Vec<DslWarning>, DiagramError> {
		self.session.authorize()?;
		let mut doc = dsl::parse(text)?;
		let warnings = std::mem::take(&mut doc.warnings);
		self.graph = doc.into_graph(payload_for);
		self.gesture = Gesture::Idle;
		self.session.clear_selection();
		self.fit_view();
		info!(
			"imported {} nodes, {} edges ({} lines dropped)",
			self.graph.nodes().len(),
			self.graph.edges().len(),
			warnings.len()
		);
		Ok(warnings)
	}

	pub fn tick(&mut self, dt: f64) {
		self.flow_time += dt;
	}

	pub fn hit_test(&self, sx: f64, sy: f64) -> Hit {
		let (gx, gy) = self.transform.screen_to_graph(sx, sy);
		let k = self.transform.k;

		if self.session.editing_active() {
			let reach = HANDLE_RADIUS / k;
			for node in self.graph.nodes().iter().rev() {
				for anchor in Anchor::ALL {
					let (ax, ay) = anchor_point(node, anchor);
					if (ax - gx).powi(2) + (ay - gy).powi(2) <= reach * reach {
						return Hit::Handle {
							node_id: node.id.clone(),
							anchor,
						};
					}
				}
			}
		}

		// later nodes are drawn on top
		if let Some(node) = self.graph.nodes().iter().rev().find(|n| contains(n, gx, gy)) {
			return Hit::Node(node.id.clone());
		}

		let tolerance = EDGE_HIT_TOLERANCE / k;
		self.graph
			.edges()
			.iter()
			.filter_map(|edge| {
				let curve = edge_curve(&self.graph, edge)?;
				Some((edge, distance_to_curve(&curve, gx, gy)))
			})
			.filter(|(_, d)| *d <= tolerance)
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map_or(Hit::Background, |(edge, _)| Hit::Edge(edge.id.clone()))
	}

	pub fn pointer_down(&mut self, sx: f64, sy: f64) -> Hit {
		let hit = self.hit_test(sx, sy);
		match &hit {
			Hit::Background => self.clear_selection(),
			Hit::Handle { node_id, anchor } => {
				if self.session.authorize().is_ok() {
					self.gesture = Gesture::Connect(ConnectState {
						source: node_id.clone(),
						source_anchor: *anchor,
						cursor: self.transform.screen_to_graph(sx, sy),
					});
				}
			}
			Hit::Node(id) => {
				if self.session.authorize().is_ok() {
					if let Some(node) = self.graph.node(id) {
						self.gesture = Gesture::Drag(DragState {
							node_id: id.clone(),
							start_x: sx,
							start_y: sy,
							node_start: node.position,
						});
					}
				}
			}
			Hit::Edge(id) => {
				let _ = self.select_edge(id);
			}
		}
		hit
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		match &mut self.gesture {
			Gesture::Idle => {}
			Gesture::Connect(connect) => connect.cursor = self.transform.screen_to_graph(sx, sy),
			Gesture::Drag(drag) => {
				let k = self.transform.k;
				let position = Position::new(
					drag.node_start.x + (sx - drag.start_x) / k,
					drag.node_start.y + (sy - drag.start_y) / k,
				);
				let id = drag.node_id.clone();
				if let Err(err) = self.drag_node(&id, position) {
					debug!("drag of `{id}` dropped: {err}");
					self.gesture = Gesture::Idle;
				}
			}
		}
	}

	/// Ends the current gesture. A finished connect gesture yields the
	/// outcome of the edge it tried to add.
	pub fn pointer_up(&mut self, sx: f64, sy: f64) -> Option<Result<Edge, DiagramError>> {
		let Gesture::Connect(connect) = std::mem::take(&mut self.gesture) else {
			return None;
		};
		let (target, target_anchor) = match self.hit_test(sx, sy) {
			Hit::Handle { node_id, anchor } => (node_id, anchor),
			Hit::Node(id) => {
				let (gx, gy) = self.transform.screen_to_graph(sx, sy);
				let anchor = self
					.graph
					.node(&id)
					.map_or(Anchor::Left, |n| nearest_anchor(n, gx, gy));
				(id, anchor)
			}
			Hit::Edge(_) | Hit::Background => return None,
		};
		Some(self.connect(&connect.source, &target, connect.source_anchor, target_anchor))
	}

	pub fn pointer_leave(&mut self) {
		self.gesture = Gesture::Idle;
	}

	/// Keyboard input. Returns true when the key was consumed.
	pub fn key_down(&mut self, key: &str) -> bool {
		match key {
			"Delete" | "Backspace" => matches!(self.delete_selected_edge(), Ok(Some(_))),
			"Escape" if self.session.editing_active() => {
				self.gesture = Gesture::Idle;
				self.clear_selection();
				true
			}
			_ => false,
		}
	}

	pub fn drag_node(&mut self, id: &str, position: Position) -> Result<(), DiagramError> {
		self.session.authorize()?;
		self.graph.apply_node_delta(&[NodeChange::Position {
			id: id.to_string(),
			position,
		}])
	}

	pub fn connect(
		&mut self,
		source: &str,
		target: &str,
		source_anchor: Anchor,
		target_anchor: Anchor,
	) -> Result<Edge, DiagramError> {
		self.session.authorize()?;
		match self.graph.add_edge(source, target, source_anchor, target_anchor) {
			Ok(edge) => {
				info!("connected {} ({source_anchor} -> {target_anchor})", edge.id);
				Ok(edge)
			}
			Err(err) => {
				warn!("connection rejected: {err}");
				Err(err)
			}
		}
	}

	pub fn select_edge(&mut self, id: &str) -> Result<(), DiagramError> {
		self.session.authorize()?;
		if self.graph.edge(id).is_none() {
			return Err(DiagramError::UnknownEdge(id.to_string()));
		}
		self.session.select_edge(id)
	}

	pub fn clear_selection(&mut self) {
		self.session.clear_selection();
	}

	/// Removes the selected edge, returning its id, or `None` if nothing was selected.
	pub fn delete_selected_edge(&mut self) -> Result<Option<String>, DiagramError> {
		self.session.authorize()?;
		let Some(id) = self.session.selected_edge().map(str::to_string) else {
			return Ok(None);
		};
		self.graph
			.apply_edge_delta(&[EdgeChange::Remove { id: id.clone() }])?;
		self.session.clear_selection();
		info!("deleted edge {id}");
		Ok(Some(id))
	}
}
