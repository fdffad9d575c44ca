/// Rejections returned by graph, DSL and edit operations.
///
/// None of these are fatal: a rejected operation leaves the graph and the edit
/// session exactly as they were.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DiagramError {
	#[error("edge `{edge}` references unknown node `{node}`")]
	UnknownEndpoint { edge: String, node: String },

	#[error("id `{0}` is already in use")]
	DuplicateId(String),

	#[error("no node with id `{0}`")]
	UnknownNode(String),

	#[error("no edge with id `{0}`")]
	UnknownEdge(String),

	#[error("`{0}` is not a usable id: ids are non-empty and contain no whitespace")]
	InvalidId(String),

	#[error("node `{0}` would be placed at a non-finite position")]
	NonFinitePosition(String),

	#[error("edge `{0}` connects a node to itself")]
	SelfLoop(String),

	#[error("line {line}: {reason}: `{content}`")]
	MalformedDslLine {
		line: usize,
		content: String,
		reason: String,
	},

	#[error("editing is not active")]
	CapabilityDenied,
}
