use std::collections::BTreeMap;

/// A shape graph restricting which object members are deserialized.
///
/// When a graph is supplied to an entry point, object readers consume only
/// the members it names; every other member is drained and discarded. A
/// member may carry a child graph that prunes the nested object the same
/// way. An absent graph (`None` at the entry point) reads everything.
///
/// ```
/// use jsonflux::MemberGraph;
///
/// let mut graph = MemberGraph::new();
/// graph.add("id");
/// graph.add_child("owner", {
///     let mut sub = MemberGraph::new();
///     sub.add("name");
///     sub
/// });
/// assert!(graph.includes("id"));
/// assert!(!graph.includes("created"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberGraph {
    members: BTreeMap<String, MemberGraph>,
}

impl MemberGraph {
    /// Creates an empty graph. An empty graph attached to an object prunes
    /// every member.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Includes `name` with no restriction on its nested shape.
    pub fn add(&mut self, name: &str) -> &mut Self {
        self.members.entry(name.to_owned()).or_default();
        self
    }

    /// Includes `name`, restricting its nested object to `child`.
    pub fn add_child(&mut self, name: &str, child: MemberGraph) -> &mut Self {
        self.members.insert(name.to_owned(), child);
        self
    }

    /// Whether the member `name` should be read.
    #[must_use]
    pub fn includes(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    /// The pruning graph for the nested object under `name`, if one was
    /// attached. A member added without a child imposes no nested pruning
    /// and returns `None` here.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&MemberGraph> {
        self.members.get(name).filter(|g| !g.members.is_empty())
    }
}
