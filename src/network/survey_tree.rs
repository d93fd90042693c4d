//! Hierarchical survey grouping built from dotted station names

use indexmap::IndexMap;

use super::names::SEPARATOR;

/// Index of a node inside a [`SurveyTree`].
pub type SurveyId = usize;

/// One survey level
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyNode {
    /// Last path component (empty for the root)
    pub name: String,
    /// Full dotted path (empty for the root)
    pub path: String,
    pub parent: Option<SurveyId>,
    /// Direct children in order of first appearance
    pub children: Vec<SurveyId>,
    /// Indices of stations whose survey path is exactly this node
    pub stations: Vec<usize>,
    /// Indices of legs recorded in this survey
    pub legs: Vec<usize>,
}

impl SurveyNode {
    fn new(name: &str, path: String, parent: Option<SurveyId>) -> Self {
        SurveyNode {
            name: name.to_string(),
            path,
            parent,
            children: Vec::new(),
            stations: Vec::new(),
            legs: Vec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Arena of survey nodes; node 0 is the unnamed root.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyTree {
    nodes: Vec<SurveyNode>,
    by_path: IndexMap<String, SurveyId>,
}

impl Default for SurveyTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SurveyTree {
    pub const ROOT: SurveyId = 0;

    pub fn new() -> Self {
        let mut by_path = IndexMap::new();
        by_path.insert(String::new(), Self::ROOT);
        SurveyTree {
            nodes: vec![SurveyNode::new("", String::new(), None)],
            by_path,
        }
    }

    /// Find or create the node for a dotted survey path, creating missing
    /// ancestors on the way.
    pub fn ensure(&mut self, path: &str) -> SurveyId {
        if let Some(&id) = self.by_path.get(path) {
            return id;
        }
        let mut current = Self::ROOT;
        let mut walked = String::new();
        for component in path.split(SEPARATOR) {
            if !walked.is_empty() {
                walked.push(SEPARATOR);
            }
            walked.push_str(component);
            current = match self.by_path.get(&walked) {
                Some(&id) => id,
                None => {
                    let id = self.nodes.len();
                    self.nodes
                        .push(SurveyNode::new(component, walked.clone(), Some(current)));
                    self.nodes[current].children.push(id);
                    self.by_path.insert(walked.clone(), id);
                    id
                }
            };
        }
        current
    }

    pub(crate) fn attach_station(&mut self, survey: &str, station: usize) {
        let id = self.ensure(survey);
        self.nodes[id].stations.push(station);
    }

    pub(crate) fn attach_leg(&mut self, survey: &str, leg: usize) {
        let id = self.ensure(survey);
        self.nodes[id].legs.push(leg);
    }

    pub fn root(&self) -> &SurveyNode {
        &self.nodes[Self::ROOT]
    }

    pub fn node(&self, id: SurveyId) -> Option<&SurveyNode> {
        self.nodes.get(id)
    }

    /// Look up a node by dotted path
    pub fn find(&self, path: &str) -> Option<&SurveyNode> {
        self.by_path.get(path).map(|&id| &self.nodes[id])
    }

    /// Number of nodes including the root
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Node ids in pre-order (parent before children, children in order of
    /// first appearance).
    pub fn pre_order(&self) -> Vec<SurveyId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![Self::ROOT];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id].children.iter().rev());
        }
        order
    }
}
