use std::{
    collections::BTreeMap,
    fmt::{self, Display},
    fs,
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::graph::WeightedGraph;

/// Static attributes of one vertex in the environment file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexSpec {
    #[serde(default)]
    pub people: u32,
    #[serde(default)]
    pub brittle: bool,
}

/// Edge endpoints are written either as strings or as bare integers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VertexKey {
    Number(u64),
    Name(String),
}

impl Display for VertexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VertexKey::Number(n) => write!(f, "{}", n),
            VertexKey::Name(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSpec {
    pub v1: VertexKey,
    pub v2: VertexKey,
    pub w: f64,
}

/// The edge list is either a plain array or an object of named edges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EdgeList {
    List(Vec<EdgeSpec>),
    Named(BTreeMap<String, EdgeSpec>),
}

impl EdgeList {
    pub fn iter(&self) -> Box<dyn Iterator<Item = &EdgeSpec> + '_> {
        match self {
            EdgeList::List(edges) => Box::new(edges.iter()),
            EdgeList::Named(edges) => Box::new(edges.values()),
        }
    }
}

/// The environment description: vertices with their occupants and brittleness, plus weighted
/// edges. Unknown top level keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    #[serde(rename = "V")]
    pub vertices: BTreeMap<String, VertexSpec>,
    #[serde(rename = "E")]
    pub edges: EdgeList,
}

#[derive(Debug)]
pub enum EnvironmentError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    UnknownVertex(String),
    NonPositiveWeight { v1: String, v2: String, w: f64 },
}

impl Display for EnvironmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvironmentError::Io(e) => write!(f, "could not read environment: {}", e),
            EnvironmentError::Parse(e) => write!(f, "could not parse environment: {}", e),
            EnvironmentError::UnknownVertex(v) => {
                write!(f, "edge references unknown vertex '{}'", v)
            }
            EnvironmentError::NonPositiveWeight { v1, v2, w } => {
                write!(f, "edge {} - {} has non positive weight {}", v1, v2, w)
            }
        }
    }
}

impl std::error::Error for EnvironmentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EnvironmentError::Io(e) => Some(e),
            EnvironmentError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for EnvironmentError {
    fn from(e: std::io::Error) -> Self {
        EnvironmentError::Io(e)
    }
}

impl From<serde_json::Error> for EnvironmentError {
    fn from(e: serde_json::Error) -> Self {
        EnvironmentError::Parse(e)
    }
}

impl Environment {
    pub fn from_json(json: &str) -> Result<Self, EnvironmentError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, EnvironmentError> {
        let contents = fs::read_to_string(path)?;

        Self::from_json(&contents)
    }

    /// Builds the graph, checking every edge references a declared vertex and has a positive
    /// weight
    pub fn build_graph(&self) -> Result<WeightedGraph, EnvironmentError> {
        let mut graph = WeightedGraph::new();

        for (name, spec) in &self.vertices {
            graph.add_vertex(name, spec.people, spec.brittle);
        }

        for edge in self.edges.iter() {
            let v1 = edge.v1.to_string();
            let v2 = edge.v2.to_string();

            if !(edge.w > 0.0) {
                return Err(EnvironmentError::NonPositiveWeight { v1, v2, w: edge.w });
            }

            let a = graph
                .vertex(&v1)
                .ok_or_else(|| EnvironmentError::UnknownVertex(v1.clone()))?;
            let b = graph
                .vertex(&v2)
                .ok_or_else(|| EnvironmentError::UnknownVertex(v2.clone()))?;

            graph.add_edge(a, b, edge.w);
        }

        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_fixture() {
        let env = Environment::from_json(include_str!("../fixtures/line.json")).unwrap();
        let graph = env.build_graph().unwrap();

        assert_eq!(graph.vertex_count(), 3);
        let b = graph.vertex("B").unwrap();
        assert_eq!(graph.info(b).people, 1);
        assert!(!graph.info(b).brittle);
        assert_eq!(graph.weight(graph.vertex("A").unwrap(), b), Some(1.0));
    }

    #[test]
    fn test_parse_named_edges_and_numeric_ids() {
        let env = Environment::from_json(include_str!("../fixtures/named_edges.json")).unwrap();
        assert!(matches!(env.edges, EdgeList::Named(_)));

        let graph = env.build_graph().unwrap();
        let zero = graph.vertex("0").unwrap();
        let one = graph.vertex("1").unwrap();
        assert_eq!(graph.weight(zero, one), Some(4.0));
        assert!(graph.info(graph.vertex("2").unwrap()).brittle);
    }

    #[test]
    fn test_unknown_vertex() {
        let json = r#"{"V": {"A": {"people": 0, "brittle": false}}, "E": [{"v1": "A", "v2": "Z", "w": 1}]}"#;
        let env = Environment::from_json(json).unwrap();

        assert!(matches!(
            env.build_graph(),
            Err(EnvironmentError::UnknownVertex(v)) if v == "Z"
        ));
    }

    #[test]
    fn test_non_positive_weight() {
        let json = r#"{"V": {"A": {}, "B": {}}, "E": [{"v1": "A", "v2": "B", "w": 0}]}"#;
        let env = Environment::from_json(json).unwrap();

        assert!(matches!(
            env.build_graph(),
            Err(EnvironmentError::NonPositiveWeight { .. })
        ));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            Environment::from_json("{\"V\": 3}"),
            Err(EnvironmentError::Parse(_))
        ));
    }
}
