//! Core types for model execution.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::RtError;

/// Tensor element type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    F32,
    I64,
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataType::F32 => write!(f, "f32"),
            DataType::I64 => write!(f, "i64"),
        }
    }
}

/// Typed tensor storage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "dtype", content = "values", rename_all = "lowercase")]
pub enum TensorData {
    F32(Vec<f32>),
    I64(Vec<i64>),
}

impl TensorData {
    /// Number of elements in the storage
    pub fn len(&self) -> usize {
        match self {
            TensorData::F32(v) => v.len(),
            TensorData::I64(v) => v.len(),
        }
    }

    /// Whether the storage is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element type of the storage
    pub fn dtype(&self) -> DataType {
        match self {
            TensorData::F32(_) => DataType::F32,
            TensorData::I64(_) => DataType::I64,
        }
    }
}

/// A dense tensor: dimensions plus typed storage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tensor {
    pub dims: Vec<usize>,
    pub data: TensorData,
}

impl Tensor {
    /// Create an f32 tensor from dims and values
    pub fn f32(dims: Vec<usize>, values: Vec<f32>) -> Self {
        Self {
            dims,
            data: TensorData::F32(values),
        }
    }

    /// Create an i64 tensor from dims and values
    pub fn i64(dims: Vec<usize>, values: Vec<i64>) -> Self {
        Self {
            dims,
            data: TensorData::I64(values),
        }
    }

    /// Create a rank-0 f32 scalar
    pub fn scalar_f32(value: f32) -> Self {
        Self::f32(vec![], vec![value])
    }

    /// Create a rank-0 i64 scalar
    pub fn scalar_i64(value: i64) -> Self {
        Self::i64(vec![], vec![value])
    }

    /// Element type
    pub fn dtype(&self) -> DataType {
        self.data.dtype()
    }

    /// Number of elements implied by the dims
    pub fn element_count(&self) -> usize {
        self.dims.iter().product()
    }

    /// Whether the storage length is consistent with the dims
    pub fn is_well_formed(&self) -> bool {
        self.data.len() == self.element_count()
    }

    /// Whether the tensor is a single-element scalar (any rank)
    pub fn is_scalar(&self) -> bool {
        self.data.len() == 1
    }
}

/// Mapping of tensor names to tensor values
pub type TensorMap = HashMap<String, Tensor>;

/// Declared model input: name, dtype, and dims with dynamic entries
///
/// A `None` dimension is dynamic and matches any size at that axis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TensorSpec {
    pub name: String,
    pub dtype: DataType,
    pub dims: Vec<Option<usize>>,
}

impl TensorSpec {
    /// Create a fully static tensor spec
    pub fn new(name: impl Into<String>, dtype: DataType, dims: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            dtype,
            dims: dims.into_iter().map(Some).collect(),
        }
    }

    /// Create a tensor spec with dynamic dimensions
    pub fn dynamic(name: impl Into<String>, dtype: DataType, dims: Vec<Option<usize>>) -> Self {
        Self {
            name: name.into(),
            dtype,
            dims,
        }
    }

    /// Check a concrete tensor against this spec
    pub fn matches(&self, tensor: &Tensor) -> Result<(), RtError> {
        if tensor.dtype() != self.dtype {
            return Err(RtError::DTypeMismatch {
                name: self.name.clone(),
                expected: self.dtype,
                actual: tensor.dtype(),
            });
        }
        let rank_ok = tensor.dims.len() == self.dims.len();
        let dims_ok = rank_ok
            && self
                .dims
                .iter()
                .zip(&tensor.dims)
                .all(|(spec, actual)| spec.map_or(true, |d| d == *actual));
        if !dims_ok {
            return Err(RtError::shape_mismatch(
                &self.name,
                format!("{:?}", self.dims),
                format!("{:?}", tensor.dims),
            ));
        }
        Ok(())
    }
}

/// A single operation in a model graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Operator type, e.g. "Add" or "Identity"
    pub op_type: String,

    /// Optional node name for diagnostics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Names of input tensors
    pub inputs: Vec<String>,

    /// Names of output tensors
    pub outputs: Vec<String>,

    /// Operator attributes
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attrs: HashMap<String, serde_json::Value>,
}

impl Node {
    /// Create a new node
    pub fn new(op_type: impl Into<String>, inputs: Vec<&str>, outputs: Vec<&str>) -> Self {
        Self {
            op_type: op_type.into(),
            name: None,
            inputs: inputs.into_iter().map(String::from).collect(),
            outputs: outputs.into_iter().map(String::from).collect(),
            attrs: HashMap::new(),
        }
    }

    /// Set the node name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set an attribute
    pub fn with_attr(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attrs.insert(key.into(), value);
        self
    }

    /// Display name for diagnostics: node name if set, else the op type
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.op_type)
    }
}

/// A model graph: declared inputs, requested outputs, and operations
///
/// Nodes are expected in topological order, the order graph formats
/// such as ONNX guarantee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelGraph {
    pub name: String,
    pub inputs: Vec<TensorSpec>,
    pub outputs: Vec<String>,
    pub nodes: Vec<Node>,
}

impl ModelGraph {
    /// Create a new model graph
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            nodes: Vec::new(),
        }
    }

    /// Add a declared input
    pub fn with_input(mut self, spec: TensorSpec) -> Self {
        self.inputs.push(spec);
        self
    }

    /// Add a requested output name
    pub fn with_output(mut self, name: impl Into<String>) -> Self {
        self.outputs.push(name.into());
        self
    }

    /// Add a node
    pub fn with_node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    /// Parse a model graph from its JSON representation
    pub fn from_json(json: &str) -> Result<Self, RtError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the model graph to JSON
    pub fn to_json(&self) -> Result<String, RtError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Executor identity metadata
#[derive(Debug, Clone)]
pub struct ExecutorInfo {
    pub id: String,
    pub name: String,
}

/// Per-invocation context
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub executor_id: String,
    pub model: String,
    pub metadata: Arc<HashMap<String, String>>,
}

impl RunContext {
    /// Create a new run context
    pub fn new(executor_id: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            executor_id: executor_id.into(),
            model: model.into(),
            metadata: Arc::new(HashMap::new()),
        }
    }

    /// Create context with metadata
    pub fn with_metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = Arc::new(metadata);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tensor_well_formed() {
        let t = Tensor::f32(vec![2, 3], vec![1.0; 6]);
        assert!(t.is_well_formed());
        assert_eq!(t.element_count(), 6);

        let bad = Tensor::f32(vec![2, 3], vec![1.0; 5]);
        assert!(!bad.is_well_formed());
    }

    #[test]
    fn test_scalar() {
        let s = Tensor::scalar_i64(7);
        assert!(s.is_scalar());
        assert_eq!(s.dims, Vec::<usize>::new());
        assert_eq!(s.dtype(), DataType::I64);
    }

    #[test]
    fn test_spec_matches_static_dims() {
        let spec = TensorSpec::new("x", DataType::F32, vec![2, 2]);
        assert!(spec.matches(&Tensor::f32(vec![2, 2], vec![0.0; 4])).is_ok());

        let err = spec
            .matches(&Tensor::f32(vec![2, 3], vec![0.0; 6]))
            .unwrap_err();
        assert!(matches!(err, RtError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_spec_matches_dynamic_dims() {
        let spec = TensorSpec::dynamic("x", DataType::F32, vec![None, Some(4)]);
        assert!(spec.matches(&Tensor::f32(vec![8, 4], vec![0.0; 32])).is_ok());
        assert!(spec
            .matches(&Tensor::f32(vec![8, 5], vec![0.0; 40]))
            .is_err());
    }

    #[test]
    fn test_spec_rejects_wrong_dtype() {
        let spec = TensorSpec::new("x", DataType::F32, vec![1]);
        let err = spec.matches(&Tensor::i64(vec![1], vec![1])).unwrap_err();
        assert!(matches!(err, RtError::DTypeMismatch { .. }));
    }

    #[test]
    fn test_model_graph_json_round_trip() {
        let graph = ModelGraph::new("tiny")
            .with_input(TensorSpec::new("x", DataType::F32, vec![2]))
            .with_output("y")
            .with_node(Node::new("Identity", vec!["x"], vec!["y"]));

        let json = graph.to_json().unwrap();
        let parsed = ModelGraph::from_json(&json).unwrap();
        assert_eq!(parsed.name, "tiny");
        assert_eq!(parsed.nodes.len(), 1);
        assert_eq!(parsed.nodes[0].op_type, "Identity");
    }
}
