//! Reference graph interpreter.
//!
//! This executor evaluates a model graph node by node, the way a
//! simplifier's value-inference pass needs: feed constant inputs through
//! the graph and read back concrete output tensors. It covers a small
//! built-in operator set and accepts custom handlers for anything beyond
//! it.

use async_trait::async_trait;
use modelrt_core::error::RtError;
use modelrt_core::executor::ModelExecutor;
use modelrt_core::types::*;
use std::collections::HashMap;
use std::sync::Arc;

/// Handler for a custom operator.
///
/// Receives the node and its resolved input tensors, returns one tensor
/// per node output.
pub type OpHandler =
    dyn Fn(&Node, &[&Tensor]) -> Result<Vec<Tensor>, RtError> + Send + Sync + 'static;

/// Builder for [`EvalExecutor`].
#[derive(Default)]
pub struct EvalExecutorBuilder {
    custom_ops: HashMap<String, Arc<OpHandler>>,
}

impl EvalExecutorBuilder {
    /// Register a custom operator handler
    ///
    /// Custom handlers are consulted before the built-in set, so they can
    /// also shadow a built-in operator. Registering the same op type twice
    /// keeps the later handler.
    pub fn op(
        mut self,
        op_type: impl Into<String>,
        handler: impl Fn(&Node, &[&Tensor]) -> Result<Vec<Tensor>, RtError> + Send + Sync + 'static,
    ) -> Self {
        let op_type = op_type.into();
        if self
            .custom_ops
            .insert(op_type.clone(), Arc::new(handler))
            .is_some()
        {
            tracing::warn!(op = %op_type, "custom op handler replaced");
        }
        self
    }

    /// Finish building with the default executor identity
    pub fn build(self) -> EvalExecutor {
        EvalExecutor {
            info: Arc::new(ExecutorInfo {
                id: "eval".to_string(),
                name: "Reference graph interpreter".to_string(),
            }),
            custom_ops: self.custom_ops,
        }
    }

    /// Finish building with a custom executor identity
    pub fn build_with_id(
        self,
        id: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<EvalExecutor, RtError> {
        let id = id.into();
        if id.is_empty() {
            return Err(RtError::configuration("executor id must not be empty"));
        }
        Ok(EvalExecutor {
            info: Arc::new(ExecutorInfo {
                id,
                name: name.into(),
            }),
            custom_ops: self.custom_ops,
        })
    }
}

impl std::fmt::Debug for EvalExecutorBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvalExecutorBuilder")
            .field("custom_ops", &self.custom_ops.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Reference executor interpreting model graphs.
///
/// Built-in operators: `Identity`, `Constant`, `Add`, `Sub`, `Mul`,
/// `Neg`, `Relu`, `Shape`. Elementwise binaries require identical dims,
/// with single-element scalar broadcast allowed on either side.
#[derive(Clone)]
pub struct EvalExecutor {
    info: Arc<ExecutorInfo>,
    custom_ops: HashMap<String, Arc<OpHandler>>,
}

impl std::fmt::Debug for EvalExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvalExecutor")
            .field("info", &self.info)
            .field("custom_ops", &self.custom_ops.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl EvalExecutor {
    /// Create an executor with the built-in operator set only
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a builder for registering custom operators
    pub fn builder() -> EvalExecutorBuilder {
        EvalExecutorBuilder::default()
    }

    fn eval_node(&self, node: &Node, inputs: &[&Tensor]) -> Result<Vec<Tensor>, RtError> {
        if let Some(handler) = self.custom_ops.get(&node.op_type) {
            return handler(node, inputs);
        }

        match node.op_type.as_str() {
            "Identity" => {
                expect_arity(node, inputs, 1)?;
                Ok(vec![inputs[0].clone()])
            }
            "Constant" => {
                expect_arity(node, inputs, 0)?;
                let value = node.attrs.get("value").ok_or_else(|| {
                    RtError::malformed_model(format!(
                        "Constant node '{}' has no 'value' attribute",
                        node.display_name()
                    ))
                })?;
                let tensor: Tensor = serde_json::from_value(value.clone())?;
                if !tensor.is_well_formed() {
                    return Err(RtError::malformed_model(format!(
                        "Constant node '{}' value has {} elements but dims {:?}",
                        node.display_name(),
                        tensor.data.len(),
                        tensor.dims
                    )));
                }
                Ok(vec![tensor])
            }
            "Add" => binary_elementwise(node, inputs, |a, b| a + b, |a, b| a + b),
            "Sub" => binary_elementwise(node, inputs, |a, b| a - b, |a, b| a - b),
            "Mul" => binary_elementwise(node, inputs, |a, b| a * b, |a, b| a * b),
            "Neg" => {
                expect_arity(node, inputs, 1)?;
                let t = inputs[0];
                let data = match &t.data {
                    TensorData::F32(v) => TensorData::F32(v.iter().map(|x| -x).collect()),
                    TensorData::I64(v) => TensorData::I64(v.iter().map(|x| -x).collect()),
                };
                Ok(vec![Tensor {
                    dims: t.dims.clone(),
                    data,
                }])
            }
            "Relu" => {
                expect_arity(node, inputs, 1)?;
                let t = inputs[0];
                match &t.data {
                    TensorData::F32(v) => Ok(vec![Tensor::f32(
                        t.dims.clone(),
                        v.iter().map(|x| x.max(0.0)).collect(),
                    )]),
                    TensorData::I64(_) => Err(RtError::DTypeMismatch {
                        name: node.display_name().to_string(),
                        expected: DataType::F32,
                        actual: DataType::I64,
                    }),
                }
            }
            "Shape" => {
                expect_arity(node, inputs, 1)?;
                let dims = &inputs[0].dims;
                Ok(vec![Tensor::i64(
                    vec![dims.len()],
                    dims.iter().map(|d| *d as i64).collect(),
                )])
            }
            other => Err(RtError::unsupported_op(other)),
        }
    }
}

impl Default for EvalExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelExecutor for EvalExecutor {
    fn info(&self) -> Arc<ExecutorInfo> {
        self.info.clone()
    }

    async fn run(&self, model: &ModelGraph, inputs: &TensorMap) -> Result<TensorMap, RtError> {
        let mut env = TensorMap::new();
        for spec in &model.inputs {
            let tensor = inputs
                .get(&spec.name)
                .ok_or_else(|| RtError::missing_input(&spec.name))?;
            env.insert(spec.name.clone(), tensor.clone());
        }

        for node in &model.nodes {
            let node_inputs = node
                .inputs
                .iter()
                .map(|name| {
                    env.get(name).ok_or_else(|| {
                        RtError::malformed_model(format!(
                            "node '{}' references undefined tensor '{}'",
                            node.display_name(),
                            name
                        ))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            let produced = self.eval_node(node, &node_inputs)?;
            if produced.len() != node.outputs.len() {
                return Err(RtError::malformed_model(format!(
                    "node '{}' produced {} tensors for {} declared outputs",
                    node.display_name(),
                    produced.len(),
                    node.outputs.len()
                )));
            }
            for (name, tensor) in node.outputs.iter().zip(produced) {
                env.insert(name.clone(), tensor);
            }
        }

        let mut outputs = TensorMap::new();
        for name in &model.outputs {
            let tensor = env.get(name).ok_or_else(|| {
                RtError::malformed_model(format!("graph output '{}' was never produced", name))
            })?;
            outputs.insert(name.clone(), tensor.clone());
        }
        Ok(outputs)
    }
}

fn expect_arity(node: &Node, inputs: &[&Tensor], arity: usize) -> Result<(), RtError> {
    if inputs.len() != arity {
        return Err(RtError::malformed_model(format!(
            "op '{}' on node '{}' expects {} inputs, got {}",
            node.op_type,
            node.display_name(),
            arity,
            inputs.len()
        )));
    }
    Ok(())
}

/// Elementwise binary op with single-element scalar broadcast.
fn binary_elementwise(
    node: &Node,
    inputs: &[&Tensor],
    f32_op: fn(f32, f32) -> f32,
    i64_op: fn(i64, i64) -> i64,
) -> Result<Vec<Tensor>, RtError> {
    expect_arity(node, inputs, 2)?;
    let (lhs, rhs) = (inputs[0], inputs[1]);

    let dims = if lhs.dims == rhs.dims {
        lhs.dims.clone()
    } else if rhs.is_scalar() {
        lhs.dims.clone()
    } else if lhs.is_scalar() {
        rhs.dims.clone()
    } else {
        return Err(RtError::shape_mismatch(
            node.display_name(),
            format!("{:?}", lhs.dims),
            format!("{:?}", rhs.dims),
        ));
    };

    let data = match (&lhs.data, &rhs.data) {
        (TensorData::F32(a), TensorData::F32(b)) => {
            TensorData::F32(broadcast_zip(a, b, f32_op))
        }
        (TensorData::I64(a), TensorData::I64(b)) => {
            TensorData::I64(broadcast_zip(a, b, i64_op))
        }
        _ => {
            return Err(RtError::DTypeMismatch {
                name: node.display_name().to_string(),
                expected: lhs.dtype(),
                actual: rhs.dtype(),
            })
        }
    };

    Ok(vec![Tensor { dims, data }])
}

fn broadcast_zip<T: Copy>(a: &[T], b: &[T], op: fn(T, T) -> T) -> Vec<T> {
    match (a.len(), b.len()) {
        (_, 1) => a.iter().map(|x| op(*x, b[0])).collect(),
        (1, _) => b.iter().map(|x| op(a[0], *x)).collect(),
        _ => a.iter().zip(b).map(|(x, y)| op(*x, *y)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn run(model: &ModelGraph, inputs: TensorMap) -> Result<TensorMap, RtError> {
        EvalExecutor::new().run(model, &inputs).await
    }

    fn single_f32_input(values: Vec<f32>) -> (ModelGraph, TensorMap) {
        let dims = vec![values.len()];
        let model = ModelGraph::new("m")
            .with_input(TensorSpec::new("x", DataType::F32, dims.clone()))
            .with_output("y");
        let mut inputs = TensorMap::new();
        inputs.insert("x".to_string(), Tensor::f32(dims, values));
        (model, inputs)
    }

    #[tokio::test]
    async fn test_identity_pass_through() {
        let (model, inputs) = single_f32_input(vec![1.0, 2.0, 3.0]);
        let model = model.with_node(Node::new("Identity", vec!["x"], vec!["y"]));

        let outputs = run(&model, inputs).await.unwrap();
        assert_eq!(outputs["y"], Tensor::f32(vec![3], vec![1.0, 2.0, 3.0]));
    }

    #[tokio::test]
    async fn test_constant_folding_add() {
        let model = ModelGraph::new("fold")
            .with_output("y")
            .with_node(
                Node::new("Constant", vec![], vec!["a"]).with_attr(
                    "value",
                    serde_json::to_value(Tensor::f32(vec![2], vec![2.0, 4.0])).unwrap(),
                ),
            )
            .with_node(
                Node::new("Constant", vec![], vec!["b"]).with_attr(
                    "value",
                    serde_json::to_value(Tensor::f32(vec![2], vec![3.0, 1.0])).unwrap(),
                ),
            )
            .with_node(Node::new("Add", vec!["a", "b"], vec!["y"]));

        let outputs = run(&model, TensorMap::new()).await.unwrap();
        assert_eq!(outputs["y"], Tensor::f32(vec![2], vec![5.0, 5.0]));
    }

    #[tokio::test]
    async fn test_scalar_broadcast_mul() {
        let (model, mut inputs) = single_f32_input(vec![1.0, 2.0, 3.0]);
        let model = model
            .with_input(TensorSpec::new("k", DataType::F32, vec![]))
            .with_node(Node::new("Mul", vec!["x", "k"], vec!["y"]));
        inputs.insert("k".to_string(), Tensor::scalar_f32(2.0));

        let outputs = run(&model, inputs).await.unwrap();
        assert_eq!(outputs["y"], Tensor::f32(vec![3], vec![2.0, 4.0, 6.0]));
    }

    #[tokio::test]
    async fn test_i64_sub() {
        let model = ModelGraph::new("m")
            .with_input(TensorSpec::new("a", DataType::I64, vec![2]))
            .with_input(TensorSpec::new("b", DataType::I64, vec![2]))
            .with_output("y")
            .with_node(Node::new("Sub", vec!["a", "b"], vec!["y"]));
        let mut inputs = TensorMap::new();
        inputs.insert("a".to_string(), Tensor::i64(vec![2], vec![10, 20]));
        inputs.insert("b".to_string(), Tensor::i64(vec![2], vec![1, 2]));

        let outputs = run(&model, inputs).await.unwrap();
        assert_eq!(outputs["y"], Tensor::i64(vec![2], vec![9, 18]));
    }

    #[tokio::test]
    async fn test_relu() {
        let (model, inputs) = single_f32_input(vec![-1.0, 0.0, 2.5]);
        let model = model.with_node(Node::new("Relu", vec!["x"], vec!["y"]));

        let outputs = run(&model, inputs).await.unwrap();
        assert_eq!(outputs["y"], Tensor::f32(vec![3], vec![0.0, 0.0, 2.5]));
    }

    #[tokio::test]
    async fn test_shape_produces_i64_dims() {
        let model = ModelGraph::new("m")
            .with_input(TensorSpec::new("x", DataType::F32, vec![2, 3]))
            .with_output("y")
            .with_node(Node::new("Shape", vec!["x"], vec!["y"]));
        let mut inputs = TensorMap::new();
        inputs.insert("x".to_string(), Tensor::f32(vec![2, 3], vec![0.0; 6]));

        let outputs = run(&model, inputs).await.unwrap();
        assert_eq!(outputs["y"], Tensor::i64(vec![2], vec![2, 3]));
    }

    #[tokio::test]
    async fn test_shape_mismatch_rejected() {
        let model = ModelGraph::new("m")
            .with_input(TensorSpec::new("a", DataType::F32, vec![2]))
            .with_input(TensorSpec::new("b", DataType::F32, vec![3]))
            .with_output("y")
            .with_node(Node::new("Add", vec!["a", "b"], vec!["y"]));
        let mut inputs = TensorMap::new();
        inputs.insert("a".to_string(), Tensor::f32(vec![2], vec![1.0, 2.0]));
        inputs.insert("b".to_string(), Tensor::f32(vec![3], vec![1.0, 2.0, 3.0]));

        let err = run(&model, inputs).await.unwrap_err();
        assert!(matches!(err, RtError::ShapeMismatch { .. }));
        assert!(err.is_execution_failure());
    }

    #[tokio::test]
    async fn test_unsupported_op_rejected() {
        let (model, inputs) = single_f32_input(vec![1.0]);
        let model = model.with_node(Node::new("Gemm", vec!["x"], vec!["y"]));

        let err = run(&model, inputs).await.unwrap_err();
        assert!(matches!(err, RtError::UnsupportedOp(op) if op == "Gemm"));
    }

    #[tokio::test]
    async fn test_missing_declared_input_rejected() {
        let model = ModelGraph::new("m")
            .with_input(TensorSpec::new("x", DataType::F32, vec![1]))
            .with_output("x");

        let err = run(&model, TensorMap::new()).await.unwrap_err();
        assert!(matches!(err, RtError::MissingInput(name) if name == "x"));
    }

    #[tokio::test]
    async fn test_undefined_tensor_reference_rejected() {
        let model = ModelGraph::new("m")
            .with_output("y")
            .with_node(Node::new("Identity", vec!["ghost"], vec!["y"]));

        let err = run(&model, TensorMap::new()).await.unwrap_err();
        assert!(matches!(err, RtError::MalformedModel(_)));
    }

    #[tokio::test]
    async fn test_unproduced_graph_output_rejected() {
        let (model, inputs) = single_f32_input(vec![1.0]);
        let model = model.with_output("never");
        let model = model.with_node(Node::new("Identity", vec!["x"], vec!["y"]));

        let err = run(&model, inputs).await.unwrap_err();
        assert!(matches!(err, RtError::MalformedModel(_)));
    }

    #[tokio::test]
    async fn test_constant_without_value_attr_rejected() {
        let model = ModelGraph::new("m")
            .with_output("y")
            .with_node(Node::new("Constant", vec![], vec!["y"]));

        let err = run(&model, TensorMap::new()).await.unwrap_err();
        assert!(matches!(err, RtError::MalformedModel(_)));
    }

    #[tokio::test]
    async fn test_custom_op_handler() {
        let executor = EvalExecutor::builder()
            .op("Double", |_node, inputs| {
                let t = inputs[0];
                match &t.data {
                    TensorData::F32(v) => Ok(vec![Tensor::f32(
                        t.dims.clone(),
                        v.iter().map(|x| x * 2.0).collect(),
                    )]),
                    _ => Err(RtError::execution("Double expects f32")),
                }
            })
            .build();

        let model = ModelGraph::new("m")
            .with_input(TensorSpec::new("x", DataType::F32, vec![2]))
            .with_output("y")
            .with_node(Node::new("Double", vec!["x"], vec!["y"]));
        let mut inputs = TensorMap::new();
        inputs.insert("x".to_string(), Tensor::f32(vec![2], vec![1.0, 2.0]));

        let outputs = executor.run(&model, &inputs).await.unwrap();
        assert_eq!(outputs["y"], Tensor::f32(vec![2], vec![2.0, 4.0]));
    }

    #[test]
    fn test_build_with_empty_id_rejected() {
        let err = EvalExecutor::builder().build_with_id("", "nameless").unwrap_err();
        assert!(matches!(err, RtError::Configuration(_)));
    }
}
