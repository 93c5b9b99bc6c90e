//! Basic lifecycle walk-through using the modelrt meta crate.
//!
//! This demonstrates the full executor lifecycle:
//! 1. Build a reference executor wrapped with validation and logging layers
//! 2. Install it into the runtime (the registry takes the only ownership share)
//! 3. Register the deferred clear on the shutdown sequence, ahead of the
//!    hooks that tear down what the executor depends on
//! 4. Run a small graph and read back folded constant values
//! 5. Run the shutdown sequence and observe the slot is released first

use modelrt::layer::{LoggingLayer, ValidationLayer};
use modelrt::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let runtime = ModelRuntime::new();
    let mut shutdown = ShutdownSequence::new();

    // Layered executor: validation first, logging outermost.
    let executor = LoggingLayer::new().layer(ValidationLayer::new().layer(reference()));
    runtime.set_model_executor(executor);
    runtime.register_shutdown(&mut shutdown);
    shutdown.register("runtime-teardown", || {
        tracing::info!("runtime teardown running with an empty registry slot");
    });

    // y = relu(x * 2) for a graph described as JSON.
    let model = ModelGraph::from_json(
        r#"{
            "name": "scale-relu",
            "inputs": [{"name": "x", "dtype": "f32", "dims": [3]}],
            "outputs": ["y"],
            "nodes": [
                {"op_type": "Constant", "inputs": [], "outputs": ["k"],
                 "attrs": {"value": {"dims": [], "data": {"dtype": "f32", "values": [2.0]}}}},
                {"op_type": "Mul", "inputs": ["x", "k"], "outputs": ["scaled"]},
                {"op_type": "Relu", "inputs": ["scaled"], "outputs": ["y"]}
            ]
        }"#,
    )?;

    let mut inputs = TensorMap::new();
    inputs.insert("x".to_string(), Tensor::f32(vec![3], vec![-1.0, 0.5, 2.0]));

    let outputs = runtime.execute(&model, &inputs).await?;
    println!("y = {:?}", outputs["y"]);

    // Executing with a missing input is rejected by the validation layer.
    let err = runtime.execute(&model, &TensorMap::new()).await.unwrap_err();
    println!("missing input rejected: {err}");

    shutdown.run();

    // The slot is empty now; further runs fail fast.
    let err = runtime.execute(&model, &inputs).await.unwrap_err();
    println!("after shutdown: {err}");

    Ok(())
}
