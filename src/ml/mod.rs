//! ML model backends
//!
//! Optional ONNX Runtime inference for the pretrained confidence regressor.

#[cfg(feature = "ml")]
pub mod onnx_model;
