// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// One use case per pipeline stage. Each reads what the previous
// stage left in the artifact directory and returns a report;
// printing is left to Layer 1.
//
//   train  →  quantize  →  predict / predict-quant
//
// Rules for this layer:
//   - No least-squares or codec math here (that's Layer 5)
//   - No printing here (that's Layer 1)
//   - File access goes through infra::artifacts
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Fit, evaluate and persist the full-precision model
pub mod train_use_case;

// Encode the model's parameters to 8-bit codes
pub mod quantize_use_case;

// Full-precision predictions on the held-out rows
pub mod predict_use_case;

// Predictions from the decoded quantised artifact
pub mod predict_quant_use_case;
