// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs and traits describing what the pipeline
// works with: a tabular dataset, an ordered parameter vector,
// and the abstractions other layers implement.
//
// Rules for this layer:
//   - NO file I/O
//   - NO linear algebra or codec code
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Feature matrix + target vector
pub mod dataset;

// Coefficients followed by the intercept, in fixed order
pub mod params;

// Core abstractions (traits) that other layers implement
pub mod traits;
