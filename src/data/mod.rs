// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between "a table on disk" and "train/test
// partitions ready for fitting".
//
//   CSV file / synthetic generator
//       │
//       ▼
//   DatasetSource      → Dataset (features + targets)
//       │
//       ▼
//   train_test_split   → Split { train, test } (seeded shuffle)
//
// Each module is responsible for exactly one step.
//
// Reference: Rust Book §13 (Iterators and Closures)
//            rand crate documentation

/// Reads the housing table from a headered CSV file
pub mod loader;

/// Seeded synthetic linear dataset for tests and offline demos
pub mod synthetic;

/// Serializable description of which source a run used
pub mod source;

/// Seeded, reproducible train/test splitting
pub mod splitter;
