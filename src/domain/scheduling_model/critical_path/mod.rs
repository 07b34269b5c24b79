pub mod analyzer;
pub mod critical_path_result;

/// Two times closer than this are treated as equal (slack, tight edges, verifier checks).
pub const TIME_EPSILON: f64 = 1e-3;
