// Connection network analysis
// Implements: CSV decoding, field detection, normalization, aggregation,
// synthetic fallbacks, growth series, and the LLM-backed analysis routes.
// The pipeline itself is pure and synchronous; only handlers touch the network.

pub mod aggregate;
pub mod fallback;
pub mod field_detector;
pub mod growth;
pub mod handlers;
pub mod insights;
pub mod normalize;
pub mod pipeline;
pub mod prompts;
pub mod records;
