// ============================================================================
// Interfaces Module
// Contains the trait seams between storage and statistics
// ============================================================================

mod basic_statistics;

pub use basic_statistics::BasicStatistics;
