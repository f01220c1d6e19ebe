pub mod burst;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod series;
pub mod windowing;

pub use burst::{detect_bursts, BurstFindings, ExactDuplicateBurst, SimilarMessageBurst, SuspiciousChatter};
pub use engine::ReportEngine;
pub use error::{ReportError, Result};
pub use metrics::{compute_message_metrics, MessageMetrics};
pub use series::{build_message_series, build_viewer_series, hours_watched, viewer_analytics, SeriesPoint};
pub use windowing::{ceil_to_block, compute_window, floor_to_block, Window};
