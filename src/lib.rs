pub mod calendar;
pub mod classify;
pub mod context;
pub mod error;
pub mod graph;
pub mod loader;
pub mod metrics;
pub mod project;
pub mod record;
pub mod summary;
pub mod table;

pub use calendar::BusinessCalendar;
pub use classify::{Classifier, DateField};
pub use context::AnalysisContext;
pub use error::{AnalysisError, AnalysisResult};
pub use graph::{DependencyGraph, DependencyGraphBuilder, TaskNode};
pub use metrics::{ProgressPhase, ScheduleMetrics, SpanClass, SpanThresholds};
pub use project::{Project, ProjectAggregator, SubProject};
pub use record::TaskRecord;
pub use table::TaskTable;
