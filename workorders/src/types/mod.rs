pub mod config;
pub mod enums;
pub mod resources;

// Re-export commonly used types for convenience
pub use config::{ClientConfig, ConfigLocation, ConfigSource};
pub use enums::{LogFormat, OutputFormat, ResourceKind};
pub use resources::{
    Analysis, AnnotatedTask, AppVersion, EnrichedWorkOrder, Listing, Outcome, Task, TaskGroup,
    WorkOrder, WorkOrderType,
};
