//! Pipeline coordinator for the merch publishing workflow.
//!
//! Runs the content, visual, merge, publish, and report stages strictly in
//! order, hands data between them through the artifact store, and writes
//! exactly one run summary per execution.

pub mod command;
pub mod confirm;
pub mod coordinator;
pub mod error;
pub mod modes;
pub mod stage;
pub mod stages;
pub mod summary;

pub use command::StageCommand;
pub use confirm::PublishConfirmation;
pub use coordinator::{ArtifactPolicy, Coordinator, RunReport};
pub use error::{PipelineError, StageError, StageFailure};
pub use modes::{
    check_connection, run_full_pipeline, run_platform_demo, run_simulation, ConnectionReport,
    RunMode,
};
pub use stage::Stage;
pub use stages::{ContentStage, VisualStage};
pub use summary::{RunOutcome, RunSummary};
