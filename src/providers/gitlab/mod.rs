mod client;
mod orchestrator;
mod types;

pub use orchestrator::PipelineOrchestrator;
