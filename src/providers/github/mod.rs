mod context;
mod types;


pub use context::GithubContext;
pub use types::{EventPayload, TriggerEvent};
