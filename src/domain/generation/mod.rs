pub mod script;
pub mod summary;

pub use script::ScriptGenerationClient;
pub use summary::SummaryGenerationClient;
