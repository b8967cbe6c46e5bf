pub mod tool;
pub mod types;
pub mod world;

pub use tool::{ToolCatalog, ToolDocumentation, ToolKind};
pub use types::{ChatMessage, MessageRole};
pub use world::WorldModel;
