use std::path::PathBuf;

use biotask_core::document_index::ResponseMode;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "biotask",
    version,
    about = "Route biomedical questions to generated API code"
)]
pub struct Cli {
    /// Configuration file path (defaults to config/biotask.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Select a tool, generate code and optionally run and validate it
    Run(RunArgs),
    /// Show the tool and prompt a task would be sent with
    Prompt(TaskInput),
    /// Count tokens with the configured encoding
    Tokens(TextArgs),
    /// Ask the model whether a response fits a goal
    Validate(ValidateArgs),
    /// Apply a parsing instruction to some content
    Parse(ParseArgs),
    /// Fetch stored results relevant to a query
    Recall(RecallArgs),
    /// Store a task result in the vector index
    Remember(RememberArgs),
    /// Answer a question over local documents
    Summarize(SummarizeArgs),
    /// Print the seeded world model
    WorldModel(WorldModelArgs),
}

#[derive(Args, Debug)]
pub struct TaskInput {
    /// Read the task from a file instead of arguments
    #[arg(long)]
    pub task_file: Option<PathBuf>,
    pub task: Vec<String>,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub input: TaskInput,
    /// Execute the generated code
    #[arg(long)]
    pub execute: bool,
    /// Validate the outcome with a second completion
    #[arg(long)]
    pub validate: bool,
}

#[derive(Args, Debug)]
pub struct TextArgs {
    #[arg(required = true)]
    pub text: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[arg(long)]
    pub goal: String,
    #[arg(long)]
    pub response: String,
}

#[derive(Args, Debug)]
pub struct ParseArgs {
    #[arg(long)]
    pub instruction: String,
    /// Read the content from a file instead of arguments
    #[arg(long)]
    pub file: Option<PathBuf>,
    pub content: Vec<String>,
}

#[derive(Args, Debug)]
pub struct RecallArgs {
    pub query: Vec<String>,
    /// Overrides [vector_store].top_k
    #[arg(long)]
    pub top_k: Option<usize>,
}

#[derive(Args, Debug)]
pub struct RememberArgs {
    #[arg(long)]
    pub task: String,
    #[arg(long)]
    pub result: String,
    /// Record id (a random UUID when omitted)
    #[arg(long)]
    pub id: Option<String>,
}

#[derive(Args, Debug)]
pub struct SummarizeArgs {
    /// Documents to index
    #[arg(long = "file", required = true)]
    pub files: Vec<PathBuf>,
    #[arg(long)]
    pub question: Option<String>,
    #[arg(long, default_value_t = ResponseMode::TreeSummarize)]
    pub mode: ResponseMode,
}

#[derive(Args, Debug)]
pub struct WorldModelArgs {
    /// Dotted path into the model, e.g. `Geography.United States`
    #[arg(long)]
    pub path: Option<String>,
}
