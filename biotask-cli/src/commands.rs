use std::fs;
use std::path::Path;
use std::sync::Arc;

use biotask_core::completion::CompletionClient;
use biotask_core::constants::DEFAULT_SUMMARY_QUESTION;
use biotask_core::document_index::{Document, DocumentIndex, SummaryIndex};
use biotask_core::errors::PipelineError;
use biotask_core::executor::PythonExecutor;
use biotask_core::knowledge::KnowledgeBase;
use biotask_core::model::{OpenAIClient, TokenCounter};
use biotask_core::parser::ContentParser;
use biotask_core::pipeline::{RunOptions, TaskPipeline};
use biotask_core::prompt::PromptAssembler;
use biotask_core::selector::select_tool;
use biotask_core::validator::ResponseValidator;
use biotask_core::vector::PineconeIndex;
use biotask_core::world::WorldModel;
use biotask_core::{AppConfig, ConfigError, PipelineContext};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::cli::{
    Command, ParseArgs, RecallArgs, RememberArgs, RunArgs, SummarizeArgs, TaskInput,
    ValidateArgs, WorldModelArgs,
};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}")]
    Usage(String),
}

impl CliError {
    pub fn user_message(&self) -> String {
        match self {
            CliError::Pipeline(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Pipeline(err.into())
    }
}

/// What a command produced: a plain line for humans and a JSON body.
pub struct Output {
    pub text: String,
    pub json: Value,
}

impl Output {
    fn new(text: impl Into<String>, json: Value) -> Self {
        Self {
            text: text.into(),
            json,
        }
    }
}

type Client = CompletionClient<OpenAIClient>;

fn openai_client(context: &PipelineContext) -> Result<Arc<Client>, CliError> {
    let provider = OpenAIClient::from_settings(&context.config.provider, &context.credentials)
        .map_err(PipelineError::from)?;
    let client = CompletionClient::from_context(provider, context).map_err(PipelineError::from)?;
    debug!(model = %client.settings().completion_model, "Completion client ready");
    Ok(Arc::new(client))
}

fn connect(config: AppConfig) -> Result<(PipelineContext, Arc<Client>), CliError> {
    let context = PipelineContext::from_env(config)?;
    let client = openai_client(&context)?;
    Ok((context, client))
}

fn knowledge_base(
    config: AppConfig,
) -> Result<(PipelineContext, KnowledgeBase<OpenAIClient, PineconeIndex>), CliError> {
    let settings = config.vector_store.clone().ok_or_else(|| {
        CliError::Usage("no [vector_store] section in the configuration".to_string())
    })?;
    let store = PineconeIndex::from_env(&settings)?;
    let (context, client) = connect(config)?;
    Ok((context, KnowledgeBase::new(client, store)))
}

pub async fn dispatch(command: Command, config: AppConfig) -> Result<Output, CliError> {
    match command {
        Command::Run(args) => run(args, config).await,
        Command::Prompt(input) => prompt(input, config),
        Command::Tokens(args) => tokens(&args.text.join(" "), &config),
        Command::Validate(args) => validate(args, config).await,
        Command::Parse(args) => parse(args, config).await,
        Command::Recall(args) => recall(args, config).await,
        Command::Remember(args) => remember(args, config).await,
        Command::Summarize(args) => summarize(args, config).await,
        Command::WorldModel(args) => world_model(args),
    }
}

async fn run(args: RunArgs, config: AppConfig) -> Result<Output, CliError> {
    let task = load_task(&args.input)?;
    let catalog = config.tool_catalog()?;
    let executor = PythonExecutor::from_settings(&config.executor);
    let (_, client) = connect(config)?;
    let pipeline = TaskPipeline::new(client, catalog, executor);

    let options = RunOptions {
        execute: args.execute,
        validate: args.validate,
    };
    let outcome = pipeline.run(&task, options).await?;
    let json = serde_json::to_value(&outcome).unwrap_or(Value::Null);
    Ok(Output::new(outcome.answer_text(), json))
}

fn prompt(input: TaskInput, config: AppConfig) -> Result<Output, CliError> {
    let task = load_task(&input)?;
    let catalog = config.tool_catalog()?;
    let assembler = PromptAssembler::new(catalog);
    let tool = select_tool(&task).map_err(PipelineError::from)?;
    let prompt = assembler.for_kind(tool).map_err(PipelineError::from)?;
    Ok(Output::new(
        prompt.clone(),
        json!({ "tool": tool, "prompt": prompt }),
    ))
}

fn tokens(text: &str, config: &AppConfig) -> Result<Output, CliError> {
    let counter =
        TokenCounter::for_encoding(&config.provider.encoding).map_err(PipelineError::from)?;
    let count = counter.count(text);
    let window = config.provider.context_window;
    Ok(Output::new(
        count.to_string(),
        json!({
            "encoding": counter.encoding(),
            "tokens": count,
            "context_window": window,
            "remaining": window.saturating_sub(count),
        }),
    ))
}

async fn validate(args: ValidateArgs, config: AppConfig) -> Result<Output, CliError> {
    let (_, client) = connect(config)?;
    let validator = ResponseValidator::new(client);
    let valid = validator
        .validate(&args.goal, &args.response)
        .await
        .map_err(PipelineError::from)?;
    Ok(Output::new(
        if valid { "yes" } else { "no" },
        json!({ "valid": valid }),
    ))
}

async fn parse(args: ParseArgs, config: AppConfig) -> Result<Output, CliError> {
    let content = match &args.file {
        Some(path) => read_file(path)?,
        None if !args.content.is_empty() => args.content.join(" "),
        None => return Err(CliError::Usage("nothing to parse".to_string())),
    };
    let (_, client) = connect(config)?;
    let parsed = ContentParser::new(client)
        .parse(&args.instruction, &content)
        .await
        .map_err(PipelineError::from)?;
    Ok(Output::new(parsed.clone(), json!({ "parsed": parsed })))
}

async fn recall(args: RecallArgs, config: AppConfig) -> Result<Output, CliError> {
    let query = args.query.join(" ");
    if query.trim().is_empty() {
        return Err(CliError::Usage("recall needs a query".to_string()));
    }
    let (context, knowledge) = knowledge_base(config)?;
    let top_k = args
        .top_k
        .or(context.config.vector_store.as_ref().map(|s| s.top_k))
        .unwrap_or(5);
    let results = knowledge
        .relevant(&query, top_k)
        .await
        .map_err(PipelineError::from)?;
    Ok(Output::new(results.join("\n"), json!({ "results": results })))
}

async fn remember(args: RememberArgs, config: AppConfig) -> Result<Output, CliError> {
    let id = args.id.unwrap_or_else(|| Uuid::new_v4().to_string());
    let (_, knowledge) = knowledge_base(config)?;
    knowledge
        .remember(&id, &args.task, &args.result)
        .await
        .map_err(PipelineError::from)?;
    info!(id = %id, "Stored task result");
    Ok(Output::new(id.clone(), json!({ "id": id })))
}

async fn summarize(args: SummarizeArgs, config: AppConfig) -> Result<Output, CliError> {
    let (_, client) = connect(config)?;
    let index = SummaryIndex::new(client);
    for path in &args.files {
        let text = read_file(path)?;
        let document = Document::new(path.display().to_string(), text);
        index.insert(document).await.map_err(PipelineError::from)?;
    }
    let question = args
        .question
        .unwrap_or_else(|| DEFAULT_SUMMARY_QUESTION.to_string());
    let answer = index
        .query(&question, args.mode)
        .await
        .map_err(PipelineError::from)?;
    Ok(Output::new(
        answer.clone(),
        json!({ "mode": args.mode, "question": question, "answer": answer }),
    ))
}

fn world_model(args: WorldModelArgs) -> Result<Output, CliError> {
    let model = WorldModel::initial();
    match args.path {
        None => {
            let text = model.to_pretty_json();
            let json = serde_json::from_str(&text).unwrap_or(Value::Null);
            Ok(Output::new(text, json))
        }
        Some(path) => {
            let keys: Vec<&str> = path.split('.').collect();
            let value = model
                .get(&keys)
                .cloned()
                .ok_or_else(|| CliError::Usage(format!("nothing at '{path}' in the world model")))?;
            let text = match &value {
                Value::String(text) => text.clone(),
                other => serde_json::to_string_pretty(other).unwrap_or_default(),
            };
            Ok(Output::new(text, value))
        }
    }
}

fn load_task(input: &TaskInput) -> Result<String, CliError> {
    let task = match &input.task_file {
        Some(path) => {
            info!(path = %path.display(), "Loading task from file");
            read_file(path)?
        }
        None => input.task.join(" "),
    };
    let task = task.trim().to_string();
    if task.is_empty() {
        return Err(CliError::Usage(
            "no task given; pass it as arguments or with --task-file".to_string(),
        ));
    }
    Ok(task)
}

fn read_file(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn task_arguments_are_joined_and_trimmed() {
        let input = TaskInput {
            task_file: None,
            task: vec!["MYGENE:".into(), "TP53 ".into()],
        };
        assert_eq!(load_task(&input).expect("task"), "MYGENE: TP53");
    }

    #[test]
    fn empty_task_is_a_usage_error() {
        let input = TaskInput {
            task_file: None,
            task: vec![],
        };
        assert!(matches!(load_task(&input), Err(CliError::Usage(_))));
    }

    #[test]
    fn task_file_is_read() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "PUBMED: aspirin trials").expect("write");
        let input = TaskInput {
            task_file: Some(file.path().to_path_buf()),
            task: vec!["ignored".into()],
        };
        assert_eq!(load_task(&input).expect("task"), "PUBMED: aspirin trials");
    }

    #[test]
    fn missing_task_file_names_the_path() {
        let input = TaskInput {
            task_file: Some(PathBuf::from("/nonexistent/task.txt")),
            task: vec![],
        };
        let err = load_task(&input).expect_err("missing");
        assert!(err.user_message().contains("/nonexistent/task.txt"));
    }

    #[test]
    fn prompt_works_without_credentials() {
        let input = TaskInput {
            task_file: None,
            task: vec!["PUBMED: breast cancer".into()],
        };
        let output = prompt(input, AppConfig::default()).expect("prompt");
        assert_eq!(output.json["tool"], "pubmed");
        assert!(output.text.starts_with("You have access to query the PubMed API."));
    }

    #[test]
    fn tokens_reports_remaining_window() {
        let output = tokens("hello world", &AppConfig::default()).expect("tokens");
        assert_eq!(output.json["tokens"], 2);
        assert_eq!(output.json["remaining"], 4095);
    }

    #[test]
    fn world_model_path_lookup() {
        let output = world_model(WorldModelArgs {
            path: Some("Geography.United States.largest state".into()),
        })
        .expect("lookup");
        assert_eq!(output.text, "Alaska");

        let err = world_model(WorldModelArgs {
            path: Some("Geography.Mars".into()),
        });
        assert!(matches!(err, Err(CliError::Usage(_))));
    }
}
