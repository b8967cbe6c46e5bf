pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com";
pub const DEFAULT_COMPLETION_MODEL: &str = "text-davinci-003";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";
pub const DEFAULT_ENCODING: &str = "gpt2";
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_ORGANIZATION_ENV: &str = "OPENAI_ORG";

pub const DEFAULT_MAX_ATTEMPTS: usize = 6;
pub const DEFAULT_BASE_DELAY_MS: u64 = 1_000;

pub const DEFAULT_INTERPRETER: &str = "python3";
pub const DEFAULT_EXECUTION_TIMEOUT_SECS: u64 = 120;

pub const DEFAULT_VECTOR_API_KEY_ENV: &str = "PINECONE_API_KEY";
pub const DEFAULT_TOP_K: usize = 5;
