//! Model clients

mod openai;

pub use openai::OpenAIClient;
