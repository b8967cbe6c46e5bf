//! Prompt token accounting.
//!
//! Output length of a text completion is whatever the context window has
//! left after the prompt. A prompt that leaves nothing is rejected before
//! any request is built.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tiktoken_rs::CoreBPE;

#[derive(Debug, Error)]
pub enum TokenizerError {
    #[error("unknown tokenizer encoding '{name}'")]
    UnknownEncoding { name: String },
    #[error("failed to load tokenizer encoding '{name}': {reason}")]
    Load { name: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("prompt uses {tokens} tokens but the context window is {limit}")]
pub struct PromptTooLong {
    pub tokens: usize,
    pub limit: usize,
}

/// Counts tokens with a fixed BPE encoding.
#[derive(Clone)]
pub struct TokenCounter {
    encoding: String,
    bpe: Arc<CoreBPE>,
}

impl TokenCounter {
    /// `gpt2` is served by `r50k_base`, which shares its vocabulary.
    pub fn for_encoding(name: &str) -> Result<Self, TokenizerError> {
        let normalized = name.trim().to_ascii_lowercase();
        let loaded = match normalized.as_str() {
            "gpt2" | "r50k_base" => tiktoken_rs::r50k_base(),
            "p50k_base" => tiktoken_rs::p50k_base(),
            "cl100k_base" => tiktoken_rs::cl100k_base(),
            "o200k_base" => tiktoken_rs::o200k_base(),
            _ => {
                return Err(TokenizerError::UnknownEncoding {
                    name: name.to_string(),
                });
            }
        };
        let bpe = loaded.map_err(|err| TokenizerError::Load {
            name: name.to_string(),
            reason: err.to_string(),
        })?;
        Ok(Self {
            encoding: normalized,
            bpe: Arc::new(bpe),
        })
    }

    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }
}

impl fmt::Debug for TokenCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCounter")
            .field("encoding", &self.encoding)
            .finish()
    }
}

/// Context window paired with the counter used to fill it.
#[derive(Debug, Clone)]
pub struct TokenBudget {
    counter: TokenCounter,
    window: usize,
}

impl TokenBudget {
    pub fn new(counter: TokenCounter, window: usize) -> Self {
        Self { counter, window }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn counter(&self) -> &TokenCounter {
        &self.counter
    }

    /// Tokens left for the completion, never zero.
    pub fn remaining(&self, prompt: &str) -> Result<usize, PromptTooLong> {
        let tokens = self.counter.count(prompt);
        self.remaining_after(tokens)
    }

    pub fn remaining_after(&self, tokens: usize) -> Result<usize, PromptTooLong> {
        match self.window.checked_sub(tokens) {
            Some(left) if left > 0 => Ok(left),
            _ => Err(PromptTooLong {
                tokens,
                limit: self.window,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gpt2() -> TokenCounter {
        TokenCounter::for_encoding("gpt2").expect("gpt2 encoding")
    }

    #[test]
    fn counts_simple_phrase() {
        assert_eq!(gpt2().count("hello world"), 2);
        assert_eq!(gpt2().count(""), 0);
    }

    #[test]
    fn unknown_encoding_is_rejected() {
        let err = TokenCounter::for_encoding("klingon").expect_err("unknown");
        assert!(matches!(err, TokenizerError::UnknownEncoding { .. }));
    }

    #[test]
    fn remaining_subtracts_prompt_tokens() {
        let budget = TokenBudget::new(gpt2(), 4097);
        assert_eq!(budget.remaining("hello world"), Ok(4095));
    }

    #[test]
    fn exhausted_window_is_an_error() {
        let budget = TokenBudget::new(gpt2(), 2);
        assert_eq!(
            budget.remaining("hello world"),
            Err(PromptTooLong {
                tokens: 2,
                limit: 2
            })
        );
        assert_eq!(
            budget.remaining_after(10),
            Err(PromptTooLong {
                tokens: 10,
                limit: 2
            })
        );
    }
}
