//! Accumulated domain knowledge.
//!
//! The model is seeded once and only read. Folding task results back into it
//! is a possible extension and is not performed anywhere.

use serde_json::{Map, Value, json};

#[derive(Debug, Clone, PartialEq)]
pub struct WorldModel {
    root: Map<String, Value>,
}

impl WorldModel {
    /// Seed model with a single illustrative entry.
    pub fn initial() -> Self {
        let seed = json!({
            "Geography": {
                "United States": {
                    "number of states": 50,
                    "largest state": "Alaska"
                }
            }
        });
        match seed {
            Value::Object(root) => Self { root },
            _ => Self { root: Map::new() },
        }
    }

    /// Look up a nested entry by its key path.
    pub fn get(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.root.get(*first)?;
        for key in rest {
            current = current.as_object()?.get(*key)?;
        }
        Some(current)
    }

    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.root.keys().map(String::as_str)
    }

    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.root).unwrap_or_default()
    }
}

impl Default for WorldModel {
    fn default() -> Self {
        Self::initial()
    }
}
