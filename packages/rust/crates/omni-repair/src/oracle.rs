//! Suggestion oracle contract.
//!
//! The oracle is the external text generator consulted for file lists,
//! element listings and SEARCH/REPLACE suggestions. Only the contract lives
//! here; network clients implement [`Oracle`] elsewhere.

use std::collections::VecDeque;
use std::sync::Mutex;

use serde::Serialize;
use thiserror::Error;

/// Optional sampling parameters for one oracle call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SamplingParams {
    /// Sampling temperature.
    pub temperature: Option<f32>,
    /// Upper bound on response size.
    pub max_tokens: Option<u32>,
}

/// Oracle call failures.
#[derive(Error, Debug)]
pub enum OracleError {
    /// A scripted oracle ran out of responses.
    #[error("No scripted response left")]
    Exhausted,

    /// The backend reported a failure.
    #[error("Oracle call failed: {0}")]
    Failed(String),
}

/// Prompt in, free-form text out.
///
/// Implementations must be `Send + Sync`: repair samples are requested in
/// parallel.
pub trait Oracle: Send + Sync {
    /// Complete `prompt`.
    ///
    /// # Errors
    /// Any backend failure.
    fn complete(&self, prompt: &str, params: &SamplingParams) -> Result<String, OracleError>;
}

/// Oracle answering from a queue of canned responses, recording every prompt.
///
/// Used by tests and for offline replays of recorded sessions.
#[derive(Debug, Default)]
pub struct ScriptedOracle {
    responses: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedOracle {
    /// Oracle that answers with `responses`, in order.
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Queue one more response.
    pub fn push(&self, response: impl Into<String>) {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(response.into());
        }
    }

    /// Prompts received so far.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }

    /// Responses not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.responses.lock().map(|q| q.len()).unwrap_or(0)
    }
}

impl Oracle for ScriptedOracle {
    fn complete(&self, prompt: &str, params: &SamplingParams) -> Result<String, OracleError> {
        tracing::debug!(
            prompt_chars = prompt.len(),
            temperature = ?params.temperature,
            "scripted oracle call"
        );
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        self.responses
            .lock()
            .map_err(|e| OracleError::Failed(e.to_string()))?
            .pop_front()
            .ok_or(OracleError::Exhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_order_and_exhaustion() {
        let oracle = ScriptedOracle::new(["one", "two"]);
        let params = SamplingParams::default();
        assert_eq!(oracle.complete("a", &params).unwrap(), "one");
        oracle.push("three");
        assert_eq!(oracle.complete("b", &params).unwrap(), "two");
        assert_eq!(oracle.complete("c", &params).unwrap(), "three");
        assert!(matches!(
            oracle.complete("d", &params),
            Err(OracleError::Exhausted)
        ));
        assert_eq!(oracle.prompts(), vec!["a", "b", "c", "d"]);
    }
}
