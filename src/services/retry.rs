// src/services/retry.rs
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use log::warn;

use crate::errors::StylistError;

/// Message fragments (lowercase) that mark a provider failure as transient.
pub const RETRYABLE_KEYWORDS: [&str; 7] = [
    "503",
    "service unavailable",
    "model is overloaded",
    "model_is_overloaded",
    "resource has been exhausted",
    "rate limit",
    "try again",
];

pub trait RetryClassifier: Send + Sync {
    fn is_retryable(&self, error: &StylistError) -> bool;
}

/// Classifies by case-insensitive substring match on the error message.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    keywords: Vec<String>,
}

impl KeywordClassifier {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
        }
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new(RETRYABLE_KEYWORDS)
    }
}

impl RetryClassifier for KeywordClassifier {
    fn is_retryable(&self, error: &StylistError) -> bool {
        let message = error.to_string().to_lowercase();
        self.keywords.iter().any(|k| message.contains(k.as_str()))
    }
}

#[derive(Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub backoff_factor: u32,
    classifier: Arc<dyn RetryClassifier>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(2000),
            backoff_factor: 2,
            classifier: Arc::new(KeywordClassifier::default()),
        }
    }
}

impl RetryPolicy {
    pub fn with_classifier(mut self, classifier: impl RetryClassifier + 'static) -> Self {
        self.classifier = Arc::new(classifier);
        self
    }

    pub fn is_retryable(&self, error: &StylistError) -> bool {
        !matches!(error, StylistError::Validation(_)) && self.classifier.is_retryable(error)
    }

    /// Runs `op` until it succeeds, fails with a non-retryable error, or the
    /// attempt ceiling is reached.
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T, StylistError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, StylistError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut delay = self.initial_delay;
        let mut attempt = 1;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if !self.is_retryable(&err) => return Err(err),
                Err(err) if attempt >= max_attempts => {
                    warn!("{label}: giving up after {attempt} attempts: {err}");
                    return Err(StylistError::ExhaustedRetries {
                        attempts: attempt,
                        last: Box::new(err),
                    });
                }
                Err(err) => {
                    warn!(
                        "{label}: attempt {attempt}/{max_attempts} failed ({err}), retrying in {}ms",
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    delay *= self.backoff_factor;
                    attempt += 1;
                }
            }
        }
    }
}
