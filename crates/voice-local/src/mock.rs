use crate::{
    Recognizer, RecognizerConfig, Result, SpeechOutput, Synthesizer, SynthesizerConfig, Utterance,
    VoiceError,
};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use time::OffsetDateTime;

/// Shared, cloneable record of the calls a mock received.
///
/// Clone it out of a mock before handing the mock to its owner; all clones
/// observe the same entries.
#[derive(Debug, Clone)]
pub struct CallLog<T> {
    entries: Arc<Mutex<Vec<T>>>,
}

impl<T> Default for CallLog<T> {
    fn default() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<T: Clone> CallLog<T> {
    fn push(&self, entry: T) {
        match self.entries.lock() {
            Ok(mut entries) => entries.push(entry),
            Err(poisoned) => poisoned.into_inner().push(entry),
        }
    }

    pub fn snapshot(&self) -> Vec<T> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct MockRecognizer {
    cfg: RecognizerConfig,
    calls: CallLog<String>,
    reject_updates: bool,
}

impl MockRecognizer {
    /// Log of every language code passed to `set_language`, accepted or not.
    pub fn calls(&self) -> CallLog<String> {
        self.calls.clone()
    }

    /// Make every `set_language` call fail after being logged.
    pub fn rejecting(mut self) -> Self {
        self.reject_updates = true;
        self
    }
}

impl Recognizer for MockRecognizer {
    fn new(config: RecognizerConfig) -> Self
    where
        Self: Sized,
    {
        Self {
            cfg: config,
            calls: CallLog::default(),
            reject_updates: false,
        }
    }

    fn language(&self) -> &str {
        &self.cfg.language
    }

    fn set_language(&mut self, code: &str) -> Result<()> {
        self.calls.push(code.to_string());
        if self.reject_updates {
            return Err(VoiceError::Backend(format!(
                "mock recognizer rejected language {code}"
            )));
        }
        self.cfg.language = code.to_string();
        Ok(())
    }
}

pub struct MockSynthesizer {
    cfg: SynthesizerConfig,
    calls: CallLog<String>,
}

impl MockSynthesizer {
    pub fn calls(&self) -> CallLog<String> {
        self.calls.clone()
    }
}

impl Synthesizer for MockSynthesizer {
    fn new(config: SynthesizerConfig) -> Self
    where
        Self: Sized,
    {
        Self {
            cfg: config,
            calls: CallLog::default(),
        }
    }

    fn language(&self) -> &str {
        &self.cfg.language
    }

    fn set_language(&mut self, code: &str) -> Result<()> {
        self.calls.push(code.to_string());
        self.cfg.language = code.to_string();
        Ok(())
    }
}

/// Output channel that records utterances instead of speaking them.
#[derive(Default)]
pub struct MockOutput {
    spoken: CallLog<Utterance>,
    fail: bool,
}

impl MockOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// An output channel whose every `say` fails without recording.
    pub fn failing() -> Self {
        Self {
            spoken: CallLog::default(),
            fail: true,
        }
    }

    pub fn spoken(&self) -> CallLog<Utterance> {
        self.spoken.clone()
    }

    /// Texts spoken so far, oldest first.
    pub fn texts(&self) -> Vec<String> {
        self.spoken.snapshot().into_iter().map(|u| u.text).collect()
    }
}

#[async_trait]
impl SpeechOutput for MockOutput {
    async fn say(&self, text: &str) -> Result<()> {
        if self.fail {
            return Err(VoiceError::Output("mock output channel is down".into()));
        }
        self.spoken.push(Utterance {
            text: text.to_string(),
            ts: Some(OffsetDateTime::now_utc()),
        });
        Ok(())
    }
}
