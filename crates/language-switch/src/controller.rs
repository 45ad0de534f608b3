//! Per-session language switch controller.
//!
//! A controller owns one conversation's [`SessionState`] together with the
//! speech handles attached to that conversation. Every switch runs under a
//! single lock so the check, the handle updates, the commit and the
//! announcement happen as one step even if tools are invoked concurrently.

use crate::{LanguageCode, LanguageRegistry, Result, SessionState};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};
use voice_local::{Recognizer, SpeechOutput, Synthesizer};

/// Whether the utterance that ends a switch reached the output channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum Announcement {
    Spoken,
    Failed(String),
}

impl Announcement {
    pub fn is_spoken(&self) -> bool {
        matches!(self, Announcement::Spoken)
    }
}

/// Result of a [`LanguageSwitchController::switch_to`] call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwitchOutcome {
    pub previous: LanguageCode,
    pub current: LanguageCode,
    pub changed: bool,
    pub announcement: Announcement,
}

struct SessionInner {
    state: SessionState,
    recognizer: Option<Box<dyn Recognizer + Send>>,
    synthesizer: Option<Box<dyn Synthesizer + Send>>,
    entered: bool,
}

pub struct LanguageSwitchController {
    registry: Arc<LanguageRegistry>,
    output: Arc<dyn SpeechOutput>,
    inner: Mutex<SessionInner>,
    language_tx: watch::Sender<LanguageCode>,
}

impl LanguageSwitchController {
    /// New session starting in `default_language`, with no speech handles attached.
    pub fn new(
        registry: Arc<LanguageRegistry>,
        output: Arc<dyn SpeechOutput>,
        default_language: LanguageCode,
    ) -> Self {
        let (language_tx, _) = watch::channel(default_language);
        Self {
            registry,
            output,
            inner: Mutex::new(SessionInner {
                state: SessionState::new(default_language),
                recognizer: None,
                synthesizer: None,
                entered: false,
            }),
            language_tx,
        }
    }

    pub fn with_recognizer(mut self, recognizer: Box<dyn Recognizer + Send>) -> Self {
        self.inner.get_mut().recognizer = Some(recognizer);
        self
    }

    pub fn with_synthesizer(mut self, synthesizer: Box<dyn Synthesizer + Send>) -> Self {
        self.inner.get_mut().synthesizer = Some(synthesizer);
        self
    }

    /// Attach a recognizer after the session has started.
    pub async fn attach_recognizer(&self, recognizer: Box<dyn Recognizer + Send>) {
        self.inner.lock().await.recognizer = Some(recognizer);
    }

    /// Attach a synthesizer after the session has started.
    pub async fn attach_synthesizer(&self, synthesizer: Box<dyn Synthesizer + Send>) {
        self.inner.lock().await.synthesizer = Some(synthesizer);
    }

    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    pub async fn current_language(&self) -> LanguageCode {
        self.inner.lock().await.state.current_language()
    }

    /// Watch the committed language. The value changes right after the state
    /// commit, before the greeting is spoken.
    pub fn subscribe_language(&self) -> watch::Receiver<LanguageCode> {
        self.language_tx.subscribe()
    }

    /// Snapshot of the session state.
    pub async fn state(&self) -> SessionState {
        self.inner.lock().await.state.clone()
    }

    /// Session entry hook. Speaks the capability announcement and returns how
    /// it went, or `None` once the announcement has been spoken. A failed
    /// announcement leaves the session unentered so the host may call again.
    pub async fn on_enter(&self) -> Option<Announcement> {
        let mut inner = self.inner.lock().await;
        if inner.entered {
            debug!(session_id = %inner.state.id(), "session already entered");
            return None;
        }
        info!(
            session_id = %inner.state.id(),
            language = %inner.state.current_language(),
            "session entered"
        );
        let announcement = self
            .announce(&self.registry.capability_announcement())
            .await;
        inner.entered = announcement.is_spoken();
        Some(announcement)
    }

    /// Parse a raw code and switch to it. Unknown codes fail without side effects.
    pub async fn switch_to_code(&self, code: &str) -> Result<SwitchOutcome> {
        let code: LanguageCode = code.parse()?;
        Ok(self.switch_to(code).await)
    }

    pub async fn switch_to(&self, code: LanguageCode) -> SwitchOutcome {
        let mut inner = self.inner.lock().await;
        let session_id = inner.state.id();
        let previous = inner.state.current_language();
        let profile = self.registry.profile_for(code);

        if !inner.entered {
            debug!(%session_id, "switch requested before the session was entered");
        }

        if code == previous {
            debug!(%session_id, language = %code, "language already active");
            let message = format!("I'm already speaking in {}.", profile.display_name);
            let announcement = self.announce(&message).await;
            return SwitchOutcome {
                previous,
                current: code,
                changed: false,
                announcement,
            };
        }

        match inner.recognizer.as_mut() {
            Some(recognizer) => {
                if let Err(e) = recognizer.set_language(&profile.recognizer_code) {
                    warn!(%session_id, error = %e, "recognizer rejected language update");
                }
            }
            None => debug!(%session_id, "no recognizer attached, skipping update"),
        }

        match inner.synthesizer.as_mut() {
            Some(synthesizer) => {
                if let Err(e) = synthesizer.set_language(&profile.synthesizer_code) {
                    warn!(%session_id, error = %e, "synthesizer rejected language update");
                }
            }
            None => debug!(%session_id, "no synthesizer attached, skipping update"),
        }

        inner.state.commit(code);
        self.language_tx.send_replace(code);
        info!(%session_id, from = %previous, to = %code, "language switched");

        let announcement = self.announce(&profile.greeting).await;
        SwitchOutcome {
            previous,
            current: code,
            changed: true,
            announcement,
        }
    }

    async fn announce(&self, text: &str) -> Announcement {
        match self.output.say(text).await {
            Ok(()) => Announcement::Spoken,
            Err(e) => {
                warn!(error = %e, "failed to speak announcement");
                Announcement::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SwitchError;
    use voice_local::{
        CallLog, MockOutput, MockRecognizer, MockSynthesizer, RecognizerConfig, SynthesizerConfig,
    };

    struct Harness {
        controller: LanguageSwitchController,
        output: Arc<MockOutput>,
        recognizer_calls: CallLog<String>,
        synthesizer_calls: CallLog<String>,
    }

    fn recognizer() -> MockRecognizer {
        MockRecognizer::new(RecognizerConfig {
            model: "nova-2-general".into(),
            language: "en".into(),
        })
    }

    fn synthesizer() -> MockSynthesizer {
        MockSynthesizer::new(SynthesizerConfig {
            model: "eleven_turbo_v2_5".into(),
            language: "en".into(),
            voice: None,
        })
    }

    fn harness() -> Harness {
        let output = Arc::new(MockOutput::new());
        let rec = recognizer();
        let syn = synthesizer();
        let recognizer_calls = rec.calls();
        let synthesizer_calls = syn.calls();
        let controller = LanguageSwitchController::new(
            Arc::new(LanguageRegistry::builtin()),
            output.clone(),
            LanguageCode::En,
        )
        .with_recognizer(Box::new(rec))
        .with_synthesizer(Box::new(syn));
        Harness {
            controller,
            output,
            recognizer_calls,
            synthesizer_calls,
        }
    }

    #[tokio::test]
    async fn test_session_start_announces_languages() {
        let h = harness();
        assert_eq!(h.controller.on_enter().await, Some(Announcement::Spoken));

        assert_eq!(
            h.output.texts(),
            vec![LanguageRegistry::builtin().capability_announcement()]
        );
        assert_eq!(h.controller.current_language().await, LanguageCode::En);
        assert!(h.recognizer_calls.is_empty());
    }

    #[tokio::test]
    async fn test_on_enter_runs_once() {
        let h = harness();
        assert!(h.controller.on_enter().await.is_some());
        assert_eq!(h.controller.on_enter().await, None);
        assert_eq!(h.output.texts().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_entry_announcement_is_not_fatal() {
        let controller = LanguageSwitchController::new(
            Arc::new(LanguageRegistry::builtin()),
            Arc::new(MockOutput::failing()),
            LanguageCode::En,
        );

        let first = controller.on_enter().await;
        assert!(matches!(first, Some(Announcement::Failed(_))));

        // Not marked entered, so the host can try again
        let second = controller.on_enter().await;
        assert!(matches!(second, Some(Announcement::Failed(_))));

        let outcome = controller.switch_to(LanguageCode::Es).await;
        assert!(outcome.changed);
        assert_eq!(controller.current_language().await, LanguageCode::Es);
    }

    #[tokio::test]
    async fn test_switch_before_entry_still_applies() {
        let h = harness();
        h.controller.switch_to(LanguageCode::It).await;
        assert_eq!(h.controller.on_enter().await, Some(Announcement::Spoken));

        assert_eq!(h.controller.current_language().await, LanguageCode::It);
        assert_eq!(
            h.output.texts().last().cloned(),
            Some(LanguageRegistry::builtin().capability_announcement())
        );
    }

    /// One log shared by a recognizer, a synthesizer and an output channel.
    #[derive(Clone, Default)]
    struct EventLog(Arc<std::sync::Mutex<Vec<String>>>);

    impl EventLog {
        fn push(&self, event: String) {
            self.0.lock().unwrap().push(event);
        }

        fn events(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    struct LoggingRecognizer {
        language: String,
        log: EventLog,
    }

    impl Recognizer for LoggingRecognizer {
        fn new(config: RecognizerConfig) -> Self {
            Self {
                language: config.language,
                log: EventLog::default(),
            }
        }

        fn language(&self) -> &str {
            &self.language
        }

        fn set_language(&mut self, code: &str) -> voice_local::Result<()> {
            self.log.push(format!("rec:{code}"));
            self.language = code.to_string();
            Ok(())
        }
    }

    struct LoggingSynthesizer {
        language: String,
        log: EventLog,
    }

    impl Synthesizer for LoggingSynthesizer {
        fn new(config: SynthesizerConfig) -> Self {
            Self {
                language: config.language,
                log: EventLog::default(),
            }
        }

        fn language(&self) -> &str {
            &self.language
        }

        fn set_language(&mut self, code: &str) -> voice_local::Result<()> {
            self.log.push(format!("syn:{code}"));
            self.language = code.to_string();
            Ok(())
        }
    }

    /// Records each utterance along with the committed language at that moment.
    struct LoggingOutput {
        log: EventLog,
        committed: std::sync::OnceLock<watch::Receiver<LanguageCode>>,
    }

    #[async_trait::async_trait]
    impl SpeechOutput for LoggingOutput {
        async fn say(&self, text: &str) -> voice_local::Result<()> {
            if let Some(rx) = self.committed.get() {
                self.log.push(format!("state:{}", *rx.borrow()));
            }
            self.log.push(format!("say:{text}"));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_switch_side_effects_are_ordered() {
        let log = EventLog::default();
        let output = Arc::new(LoggingOutput {
            log: log.clone(),
            committed: std::sync::OnceLock::new(),
        });
        let mut rec = LoggingRecognizer::new(RecognizerConfig {
            model: "nova-2-general".into(),
            language: "en".into(),
        });
        rec.log = log.clone();
        let mut syn = LoggingSynthesizer::new(SynthesizerConfig {
            model: "eleven_turbo_v2_5".into(),
            language: "en".into(),
            voice: None,
        });
        syn.log = log.clone();

        let controller = LanguageSwitchController::new(
            Arc::new(LanguageRegistry::builtin()),
            output.clone(),
            LanguageCode::En,
        )
        .with_recognizer(Box::new(rec))
        .with_synthesizer(Box::new(syn));
        assert!(output
            .committed
            .set(controller.subscribe_language())
            .is_ok());

        controller.switch_to(LanguageCode::Fr).await;

        assert_eq!(
            log.events(),
            vec![
                "rec:fr-CA".to_string(),
                "syn:fr".to_string(),
                "state:fr".to_string(),
                "say:Bonjour ! Je parle maintenant en français. Comment puis-je vous aider aujourd'hui ?"
                    .to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_subscribers_see_committed_language_only() {
        let h = harness();
        let rx = h.controller.subscribe_language();

        h.controller.switch_to(LanguageCode::En).await;
        assert!(!rx.has_changed().unwrap());

        h.controller.switch_to(LanguageCode::De).await;
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow(), LanguageCode::De);
    }

    #[tokio::test]
    async fn test_outcome_serializes_for_hosts() {
        let h = harness();
        let outcome = h.controller.switch_to(LanguageCode::Ta).await;

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["previous"], "en");
        assert_eq!(json["current"], "ta");
        assert_eq!(json["changed"], true);
        assert_eq!(json["announcement"]["status"], "spoken");

        let failed = serde_json::to_value(Announcement::Failed("down".into())).unwrap();
        assert_eq!(failed["status"], "failed");
        assert_eq!(failed["reason"], "down");
    }

    #[tokio::test]
    async fn test_switch_to_french() {
        let h = harness();
        let outcome = h.controller.switch_to(LanguageCode::Fr).await;

        assert_eq!(
            outcome,
            SwitchOutcome {
                previous: LanguageCode::En,
                current: LanguageCode::Fr,
                changed: true,
                announcement: Announcement::Spoken,
            }
        );
        assert_eq!(h.recognizer_calls.snapshot(), vec!["fr-CA".to_string()]);
        assert_eq!(h.synthesizer_calls.snapshot(), vec!["fr".to_string()]);
        assert_eq!(h.controller.current_language().await, LanguageCode::Fr);
        assert_eq!(
            h.output.texts(),
            vec!["Bonjour ! Je parle maintenant en français. Comment puis-je vous aider aujourd'hui ?"]
        );
    }

    #[tokio::test]
    async fn test_same_language_only_acknowledges() {
        let h = harness();
        h.controller.switch_to(LanguageCode::Fr).await;
        let outcome = h.controller.switch_to(LanguageCode::Fr).await;

        assert!(!outcome.changed);
        assert_eq!(outcome.current, LanguageCode::Fr);
        assert_eq!(h.recognizer_calls.len(), 1);
        assert_eq!(h.synthesizer_calls.len(), 1);
        assert_eq!(
            h.output.texts().last().map(String::as_str),
            Some("I'm already speaking in French.")
        );
        assert_eq!(h.controller.current_language().await, LanguageCode::Fr);
    }

    #[tokio::test]
    async fn test_default_language_self_switch() {
        let h = harness();
        let outcome = h.controller.switch_to(LanguageCode::En).await;

        assert!(!outcome.changed);
        assert!(h.recognizer_calls.is_empty());
        assert!(h.synthesizer_calls.is_empty());
        assert_eq!(h.output.texts(), vec!["I'm already speaking in English."]);
        assert!(h.controller.state().await.history().is_empty());
    }

    #[tokio::test]
    async fn test_spanish_twice_is_idempotent() {
        let h = harness();
        h.controller.switch_to(LanguageCode::Es).await;
        h.controller.switch_to(LanguageCode::Es).await;

        assert_eq!(h.controller.current_language().await, LanguageCode::Es);
        assert_eq!(
            h.output.texts(),
            vec![
                "¡Hola! Ahora estoy hablando en español. ¿Cómo puedo ayudarte hoy?",
                "I'm already speaking in Spanish.",
            ]
        );
        assert_eq!(h.controller.state().await.history().len(), 1);
    }

    #[tokio::test]
    async fn test_switch_to_tamil_keeps_script() {
        let h = harness();
        h.controller.switch_to(LanguageCode::Ta).await;

        assert_eq!(h.recognizer_calls.snapshot(), vec!["ta".to_string()]);
        assert_eq!(h.synthesizer_calls.snapshot(), vec!["ta".to_string()]);
        assert_eq!(h.controller.current_language().await, LanguageCode::Ta);
        assert_eq!(
            h.output.texts(),
            vec!["வணக்கம்! நான் இப்போது தமிழில் பேசுகிறேன். இன்று நான் உங்களுக்கு எவ்வாறு உதவ முடியும்?"]
        );
    }

    #[tokio::test]
    async fn test_missing_handles_are_skipped() {
        let output = Arc::new(MockOutput::new());
        let controller = LanguageSwitchController::new(
            Arc::new(LanguageRegistry::builtin()),
            output.clone(),
            LanguageCode::En,
        );

        let outcome = controller.switch_to(LanguageCode::De).await;

        assert!(outcome.changed);
        assert_eq!(controller.current_language().await, LanguageCode::De);
        assert_eq!(
            output.texts(),
            vec!["Hallo! Ich spreche jetzt Deutsch. Wie kann ich Ihnen heute helfen?"]
        );
    }

    #[tokio::test]
    async fn test_late_attached_synthesizer_is_used() {
        let output = Arc::new(MockOutput::new());
        let controller = LanguageSwitchController::new(
            Arc::new(LanguageRegistry::builtin()),
            output,
            LanguageCode::En,
        );
        let syn = synthesizer();
        let calls = syn.calls();

        controller.switch_to(LanguageCode::It).await;
        assert!(calls.is_empty());

        controller.attach_synthesizer(Box::new(syn)).await;
        controller.switch_to(LanguageCode::Es).await;
        assert_eq!(calls.snapshot(), vec!["es".to_string()]);
    }

    #[tokio::test]
    async fn test_rejected_recognizer_update_still_switches() {
        let output = Arc::new(MockOutput::new());
        let rec = recognizer().rejecting();
        let calls = rec.calls();
        let controller = LanguageSwitchController::new(
            Arc::new(LanguageRegistry::builtin()),
            output.clone(),
            LanguageCode::En,
        )
        .with_recognizer(Box::new(rec));

        let outcome = controller.switch_to(LanguageCode::It).await;

        assert!(outcome.changed);
        assert_eq!(calls.len(), 1);
        assert_eq!(controller.current_language().await, LanguageCode::It);
        assert_eq!(output.texts().len(), 1);
    }

    #[tokio::test]
    async fn test_output_failure_keeps_committed_state() {
        let controller = LanguageSwitchController::new(
            Arc::new(LanguageRegistry::builtin()),
            Arc::new(MockOutput::failing()),
            LanguageCode::En,
        );

        let outcome = controller.switch_to(LanguageCode::Fr).await;

        assert!(outcome.changed);
        assert!(matches!(outcome.announcement, Announcement::Failed(_)));
        assert_eq!(controller.current_language().await, LanguageCode::Fr);
    }

    #[tokio::test]
    async fn test_unknown_code_fails_fast() {
        let h = harness();
        match h.controller.switch_to_code("xx").await {
            Err(SwitchError::UnsupportedLanguage(code)) => assert_eq!(code, "xx"),
            other => panic!("expected UnsupportedLanguage, got {:?}", other),
        }
        assert!(h.output.texts().is_empty());
        assert!(h.recognizer_calls.is_empty());
        assert_eq!(h.controller.current_language().await, LanguageCode::En);
    }

    #[tokio::test]
    async fn test_switch_to_code_parses() {
        let h = harness();
        let outcome = h.controller.switch_to_code("de").await.unwrap();
        assert_eq!(outcome.current, LanguageCode::De);
        assert_eq!(h.recognizer_calls.snapshot(), vec!["de".to_string()]);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let a = harness();
        let b = harness();
        a.controller.switch_to(LanguageCode::Ta).await;

        assert_eq!(a.controller.current_language().await, LanguageCode::Ta);
        assert_eq!(b.controller.current_language().await, LanguageCode::En);
        assert!(b.output.texts().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_switches_are_serialized() {
        let h = harness();
        let controller = Arc::new(h.controller);

        let mut tasks = Vec::new();
        for _ in 0..4 {
            let c = controller.clone();
            tasks.push(tokio::spawn(async move { c.switch_to(LanguageCode::Es).await }));
        }
        let mut changed = 0;
        for task in tasks {
            if task.await.unwrap().changed {
                changed += 1;
            }
        }

        assert_eq!(changed, 1);
        assert_eq!(h.recognizer_calls.len(), 1);
        assert_eq!(h.output.texts().len(), 4);
    }
}
