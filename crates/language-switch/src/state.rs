use crate::LanguageCode;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

/// A committed language change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub from: LanguageCode,
    pub to: LanguageCode,
    #[serde(with = "time::serde::rfc3339")]
    pub at: OffsetDateTime,
}

/// Per-conversation language state.
#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    started_at: OffsetDateTime,
    current_language: LanguageCode,
    history: Vec<Transition>,
}

impl SessionState {
    pub fn new(default_language: LanguageCode) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: OffsetDateTime::now_utc(),
            current_language: default_language,
            history: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> OffsetDateTime {
        self.started_at
    }

    pub fn current_language(&self) -> LanguageCode {
        self.current_language
    }

    /// Committed transitions, oldest first. Self transitions never appear.
    pub fn history(&self) -> &[Transition] {
        &self.history
    }

    pub(crate) fn commit(&mut self, to: LanguageCode) {
        if to == self.current_language {
            return;
        }
        self.history.push(Transition {
            from: self.current_language,
            to,
            at: OffsetDateTime::now_utc(),
        });
        self.current_language = to;
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(LanguageCode::default())
    }
}
