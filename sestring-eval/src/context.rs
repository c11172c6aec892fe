//! Per-call evaluation state.
use chrono::{DateTime, Utc};

use crate::{language::ClientLanguage, params::LocalParameter};

/// State threaded through one evaluation.
///
/// `macro_time` is what time placeholders read and what `settime` and
/// `setresettime` overwrite. `now` is the clock reset times are computed
/// from. Both default to the current time.
#[derive(Debug, Clone)]
pub struct EvaluationContext {
    pub language: ClientLanguage,
    pub locals: Vec<LocalParameter>,
    pub macro_time: DateTime<Utc>,
    pub now: DateTime<Utc>,
    pub(crate) depth: usize,
}

impl EvaluationContext {
    pub fn new(language: ClientLanguage) -> Self {
        let now = Utc::now();
        Self {
            language,
            locals: Vec::new(),
            macro_time: now,
            now,
            depth: 0,
        }
    }

    pub fn with_locals(mut self, locals: impl IntoIterator<Item = LocalParameter>) -> Self {
        self.locals = locals.into_iter().collect();
        self
    }

    pub fn with_macro_time(mut self, time: DateTime<Utc>) -> Self {
        self.macro_time = time;
        self
    }

    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Local parameter at 0-based `index`.
    pub fn local(&self, index: usize) -> Option<&LocalParameter> {
        self.locals.get(index)
    }

    /// Current nesting depth of evaluation.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Default for EvaluationContext {
    fn default() -> Self {
        Self::new(ClientLanguage::default())
    }
}
