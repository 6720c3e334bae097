//! Scripted provider fakes for service tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use inner_map_core::{Pattern, PatternIcon, Transcript};
use inner_map_llm::{
    GeneratedImage, ImageProvider, InsightProvider, LlmError, QuestionProvider, SynthesizedInsight,
};
use inner_map_storage::{KeyValueStore, MemoryStore, SessionStore};

use crate::{InsightSynthesizer, JournalService};

pub fn provider_down() -> LlmError {
    LlmError::HttpStatus { code: 503, body: "unavailable".to_owned() }
}

/// Asks "Question N?" unless a scripted result is queued.
#[derive(Default)]
pub struct FakeAsker {
    script: Mutex<VecDeque<Result<String, LlmError>>>,
    calls: AtomicUsize,
    contexts: Mutex<Vec<usize>>,
}

impl FakeAsker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scripted(script: Vec<Result<String, LlmError>>) -> Self {
        Self { script: Mutex::new(script.into()), ..Self::default() }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Transcript length seen by each `next_question` call.
    pub fn contexts(&self) -> Vec<usize> {
        self.contexts.lock().unwrap().clone()
    }

    fn respond(&self) -> Result<String, LlmError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        self.script.lock().unwrap().pop_front().unwrap_or_else(|| Ok(format!("Question {n}?")))
    }
}

#[async_trait]
impl QuestionProvider for FakeAsker {
    async fn start_conversation(&self) -> Result<String, LlmError> {
        self.respond()
    }

    async fn next_question(&self, transcript: &Transcript) -> Result<String, LlmError> {
        self.contexts.lock().unwrap().push(transcript.len());
        self.respond()
    }
}

pub fn insight(is_milestone: bool) -> SynthesizedInsight {
    let pattern = |icon_kind, title: &str| Pattern {
        icon_kind,
        title: title.to_owned(),
        description: format!("{title} shows up often."),
    };
    SynthesizedInsight {
        reflection: "You steady others before yourself.".to_owned(),
        poem: "Still water\nholds the sky.".to_owned(),
        patterns: [
            pattern(PatternIcon::Anchor, "Steadiness"),
            pattern(PatternIcon::Heart, "Care"),
            pattern(PatternIcon::Path, "Searching"),
        ],
        symbolic_map_title: "The Quiet Harbor".to_owned(),
        symbolic_map_description: "Boats resting after a long voyage.".to_owned(),
        image_prompt: "a lighthouse at dusk".to_owned(),
        is_milestone,
        milestone_reason: is_milestone.then(|| "A new openness.".to_owned()),
    }
}

/// Returns queued results in order, then non-milestone insights.
#[derive(Default)]
pub struct FakeInsights {
    script: Mutex<VecDeque<Result<SynthesizedInsight, LlmError>>>,
    calls: AtomicUsize,
    answers: Mutex<Vec<String>>,
}

impl FakeInsights {
    pub fn new(script: Vec<Result<SynthesizedInsight, LlmError>>) -> Self {
        Self { script: Mutex::new(script.into()), ..Self::default() }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_answers(&self) -> Option<String> {
        self.answers.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl InsightProvider for FakeInsights {
    async fn synthesize(&self, answers: &str) -> Result<SynthesizedInsight, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answers.lock().unwrap().push(answers.to_owned());
        self.script.lock().unwrap().pop_front().unwrap_or_else(|| Ok(insight(false)))
    }
}

#[derive(Default)]
pub struct FakeImages {
    fail: bool,
    prompts: Mutex<Vec<String>>,
}

impl FakeImages {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageProvider for FakeImages {
    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_owned());
        if self.fail {
            return Err(provider_down());
        }
        Ok(GeneratedImage { bytes: vec![0x89, b'P', b'N', b'G'], mime_type: "image/png".to_owned() })
    }
}

/// Journal over a fresh in-memory store; the store is returned for direct
/// inspection.
pub fn memory_journal() -> (JournalService, Arc<SessionStore>) {
    let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let store = Arc::new(SessionStore::new(kv));
    (JournalService::new(Arc::clone(&store)), store)
}

pub fn synthesizer(insights: &Arc<FakeInsights>, images: &Arc<FakeImages>) -> InsightSynthesizer {
    InsightSynthesizer::new(insights.clone(), images.clone())
}
