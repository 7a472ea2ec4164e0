use std::time::{Duration, Instant};

use log::{debug, error, info};

use crate::session::input::InputEvent;
use crate::session::view::{self, END_PROMPT, START_PROMPT, Scheme, ViewModel};
use crate::store::phrase_store::ResponseSink;
use crate::store::schema::{BatchId, Phrase, ResponseStatus, SampledBatch};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    BatchStart,
    PresentWord,
    AcceptInput,
    CorrectGuess,
    IncorrectGuess,
    SkipWord,
    DisplayWait,
    BatchEnd,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// One-shot deadline checked on every step. Firing disarms it.
#[derive(Clone, Copy, Debug)]
struct SplashTimer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl SplashTimer {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// A single drill round over a fixed, ordered batch of phrases.
pub struct Session {
    batch_id: BatchId,
    phrases: Vec<Phrase>,
    /// Number of phrases presented so far; the current phrase is `index - 1`.
    index: usize,
    score: usize,
    attempts: usize,
    state: SessionState,
    presented_at: Option<Instant>,
    splash: SplashTimer,
    view: ViewModel,
}

impl Session {
    pub fn new(batch: SampledBatch, splash_delay: Duration) -> Self {
        let total = batch.phrases.len();
        Self {
            batch_id: batch.batch_id,
            phrases: batch.phrases,
            index: 0,
            score: 0,
            attempts: 0,
            state: SessionState::BatchStart,
            presented_at: None,
            splash: SplashTimer::new(splash_delay),
            view: ViewModel::new(
                Scheme::Neutral,
                "",
                Some(START_PROMPT.to_string()),
                0,
                0,
                0,
                total,
            ),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn batch_id(&self) -> BatchId {
        self.batch_id
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn presented(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn current_phrase(&self) -> Option<&Phrase> {
        self.index.checked_sub(1).and_then(|i| self.phrases.get(i))
    }

    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    /// Advance by at most one transition group.
    ///
    /// `events` are the inputs that arrived since the previous step, in
    /// arrival order. An interrupt anywhere in the slice ends the session
    /// before anything else is considered. Events left over after a
    /// transition are discarded, so keys pressed during a splash never carry
    /// over to the next phrase.
    pub fn step<S>(&mut self, events: &[InputEvent], now: Instant, sink: &mut S) -> Control
    where
        S: ResponseSink + ?Sized,
    {
        if let Some(event) = events.iter().find(|e| e.is_interrupt()) {
            info!(
                "{event:?} in {:?}; ending batch {} at {} of {}",
                self.state,
                self.batch_id,
                self.index,
                self.phrases.len()
            );
            return Control::Quit;
        }

        match self.state {
            SessionState::BatchStart => {
                if !events.is_empty() {
                    self.enter(SessionState::PresentWord, now, sink);
                }
            }
            SessionState::AcceptInput => {
                let answer = events.iter().find_map(|event| match event {
                    InputEvent::Up => Some(SessionState::CorrectGuess),
                    InputEvent::Down => Some(SessionState::IncorrectGuess),
                    InputEvent::Right => Some(SessionState::SkipWord),
                    _ => None,
                });
                if let Some(next) = answer {
                    self.enter(next, now, sink);
                }
            }
            SessionState::DisplayWait => {
                if self.splash.fire(now) {
                    debug!("splash timer lapsed");
                    if self.index >= self.phrases.len() {
                        self.enter(SessionState::BatchEnd, now, sink);
                    } else {
                        self.enter(SessionState::PresentWord, now, sink);
                    }
                }
            }
            SessionState::BatchEnd => {}
            // Entry-only states hand off before `enter` returns
            SessionState::PresentWord
            | SessionState::CorrectGuess
            | SessionState::IncorrectGuess
            | SessionState::SkipWord => {}
        }

        Control::Continue
    }

    fn enter<S>(&mut self, state: SessionState, now: Instant, sink: &mut S)
    where
        S: ResponseSink + ?Sized,
    {
        let mut next = Some(state);
        while let Some(state) = next {
            debug!("setting state to {state:?}");
            self.state = state;
            next = self.on_entry(state, now, sink);
        }
    }

    fn on_entry<S>(&mut self, state: SessionState, now: Instant, sink: &mut S) -> Option<SessionState>
    where
        S: ResponseSink + ?Sized,
    {
        match state {
            SessionState::PresentWord => {
                let Some(phrase) = self.phrases.get(self.index) else {
                    return Some(SessionState::BatchEnd);
                };
                let text = phrase.text.clone();
                self.index += 1;
                debug!("presenting '{text}' ({} of {})", self.index, self.phrases.len());
                self.view = self.view_with(Scheme::Neutral, &text, None);
                self.presented_at = Some(now);
                Some(SessionState::AcceptInput)
            }
            SessionState::BatchStart | SessionState::AcceptInput | SessionState::DisplayWait => None,
            SessionState::CorrectGuess => {
                self.score_answer(ResponseStatus::Correct, now, sink);
                Some(SessionState::DisplayWait)
            }
            SessionState::IncorrectGuess => {
                self.score_answer(ResponseStatus::Incorrect, now, sink);
                Some(SessionState::DisplayWait)
            }
            SessionState::SkipWord => {
                self.view = self.view_with(Scheme::Neutral, "", None);
                self.splash.arm(now);
                Some(SessionState::DisplayWait)
            }
            SessionState::BatchEnd => {
                info!(
                    "batch {} complete: {} of {} correct",
                    self.batch_id, self.score, self.attempts
                );
                self.view = self.view_with(Scheme::Neutral, "", Some(END_PROMPT.to_string()));
                None
            }
        }
    }

    fn score_answer<S>(&mut self, status: ResponseStatus, now: Instant, sink: &mut S)
    where
        S: ResponseSink + ?Sized,
    {
        let elapsed_ms = self
            .presented_at
            .map_or(0, |at| now.saturating_duration_since(at).as_millis() as u64);
        if status == ResponseStatus::Correct {
            self.score += 1;
        }
        self.attempts += 1;

        let Some(phrase) = self.current_phrase().cloned() else {
            return;
        };
        let scheme = match status {
            ResponseStatus::Correct => Scheme::Correct,
            ResponseStatus::Incorrect => Scheme::Incorrect,
        };
        debug!("'{}' answered {status} in {elapsed_ms} ms", phrase.text);
        self.view = self.view_with(scheme, &phrase.text, Some(view::answer_time_caption(elapsed_ms)));

        // A lost record costs one history row, never the session
        if let Err(e) = sink.record_response(self.batch_id, phrase.id, elapsed_ms, status) {
            error!("could not log result for '{}': {e}", phrase.text);
        }

        self.splash.arm(now);
    }

    fn view_with(&self, scheme: Scheme, main_text: &str, caption: Option<String>) -> ViewModel {
        ViewModel::new(
            scheme,
            main_text,
            caption,
            self.score,
            self.attempts,
            self.index,
            self.phrases.len(),
        )
    }
}
