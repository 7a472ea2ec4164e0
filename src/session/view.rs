/// Color pair selector; the theme resolves it to concrete colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scheme {
    Neutral,
    Correct,
    Incorrect,
}

pub const QUIT_HINT: &str = "Esc: Quit";
pub const ANSWER_HINTS: [&str; 3] = ["Up: Correct", "Down: Incorrect", "Right: Skip word"];

pub const START_PROMPT: &str = "Press any key to begin";
pub const END_PROMPT: &str = "Round complete. Press Q or Esc to quit";

/// Everything the presentation layer needs to draw one screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewModel {
    pub scheme: Scheme,
    pub main_text: String,
    pub caption: Option<String>,
    pub score_text: String,
    pub progress_text: String,
    pub quit_hint: &'static str,
    pub answer_hints: &'static [&'static str],
}

/// Percentage of scored answers that were correct, rounded to the nearest
/// whole percent. Zero attempts reads as 0%.
pub fn score_percentage(score: usize, attempts: usize) -> u32 {
    (score as f64 / attempts.max(1) as f64 * 100.0).round() as u32
}

pub fn answer_time_caption(elapsed_ms: u64) -> String {
    format!("Answer time: {elapsed_ms} ms")
}

impl ViewModel {
    pub fn new(
        scheme: Scheme,
        main_text: &str,
        caption: Option<String>,
        score: usize,
        attempts: usize,
        position: usize,
        total: usize,
    ) -> Self {
        Self {
            scheme,
            main_text: main_text.to_string(),
            caption,
            score_text: format!("Score: {score} ({}%)", score_percentage(score, attempts)),
            progress_text: format!("Word: {position} of {total}"),
            quit_hint: QUIT_HINT,
            answer_hints: &ANSWER_HINTS,
        }
    }
}
