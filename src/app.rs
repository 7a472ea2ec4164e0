use std::time::Instant;

use log::debug;

use crate::config::Config;
use crate::session::batch::{BatchError, select_batch};
use crate::session::drill::{Control, Session};
use crate::session::input::InputEvent;
use crate::store::phrase_store::PhraseStore;
use crate::ui::theme::Theme;

pub struct App {
    pub session: Session,
    pub store: PhraseStore,
    pub theme: Theme,
    pub should_quit: bool,
}

impl App {
    /// Draw a batch and set up a session over it. Fails before any drawing
    /// happens when the bank is empty or storage is unusable.
    pub fn new(mut store: PhraseStore, config: &Config) -> Result<Self, BatchError> {
        let batch = select_batch(&mut store, config.batch_size)?;
        let theme = Theme::load(&config.theme).unwrap_or_default();
        debug!("using theme '{}'", theme.name);

        Ok(Self {
            session: Session::new(batch, config.splash_delay()),
            store,
            theme,
            should_quit: false,
        })
    }

    pub fn step(&mut self, inputs: &[InputEvent], now: Instant) {
        if self.session.step(inputs, now, &mut self.store) == Control::Quit {
            self.should_quit = true;
        }
    }
}
