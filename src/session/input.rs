use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Discrete input delivered to the drill session, independent of the
/// terminal backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// Window/terminal close or Ctrl-C.
    Quit,
    Escape,
    Up,
    Down,
    Right,
    Char(char),
    /// Any other key press. Still counts as "any key" on the start screen.
    Other,
}

impl InputEvent {
    /// Quit signal, Escape or `q` end the session from every state.
    pub fn is_interrupt(self) -> bool {
        matches!(
            self,
            InputEvent::Quit | InputEvent::Escape | InputEvent::Char('q') | InputEvent::Char('Q')
        )
    }

    pub fn from_key(key: KeyEvent) -> Option<Self> {
        // Only presses; repeats and releases would double-score an answer
        if key.kind != KeyEventKind::Press {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(InputEvent::Quit);
        }
        let event = match key.code {
            KeyCode::Esc => InputEvent::Escape,
            KeyCode::Up => InputEvent::Up,
            KeyCode::Down => InputEvent::Down,
            KeyCode::Right => InputEvent::Right,
            KeyCode::Char(ch) => InputEvent::Char(ch),
            _ => InputEvent::Other,
        };
        Some(event)
    }
}
