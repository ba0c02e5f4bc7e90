use crate::engine::error::HintError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Escape,
    Backspace,
    Enter,
    Other(String),
}

/// One step of a replayed input script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(Key),
    /// The document lost focus.
    Blur,
}

/// Parse a key script such as `"ab<Esc>"`.
///
/// Plain characters are key presses; whitespace separates and is skipped.
/// Named tokens: `<Esc>`, `<BS>`, `<Enter>`, `<Space>`, `<Tab>`, `<lt>` (a
/// literal `<`) and `<Blur>`.
pub fn parse_key_script(script: &str) -> Result<Vec<InputEvent>, HintError> {
    let mut events = Vec::new();
    let mut chars = script.chars();

    while let Some(c) = chars.next() {
        if c.is_whitespace() {
            continue;
        }
        if c != '<' {
            events.push(InputEvent::Key(Key::Char(c)));
            continue;
        }

        let mut token = String::new();
        let mut closed = false;
        for t in chars.by_ref() {
            if t == '>' {
                closed = true;
                break;
            }
            token.push(t);
        }
        if !closed {
            return Err(HintError::KeyParse(format!("<{}", token)));
        }

        let event = match token.to_ascii_lowercase().as_str() {
            "esc" | "escape" => InputEvent::Key(Key::Escape),
            "bs" | "backspace" => InputEvent::Key(Key::Backspace),
            "enter" | "cr" => InputEvent::Key(Key::Enter),
            "space" => InputEvent::Key(Key::Char(' ')),
            "tab" => InputEvent::Key(Key::Other("Tab".into())),
            "lt" => InputEvent::Key(Key::Char('<')),
            "blur" => InputEvent::Blur,
            _ => return Err(HintError::KeyParse(format!("<{}>", token))),
        };
        events.push(event);
    }

    Ok(events)
}
