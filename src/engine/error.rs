use std::fmt;

/// Failures at the edges of the engine: loading pages, reading config,
/// parsing user input and talking to the assistant.
///
/// Problems inside a hint session (no candidates, a rejected key, a stale
/// target) are not errors. They come back as outcomes and the session
/// returns to idle.
#[derive(Debug)]
pub enum HintError {
    /// Page snapshot could not be read from disk
    SnapshotIo { path: String, source: std::io::Error },

    /// JSON parsing failed (page snapshot or assistant response)
    JsonParse { context: String, source: serde_json::Error },

    /// Config file exists but could not be read
    ConfigIo { path: String, source: std::io::Error },

    /// Config file is not valid YAML for `AppConfig`
    YamlParse { path: String, source: serde_yaml::Error },

    /// Label alphabet is unusable (too short, duplicates, not uppercase ASCII)
    InvalidAlphabet(String),

    /// Maximum label length must be at least one character
    InvalidLabelLength(usize),

    /// Regional menu keys collide
    InvalidMenuKeys(String),

    /// Mode name not recognised
    UnknownMode(String),

    /// Key script contains an unknown `<...>` token
    KeyParse(String),

    /// Assistant endpoint failed or returned garbage
    AssistantRequest(String),
}

impl fmt::Display for HintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HintError::SnapshotIo { path, source } => {
                write!(f, "Failed to read page snapshot '{}': {}", path, source)
            }
            HintError::JsonParse { context, source } => {
                write!(f, "JSON parse error ({}): {}", context, source)
            }
            HintError::ConfigIo { path, source } => {
                write!(f, "Failed to read config '{}': {}", path, source)
            }
            HintError::YamlParse { path, source } => {
                write!(f, "Invalid config '{}': {}", path, source)
            }
            HintError::InvalidAlphabet(msg) => {
                write!(f, "Invalid label alphabet: {}", msg)
            }
            HintError::InvalidLabelLength(len) => {
                write!(f, "Invalid max label length {} (must be >= 1)", len)
            }
            HintError::InvalidMenuKeys(msg) => {
                write!(f, "Invalid regional menu keys: {}", msg)
            }
            HintError::UnknownMode(name) => {
                write!(f, "Unknown hint mode '{}'", name)
            }
            HintError::KeyParse(token) => {
                write!(f, "Unknown key token '{}'", token)
            }
            HintError::AssistantRequest(msg) => {
                write!(f, "Assistant request failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for HintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HintError::SnapshotIo { source, .. } => Some(source),
            HintError::JsonParse { source, .. } => Some(source),
            HintError::ConfigIo { source, .. } => Some(source),
            HintError::YamlParse { source, .. } => Some(source),
            _ => None,
        }
    }
}
