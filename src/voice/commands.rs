//! Voice command classification
//!
//! Turns a finalized transcription into at most one command. Matching is
//! substring containment against the normalized utterance, so conversational
//! padding ("please start streaming now") still resolves.

use std::sync::LazyLock;

use regex::Regex;

/// Utterances shorter than this are treated as noise
pub const MIN_COMMAND_LEN: usize = 3;

/// Markdown emphasis markers and decorative glyphs stripped before speech
static SPEECH_MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[*#`\u{1F4A1}]").expect("valid speech markup pattern"));

/// The closed set of recognized voice commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceCommand {
    /// Turn on continuous capture
    StartStreaming,
    /// Turn off continuous capture
    StopStreaming,
    /// Ask the backend for a hint
    Hint,
}

impl VoiceCommand {
    /// Resolve a normalized utterance to a command
    ///
    /// Priority matters: "stop streaming" must be checked before the hint
    /// keywords so an ambiguous phrase never misfires as a hint request.
    fn resolve(normalized: &str) -> Option<Self> {
        if normalized.contains("start streaming") {
            Some(Self::StartStreaming)
        } else if normalized.contains("stop streaming") {
            Some(Self::StopStreaming)
        } else if normalized.contains("give hint")
            || normalized.contains("hint")
            || normalized.contains("help")
        {
            Some(Self::Hint)
        } else {
            None
        }
    }
}

/// Classify a raw transcription into a command
///
/// Applies the noise filter: lowercase + trim, drop utterances under
/// [`MIN_COMMAND_LEN`] characters, drop anything with no command phrase.
/// Returns the command together with the normalized text (the hint path
/// forwards it to the backend verbatim).
#[must_use]
pub fn classify(text: &str) -> Option<(VoiceCommand, String)> {
    let normalized = text.to_lowercase().trim().to_string();

    if normalized.len() < MIN_COMMAND_LEN {
        return None;
    }

    VoiceCommand::resolve(&normalized).map(|cmd| (cmd, normalized))
}

/// Strip markdown emphasis and decorative glyphs from backend text before
/// handing it to speech synthesis
#[must_use]
pub fn sanitize_for_speech(text: &str) -> String {
    SPEECH_MARKUP.replace_all(text, "").into_owned()
}
