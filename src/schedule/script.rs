use regex::Regex;
use serde::{Deserialize, Serialize};

/// Shown instead of an empty script.
pub const SCRIPT_PLACEHOLDER: &str = "台本を入力してください";

/// Style class for lines without a recognized speaker.
pub const NEUTRAL_STYLE: &str = "black-text";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Speaker {
    A,
    B,
}

/// How one speaker is written in scripts and shown in previews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerProfile {
    pub display_name: String,
    /// Marker tokens accepted before the colon, e.g. `赤` or `Tomomi`.
    pub tokens: Vec<String>,
    pub style: String,
}

impl SpeakerProfile {
    pub fn new(display_name: &str, tokens: &[&str], style: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
            style: style.to_string(),
        }
    }
}

/// Compiled marker rules for both speakers plus narration.
#[derive(Debug, Clone)]
pub struct SpeakerSet {
    a: SpeakerProfile,
    b: SpeakerProfile,
    a_marker: Option<Regex>,
    b_marker: Option<Regex>,
    narration_marker: Option<Regex>,
}

impl SpeakerSet {
    pub fn new(
        a: SpeakerProfile,
        b: SpeakerProfile,
        narration_tokens: &[String],
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            a_marker: marker_regex(&a.tokens)?,
            b_marker: marker_regex(&b.tokens)?,
            narration_marker: marker_regex(narration_tokens)?,
            a,
            b,
        })
    }

    pub fn profile(&self, speaker: Speaker) -> &SpeakerProfile {
        match speaker {
            Speaker::A => &self.a,
            Speaker::B => &self.b,
        }
    }

    fn classify(&self, line: &str) -> ScriptLine {
        if let Some(rest) = strip_marker(&self.a_marker, line) {
            return ScriptLine::spoken(Some(Speaker::A), rest);
        }
        if let Some(rest) = strip_marker(&self.b_marker, line) {
            return ScriptLine::spoken(Some(Speaker::B), rest);
        }
        if let Some(rest) = strip_marker(&self.narration_marker, line) {
            return ScriptLine::spoken(None, rest);
        }
        ScriptLine::spoken(None, line)
    }
}

impl Default for SpeakerSet {
    fn default() -> Self {
        let a = SpeakerProfile::new("Tomomi", &["赤", "Tomomi"], "red-text");
        let b = SpeakerProfile::new("道ゐ", &["青", "道ゐ"], "blue-text");
        Self {
            a_marker: marker_regex(&a.tokens).ok().flatten(),
            b_marker: marker_regex(&b.tokens).ok().flatten(),
            narration_marker: marker_regex(&["黒".to_string()]).ok().flatten(),
            a,
            b,
        }
    }
}

/// `token` + optional spaces + half- or full-width colon, case-insensitive.
fn marker_regex(tokens: &[String]) -> Result<Option<Regex>, regex::Error> {
    let alternatives: Vec<String> = tokens
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(regex::escape)
        .collect();
    if alternatives.is_empty() {
        return Ok(None);
    }
    let pattern = format!(r"^\s*(?i:{})\s*[:：]\s*(.*)$", alternatives.join("|"));
    Regex::new(&pattern).map(Some)
}

fn strip_marker<'a>(marker: &Option<Regex>, line: &'a str) -> Option<&'a str> {
    marker
        .as_ref()?
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

// ============================================================================
// Tagged lines
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptLine {
    Text {
        speaker: Option<Speaker>,
        text: String,
    },
    /// A blank source line.
    Break,
}

impl ScriptLine {
    fn spoken(speaker: Option<Speaker>, text: &str) -> Self {
        Self::Text {
            speaker,
            text: text.to_string(),
        }
    }

    pub fn speaker(&self) -> Option<Speaker> {
        match self {
            Self::Text { speaker, .. } => *speaker,
            Self::Break => None,
        }
    }

    /// Text as shown to the reader: recognized speakers get their display
    /// name in front, e.g. `Tomomi：こんにちは`.
    pub fn display_text(&self, speakers: &SpeakerSet) -> String {
        match self {
            Self::Text {
                speaker: Some(speaker),
                text,
            } => format!("{}：{}", speakers.profile(*speaker).display_name, text),
            Self::Text {
                speaker: None,
                text,
            } => text.clone(),
            Self::Break => String::new(),
        }
    }

    pub fn style<'a>(&self, speakers: &'a SpeakerSet) -> &'a str {
        match self.speaker() {
            Some(speaker) => speakers.profile(speaker).style.as_str(),
            None => NEUTRAL_STYLE,
        }
    }
}

/// Splits a script into tagged lines, one per source line.
///
/// A missing or empty script yields a single neutral placeholder line.
pub fn colorize(script: Option<&str>, speakers: &SpeakerSet) -> Vec<ScriptLine> {
    let script = match script {
        Some(s) if !s.is_empty() => s,
        _ => return vec![ScriptLine::spoken(None, SCRIPT_PLACEHOLDER)],
    };

    script
        .split('\n')
        .map(|line| {
            let line = line.trim();
            if line.is_empty() {
                ScriptLine::Break
            } else {
                speakers.classify(line)
            }
        })
        .collect()
}

/// HTML fragment for a colorized script, one `<p>` per line and `<br>` for
/// blank lines.
pub fn render_html(lines: &[ScriptLine], speakers: &SpeakerSet) -> String {
    lines
        .iter()
        .map(|line| match line {
            ScriptLine::Break => "<br>".to_string(),
            ScriptLine::Text { .. } => format!(
                "<p class=\"{}\">{}</p>",
                escape_html(line.style(speakers)),
                escape_html(&line.display_text(speakers))
            ),
        })
        .collect()
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
