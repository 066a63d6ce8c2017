//! Maps raw service labels and scores onto the fixed personality categories.

use std::fmt;

use serde_json::Value;

/// Personality categories the analysis service can report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Personality {
    Openness,
    Conscientiousness,
    Extraversion,
    Agreeableness,
    Neuroticism,
    /// Any label outside the known set, including an empty or missing one.
    Unknown,
}

impl Personality {
    /// The categories the service is trained on.
    pub const KNOWN: [Personality; 5] = [
        Self::Openness,
        Self::Conscientiousness,
        Self::Extraversion,
        Self::Agreeableness,
        Self::Neuroticism,
    ];

    /// Match an already-cleaned label exactly.
    pub fn from_label(cleaned: &str) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|personality| personality.label() == cleaned)
            .unwrap_or(Self::Unknown)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Openness => "Openness",
            Self::Conscientiousness => "Conscientiousness",
            Self::Extraversion => "Extraversion",
            Self::Agreeableness => "Agreeableness",
            Self::Neuroticism => "Neuroticism",
            Self::Unknown => "Unknown",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Openness => "Imaginative, curious, enjoys novelty, art, and ideas.",
            Self::Conscientiousness => "Organized, responsible, goal-directed, and disciplined.",
            Self::Extraversion => "Outgoing, energetic, sociable.",
            Self::Agreeableness => "Compassionate, cooperative, values harmony.",
            Self::Neuroticism => "Emotionally sensitive, prone to anxiety and moodiness.",
            Self::Unknown => "Personality could not be determined.",
        }
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Category and description derived from a raw class label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interpretation {
    pub personality: Personality,
    pub description: &'static str,
}

/// Keep only ASCII letters, e.g. `"Openness_1\n"` becomes `"Openness"`.
pub fn clean_label(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphabetic)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Interpret a raw class label. Pure: the same input always yields the same output.
pub fn interpret(label: Option<&str>) -> Interpretation {
    let personality = label
        .map(clean_label)
        .map(|cleaned| Personality::from_label(&cleaned))
        .unwrap_or(Personality::Unknown);
    Interpretation {
        personality,
        description: personality.description(),
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("Invalid confidence value: {0}")]
pub struct ConfidenceError(pub String);

/// Strictly read a confidence score from a JSON number or numeric string.
///
/// Strings follow a leading-number rule: `"0.87"` and `"0.87 (high)"` both
/// read as `0.87`. Values outside `[0, 1]` are returned unchanged.
pub fn parse_confidence(value: &Value) -> Result<f64, ConfidenceError> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => parse_leading_float(text),
        _ => None,
    };
    parsed
        .filter(|confidence| confidence.is_finite())
        .ok_or_else(|| ConfidenceError(value.to_string()))
}

/// Lenient confidence: anything missing or unreadable becomes `0.0`.
pub fn coerce_confidence(value: Option<&Value>) -> f64 {
    match value.map(parse_confidence) {
        Some(Ok(confidence)) => confidence,
        Some(Err(err)) => {
            tracing::debug!("{err}; treating as 0");
            0.0
        }
        None => 0.0,
    }
}

fn parse_leading_float(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0usize;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;
    let mut frac_digits = 0usize;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end.min(bytes.len())..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }
    text[..end].parse().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|byte| byte.is_ascii_digit()).count()
}
