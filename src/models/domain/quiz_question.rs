use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct QuestionId(pub i64);

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the four fixed answer slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum OptionKey {
    A,
    B,
    C,
    D,
}

impl OptionKey {
    pub const ALL: [OptionKey; 4] = [OptionKey::A, OptionKey::B, OptionKey::C, OptionKey::D];

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionKey::A => "A",
            OptionKey::B => "B",
            OptionKey::C => "C",
            OptionKey::D => "D",
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionKey {
    type Err = AppError;

    // The backend upper-cases stored answers but older attempts may not be.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(OptionKey::A),
            "B" => Ok(OptionKey::B),
            "C" => Ok(OptionKey::C),
            "D" => Ok(OptionKey::D),
            other => Err(AppError::ValidationError(format!(
                "'{}' is not an option key (expected A, B, C or D)",
                other
            ))),
        }
    }
}

/// Display text for the four slots. A slot may be empty and is still selectable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionOptions {
    pub a: Option<String>,
    pub b: Option<String>,
    pub c: Option<String>,
    pub d: Option<String>,
}

impl QuestionOptions {
    pub fn get(&self, key: OptionKey) -> Option<&str> {
        let slot = match key {
            OptionKey::A => &self.a,
            OptionKey::B => &self.b,
            OptionKey::C => &self.c,
            OptionKey::D => &self.d,
        };
        slot.as_deref()
    }

    pub fn iter(&self) -> impl Iterator<Item = (OptionKey, Option<&str>)> + '_ {
        OptionKey::ALL.into_iter().map(move |key| (key, self.get(key)))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub options: QuestionOptions,
    pub marks: u32,
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_key_parses_case_insensitively() {
        assert_eq!("a".parse::<OptionKey>().unwrap(), OptionKey::A);
        assert_eq!(" D ".parse::<OptionKey>().unwrap(), OptionKey::D);
        assert!("E".parse::<OptionKey>().is_err());
        assert!("".parse::<OptionKey>().is_err());
    }

    #[test]
    fn option_key_serializes_as_letter() {
        let json = serde_json::to_string(&OptionKey::C).expect("key should serialize");
        assert_eq!(json, "\"C\"");
    }

    #[test]
    fn question_options_iterate_in_slot_order_including_empty_slots() {
        let options = QuestionOptions {
            a: Some("Rust".to_string()),
            b: None,
            c: Some("Go".to_string()),
            d: Some("Zig".to_string()),
        };

        let slots: Vec<_> = options.iter().collect();
        assert_eq!(slots.len(), 4);
        assert_eq!(slots[0], (OptionKey::A, Some("Rust")));
        assert_eq!(slots[1], (OptionKey::B, None));
        assert_eq!(options.get(OptionKey::D), Some("Zig"));
    }
}
