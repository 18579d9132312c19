use serde::Serialize;

pub const MIN_LENGTH: usize = 8;
const LONG_LENGTH: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Weak,
    Medium,
    Strong,
}

impl Strength {
    pub fn from_score(score: u32) -> Self {
        match score {
            0..=39 => Strength::Weak,
            40..=69 => Strength::Medium,
            _ => Strength::Strong,
        }
    }
}

/// Per-rule outcome for a candidate password and its confirmation.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChecks {
    pub min_length: bool,
    pub has_uppercase: bool,
    pub has_lowercase: bool,
    pub has_number: bool,
    pub has_special_char: bool,
    pub passwords_match: bool,
}

impl PasswordChecks {
    pub fn new(password: &str, confirmation: &str) -> Self {
        Self {
            min_length: password.chars().count() >= MIN_LENGTH,
            has_uppercase: password.chars().any(|c| c.is_ascii_uppercase()),
            has_lowercase: password.chars().any(|c| c.is_ascii_lowercase()),
            has_number: password.chars().any(|c| c.is_ascii_digit()),
            has_special_char: password.chars().any(|c| !c.is_ascii_alphanumeric()),
            passwords_match: !password.is_empty() && password == confirmation,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed().is_empty()
    }

    pub fn failed(&self) -> Vec<&'static str> {
        let rules = [
            (self.min_length, "at least 8 characters"),
            (self.has_uppercase, "an uppercase letter"),
            (self.has_lowercase, "a lowercase letter"),
            (self.has_number, "a number"),
            (self.has_special_char, "a special character"),
            (self.passwords_match, "matching confirmation"),
        ];
        rules
            .iter()
            .filter(|(ok, _)| !ok)
            .map(|(_, rule)| *rule)
            .collect()
    }
}

/// Score in 0..=100.
pub fn strength_score(password: &str) -> u32 {
    let len = password.chars().count();
    let mut score = 0;
    if len >= MIN_LENGTH {
        score += 20;
    }
    if len >= LONG_LENGTH {
        score += 10;
    }
    if password.chars().any(|c| c.is_ascii_lowercase()) {
        score += 20;
    }
    if password.chars().any(|c| c.is_ascii_uppercase()) {
        score += 20;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        score += 15;
    }
    if password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        score += 15;
    }
    score
}
