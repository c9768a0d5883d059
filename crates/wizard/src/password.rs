use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;

const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()-_=+";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrengthLevel {
    Weak,
    Medium,
    Strong,
}

impl fmt::Display for StrengthLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weak   => f.write_str("Weak"),
            Self::Medium => f.write_str("Medium"),
            Self::Strong => f.write_str("Strong"),
        }
    }
}

/// Result of the password strength meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strength {
    /// Satisfied criteria, 0 – 5.
    pub score: u8,
    /// Meter width in percent, 0 – 100.
    pub width: u8,
    pub level: StrengthLevel,
}

/// Score a password on length ≥ 8, upper case, lower case, digit and any
/// other character.
pub fn password_strength(password: &str) -> Strength {
    let criteria = [
        password.chars().count() >= 8,
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_ascii_alphanumeric()),
    ];
    let score = criteria.iter().filter(|&&met| met).count() as u8;

    let level = match score {
        0 | 1 => StrengthLevel::Weak,
        2 | 3 => StrengthLevel::Medium,
        _     => StrengthLevel::Strong,
    };

    Strength {
        score,
        width: (score * 25).min(100),
        level,
    }
}

/// Random password with at least one upper case letter, lower case letter,
/// digit and symbol. Lengths below four are raised to four.
pub fn generate_secure_password(length: usize) -> String {
    let mut rng = rand::thread_rng();
    let charset: Vec<u8> = [UPPER, LOWER, DIGITS, SYMBOLS].concat();

    let mut chars: Vec<u8> = [UPPER, LOWER, DIGITS, SYMBOLS]
        .iter()
        .map(|class| class[rng.gen_range(0..class.len())])
        .collect();
    while chars.len() < length {
        chars.push(charset[rng.gen_range(0..charset.len())]);
    }
    chars.shuffle(&mut rng);

    chars.into_iter().map(char::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strength_levels() {
        assert_eq!(password_strength("").level, StrengthLevel::Weak);
        assert_eq!(password_strength("abc").level, StrengthLevel::Weak);
        assert_eq!(password_strength("abcABC").level, StrengthLevel::Medium);
        assert_eq!(password_strength("abcdefG1").level, StrengthLevel::Strong);
    }

    #[test]
    fn width_is_capped() {
        let s = password_strength("Abcdef1!");
        assert_eq!(s.score, 5);
        assert_eq!(s.width, 100);
        assert_eq!(password_strength("abc").width, 25);
    }

    #[test]
    fn generated_password_covers_every_class() {
        for _ in 0..50 {
            let pw = generate_secure_password(12);
            assert_eq!(pw.len(), 12);
            assert!(pw.bytes().any(|b| UPPER.contains(&b)));
            assert!(pw.bytes().any(|b| LOWER.contains(&b)));
            assert!(pw.bytes().any(|b| DIGITS.contains(&b)));
            assert!(pw.bytes().any(|b| SYMBOLS.contains(&b)));
            assert_eq!(password_strength(&pw).level, StrengthLevel::Strong);
        }
    }

    #[test]
    fn short_lengths_still_cover_every_class() {
        assert_eq!(generate_secure_password(2).len(), 4);
    }
}
