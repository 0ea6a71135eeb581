//! Password generation
//!
//! Charset-sampling generator with validation and an entropy-based strength
//! estimate. Sampling uses the OS random source, so generated passwords are
//! safe to use as real credentials.

use rand::rngs::OsRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VaultError};

const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const NUMBERS: &str = "0123456789";
const DEFAULT_SYMBOLS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Maximum password length accepted by validation
const MAX_LENGTH: usize = 1000;

/// Configuration for password generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordOptions {
    pub length: usize,
    pub include_uppercase: bool,
    pub include_lowercase: bool,
    pub include_numbers: bool,
    pub include_symbols: bool,
    pub custom_symbols: String,
}

impl Default for PasswordOptions {
    fn default() -> Self {
        Self {
            length: 16,
            include_uppercase: true,
            include_lowercase: true,
            include_numbers: true,
            include_symbols: true,
            custom_symbols: DEFAULT_SYMBOLS.to_string(),
        }
    }
}

/// Password strength bucket, by estimated entropy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PasswordStrength {
    VeryWeak,
    Weak,
    Fair,
    Good,
    Strong,
    VeryStrong,
}

/// Strength estimate for a set of options
#[derive(Debug, Clone, Copy)]
pub struct StrengthEstimate {
    /// Number of distinct characters the charset offers
    pub charset_size: usize,
    /// Estimated entropy in bits: length * log2(charset_size)
    pub entropy: f64,
    pub strength: PasswordStrength,
}

/// Validate password generation options
pub fn validate_options(options: &PasswordOptions) -> Result<()> {
    if options.length < 1 {
        return Err(VaultError::InvalidPasswordOptions(
            "Password length must be at least 1".to_string(),
        ));
    }

    if options.length > MAX_LENGTH {
        return Err(VaultError::InvalidPasswordOptions(format!(
            "Password length cannot exceed {} characters",
            MAX_LENGTH
        )));
    }

    let has_any_character_type = options.include_uppercase
        || options.include_lowercase
        || options.include_numbers
        || options.include_symbols;

    if !has_any_character_type {
        return Err(VaultError::InvalidPasswordOptions(
            "At least one character type must be selected".to_string(),
        ));
    }

    if options.include_symbols && options.custom_symbols.is_empty() {
        return Err(VaultError::InvalidPasswordOptions(
            "Custom symbols cannot be empty when symbols are enabled".to_string(),
        ));
    }

    Ok(())
}

/// Generate a random password from the selected character sets
pub fn generate_password(options: &PasswordOptions) -> Result<String> {
    validate_options(options)?;

    let mut charset: Vec<char> = Vec::new();

    if options.include_uppercase {
        charset.extend(UPPERCASE.chars());
    }
    if options.include_lowercase {
        charset.extend(LOWERCASE.chars());
    }
    if options.include_numbers {
        charset.extend(NUMBERS.chars());
    }
    if options.include_symbols {
        charset.extend(options.custom_symbols.chars());
    }

    let mut rng = OsRng;
    let password: String = (0..options.length)
        .map(|_| charset[rng.gen_range(0..charset.len())])
        .collect();

    Ok(password)
}

/// Estimate password strength from charset size and length
pub fn estimate_strength(options: &PasswordOptions) -> StrengthEstimate {
    let mut charset_size = 0;

    if options.include_uppercase {
        charset_size += 26;
    }
    if options.include_lowercase {
        charset_size += 26;
    }
    if options.include_numbers {
        charset_size += 10;
    }
    if options.include_symbols {
        charset_size += options.custom_symbols.chars().count();
    }

    let entropy = if charset_size > 0 {
        options.length as f64 * (charset_size as f64).log2()
    } else {
        0.0
    };

    let strength = match entropy {
        e if e < 30.0 => PasswordStrength::VeryWeak,
        e if e < 50.0 => PasswordStrength::Weak,
        e if e < 70.0 => PasswordStrength::Fair,
        e if e < 90.0 => PasswordStrength::Good,
        e if e < 120.0 => PasswordStrength::Strong,
        _ => PasswordStrength::VeryStrong,
    };

    StrengthEstimate {
        charset_size,
        entropy,
        strength,
    }
}
