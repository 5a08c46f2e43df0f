use base64::{engine::general_purpose, Engine as _};
use lazy_static::lazy_static;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(r"[^\s@]+@[^\s@]+\.[^\s@]+").unwrap();
    // Local (07x...) and international (+94 ...) numbers, with optional separators
    static ref PHONE_REGEX: Regex =
        Regex::new(r"(?:\+94[-\s]?|\b0)[0-9]{2}[-\s]?[0-9]{3}[-\s]?[0-9]{4}\b").unwrap();
    static ref CARD_REGEX: Regex =
        Regex::new(r"\b[0-9]{4}[-\s]?[0-9]{4}[-\s]?[0-9]{4}[-\s]?[0-9]{4}\b").unwrap();
    static ref DEFAULT_REDACTOR: PiiRedactor = PiiRedactor::new(RedactionConfig::default());
}

static REDACTION_ENABLED: AtomicBool = AtomicBool::new(true);

/// Turn process-wide redaction of [`Redacted`] values on or off
pub fn set_redaction_enabled(enabled: bool) {
    REDACTION_ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn redaction_enabled() -> bool {
    REDACTION_ENABLED.load(Ordering::Relaxed)
}

/// PII redaction configuration
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    pub redact_emails: bool,
    pub redact_phones: bool,
    pub redact_cards: bool,
    /// Replace matches with a short hash so the same value can be
    /// correlated across log lines without being readable
    pub hash_for_correlation: bool,
    pub custom_patterns: Vec<(Regex, String)>,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            redact_emails: true,
            redact_phones: true,
            redact_cards: true,
            hash_for_correlation: true,
            custom_patterns: Vec::new(),
        }
    }
}

/// PII redactor for patient contact details in log output
pub struct PiiRedactor {
    config: RedactionConfig,
}

impl PiiRedactor {
    pub fn new(config: RedactionConfig) -> Self {
        Self { config }
    }

    pub fn redact(&self, text: &str) -> String {
        let mut result = text.to_string();

        if self.config.redact_emails {
            result = self.redact_emails(&result);
        }

        // Cards first so a 16-digit number is never half-eaten as a phone
        if self.config.redact_cards {
            result = self.redact_cards(&result);
        }

        if self.config.redact_phones {
            result = self.redact_phones(&result);
        }

        for (pattern, replacement) in &self.config.custom_patterns {
            result = pattern.replace_all(&result, replacement.as_str()).to_string();
        }

        result
    }

    fn redact_emails(&self, text: &str) -> String {
        EMAIL_REGEX
            .replace_all(text, |caps: &regex::Captures| {
                let email = &caps[0];
                if self.config.hash_for_correlation {
                    return format!("EMAIL[{}]", hash_value(email));
                }
                match email.split_once('@') {
                    Some((local, domain)) => format!(
                        "{}***@{}***",
                        local.chars().next().unwrap_or('*'),
                        domain.chars().next().unwrap_or('*')
                    ),
                    None => "***@***".to_string(),
                }
            })
            .to_string()
    }

    fn redact_phones(&self, text: &str) -> String {
        PHONE_REGEX
            .replace_all(text, |caps: &regex::Captures| {
                let phone = &caps[0];
                if self.config.hash_for_correlation {
                    return format!("PHONE[{}]", hash_value(phone));
                }
                let digits: Vec<char> = phone.chars().filter(char::is_ascii_digit).collect();
                let keep_tail = 3.min(digits.len());
                let head: String = digits.iter().take(2).collect();
                let tail: String = digits.iter().skip(digits.len() - keep_tail).collect();
                let hidden = digits.len().saturating_sub(head.len() + tail.len());
                format!("{head}{}{tail}", "*".repeat(hidden))
            })
            .to_string()
    }

    fn redact_cards(&self, text: &str) -> String {
        CARD_REGEX
            .replace_all(text, |caps: &regex::Captures| {
                if self.config.hash_for_correlation {
                    format!("CARD[{}]", hash_value(&caps[0]))
                } else {
                    "****-****-****-****".to_string()
                }
            })
            .to_string()
    }
}

fn hash_value(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let result = hasher.finalize();
    general_purpose::STANDARD.encode(&result[..8]) // first 8 bytes keep the tag short
}

/// Redact with the default configuration
pub fn redact(text: &str) -> String {
    DEFAULT_REDACTOR.redact(text)
}

/// Display wrapper for log fields carrying patient contact data.
///
/// ```rust
/// use logger_redacted::Redacted;
///
/// let email = "nimal@example.lk";
/// tracing::info!(patient_email = %Redacted(email), "bill updated");
/// ```
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if redaction_enabled() {
            f.write_str(&redact(self.0))
        } else {
            f.write_str(self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn masking_redactor() -> PiiRedactor {
        PiiRedactor::new(RedactionConfig {
            hash_for_correlation: false,
            ..Default::default()
        })
    }

    #[test]
    fn test_email_redaction() {
        let redacted = masking_redactor().redact("Invoice sent to nimal.perera@example.lk today");
        assert!(redacted.contains("n***@e***"));
        assert!(!redacted.contains("nimal.perera"));
    }

    #[test]
    fn test_local_phone_redaction() {
        let redacted = masking_redactor().redact("Call 0711234567 for billing");
        assert_eq!(redacted, "Call 07*****567 for billing");
    }

    #[test]
    fn test_separated_and_international_phone_redaction() {
        let redactor = masking_redactor();
        assert!(!redactor.redact("071-123-4567").contains("123"));
        assert!(!redactor.redact("+94 71 123 4567").contains("123 4567"));
    }

    #[test]
    fn test_card_redaction() {
        let redacted = masking_redactor().redact("Paid with 4111 1111 1111 1111");
        assert_eq!(redacted, "Paid with ****-****-****-****");
    }

    #[test]
    fn test_hashing_is_stable_for_correlation() {
        let redactor = PiiRedactor::new(RedactionConfig::default());
        let first = redactor.redact("0711234567");
        let second = redactor.redact("0711234567");
        assert!(first.starts_with("PHONE["));
        assert_eq!(first, second);
    }

    #[test]
    fn test_plain_text_untouched() {
        let redacted = redact("Bill BN-0001 settled by Cash");
        assert_eq!(redacted, "Bill BN-0001 settled by Cash");
    }
}
