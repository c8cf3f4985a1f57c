//! Reversible masking of sensitive spans before provider transmission
//!
//! Detects a fixed set of PII categories and replaces each matched span
//! with a placeholder token like `[EMAIL_1]`. The caller holds the
//! token map for the lifetime of one request and restores originals
//! from the provider's response with [`Detector::unmask`]. Masking
//! cannot fail: text without matches passes through unchanged.

#![allow(clippy::must_use_candidate)]

use std::collections::HashMap;

use regex::Regex;

/// Detectable PII categories, in processing order
///
/// The order is fixed so token assignment is reproducible across runs.
/// More specific numeric formats (credit card, SSN) run before the
/// looser phone pattern so they claim overlapping digit spans first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PiiKind {
    /// Email addresses
    Email,
    /// 16-digit card numbers in 4-4-4-4 groups
    CreditCard,
    /// US Social Security numbers (XXX-XX-XXXX)
    Ssn,
    /// Phone numbers with optional country code
    Phone,
    /// Dotted-quad IPv4 addresses
    Ipv4,
    /// Fully-expanded IPv6 addresses
    Ipv6,
    /// Provider API key formats (sk-..., AIza...)
    ApiKey,
}

impl PiiKind {
    /// Label used inside placeholder tokens
    pub const fn label(self) -> &'static str {
        match self {
            Self::Email => "EMAIL",
            Self::CreditCard => "CREDIT_CARD",
            Self::Ssn => "SSN",
            Self::Phone => "PHONE",
            Self::Ipv4 => "IPV4",
            Self::Ipv6 => "IPV6",
            Self::ApiKey => "API_KEY",
        }
    }

    const fn pattern(self) -> &'static str {
        match self {
            Self::Email => r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}",
            Self::CreditCard => r"\b\d{4}[-.\s]?\d{4}[-.\s]?\d{4}[-.\s]?\d{4}\b",
            Self::Ssn => r"\b\d{3}-\d{2}-\d{4}\b",
            Self::Phone => r"(\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}",
            Self::Ipv4 => r"\b(?:\d{1,3}\.){3}\d{1,3}\b",
            Self::Ipv6 => r"\b(?:[a-fA-F0-9]{1,4}:){7}[a-fA-F0-9]{1,4}\b",
            Self::ApiKey => r"\b(?:sk-[a-zA-Z0-9]{20,}|AIza[0-9A-Za-z-_]{35})\b",
        }
    }

    const ALL: [Self; 7] = [
        Self::Email,
        Self::CreditCard,
        Self::Ssn,
        Self::Phone,
        Self::Ipv4,
        Self::Ipv6,
        Self::ApiKey,
    ];
}

/// PII detector over the fixed category set
pub struct Detector {
    patterns: Vec<(PiiKind, Regex)>,
}

impl Detector {
    /// Compile all category patterns
    pub fn new() -> Self {
        let patterns = PiiKind::ALL
            .into_iter()
            .map(|kind| {
                let regex = Regex::new(kind.pattern()).expect("valid built-in PII pattern");
                (kind, regex)
            })
            .collect();

        Self { patterns }
    }

    /// Replace detected PII with placeholder tokens
    ///
    /// Tokens are numbered 1-based per category in match order. Every
    /// occurrence of a matched substring is replaced, so a value that
    /// appears multiple times collapses onto a single token. Returns
    /// the masked text and the token -> original map needed to reverse
    /// the substitution.
    pub fn mask(&self, text: &str) -> (String, HashMap<String, String>) {
        let mut masked = text.to_owned();
        let mut unmask_map = HashMap::new();

        for (kind, regex) in &self.patterns {
            // Collect before mutating so match positions stay coherent
            let matches: Vec<String> = regex.find_iter(&masked).map(|m| m.as_str().to_owned()).collect();

            for (i, found) in matches.iter().enumerate() {
                let token = format!("[{}_{}]", kind.label(), i + 1);
                masked = masked.replace(found, &token);
                unmask_map.insert(token, found.clone());
            }
        }

        if !unmask_map.is_empty() {
            tracing::debug!(spans = unmask_map.len(), "masked sensitive spans");
        }

        (masked, unmask_map)
    }

    /// Restore original values in a masked response
    ///
    /// Literal replacement of each token with its original; tokens not
    /// present in the map are left verbatim. Idempotent on legitimate
    /// content, which never contains token strings.
    pub fn unmask(&self, text: &str, unmask_map: &HashMap<String, String>) -> String {
        let mut unmasked = text.to_owned();
        for (token, original) in unmask_map {
            unmasked = unmasked.replace(token, original);
        }
        unmasked
    }
}

impl Default for Detector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_email() {
        let detector = Detector::new();
        let (masked, map) = detector.mask("Contact me at john.doe@example.com for details.");

        assert_eq!(masked, "Contact me at [EMAIL_1] for details.");
        assert_eq!(map.get("[EMAIL_1]").unwrap(), "john.doe@example.com");
    }

    #[test]
    fn masks_phone() {
        let detector = Detector::new();
        let (masked, map) = detector.mask("Call 123-456-7890.");

        assert_eq!(masked, "Call [PHONE_1].");
        assert_eq!(map.get("[PHONE_1]").unwrap(), "123-456-7890");
    }

    #[test]
    fn masks_credit_card() {
        let detector = Detector::new();
        let (masked, map) = detector.mask("My card is 1234-5678-1234-5678.");

        assert_eq!(masked, "My card is [CREDIT_CARD_1].");
        assert_eq!(map.get("[CREDIT_CARD_1]").unwrap(), "1234-5678-1234-5678");
    }

    #[test]
    fn masks_ssn() {
        let detector = Detector::new();
        let (masked, map) = detector.mask("My SSN is 123-45-6789.");

        assert_eq!(masked, "My SSN is [SSN_1].");
        assert_eq!(map.get("[SSN_1]").unwrap(), "123-45-6789");
    }

    #[test]
    fn masks_ipv4() {
        let detector = Detector::new();
        let (masked, map) = detector.mask("Server is at 192.168.1.1.");

        assert_eq!(masked, "Server is at [IPV4_1].");
        assert_eq!(map.get("[IPV4_1]").unwrap(), "192.168.1.1");
    }

    #[test]
    fn masks_ipv6() {
        let detector = Detector::new();
        let (masked, map) = detector.mask("IPv6 is 2001:0db8:85a3:0000:0000:8a2e:0370:7334.");

        assert_eq!(masked, "IPv6 is [IPV6_1].");
        assert_eq!(
            map.get("[IPV6_1]").unwrap(),
            "2001:0db8:85a3:0000:0000:8a2e:0370:7334"
        );
    }

    #[test]
    fn masks_api_keys() {
        let detector = Detector::new();
        let (masked, map) = detector.mask("Key: sk-abcdefghijklmnopqrstuvwxyz123456");

        assert_eq!(masked, "Key: [API_KEY_1]");
        assert_eq!(map.get("[API_KEY_1]").unwrap(), "sk-abcdefghijklmnopqrstuvwxyz123456");
    }

    #[test]
    fn numbers_matches_per_category() {
        let detector = Detector::new();
        let (masked, map) = detector.mask("Mail a@example.com or b@example.com.");

        assert_eq!(masked, "Mail [EMAIL_1] or [EMAIL_2].");
        assert_eq!(map.get("[EMAIL_1]").unwrap(), "a@example.com");
        assert_eq!(map.get("[EMAIL_2]").unwrap(), "b@example.com");
    }

    #[test]
    fn duplicate_value_collapses_onto_one_token() {
        let detector = Detector::new();
        let (masked, _) = detector.mask("Send to a@example.com and cc a@example.com.");

        assert_eq!(masked, "Send to [EMAIL_1] and cc [EMAIL_1].");
    }

    #[test]
    fn mixed_categories_tokenize_independently() {
        let detector = Detector::new();
        let (masked, map) = detector.mask("Reach a@example.com at 192.168.1.1.");

        assert_eq!(masked, "Reach [EMAIL_1] at [IPV4_1].");
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn clean_text_passes_through() {
        let detector = Detector::new();
        let (masked, map) = detector.mask("Nothing sensitive here.");

        assert_eq!(masked, "Nothing sensitive here.");
        assert!(map.is_empty());
    }

    #[test]
    fn unmask_round_trips() {
        let detector = Detector::new();
        let text = "Contact john.doe@example.com from 192.168.1.1, SSN 123-45-6789.";
        let (masked, map) = detector.mask(text);

        assert_ne!(masked, text);
        assert_eq!(detector.unmask(&masked, &map), text);
    }

    #[test]
    fn unmask_leaves_unknown_tokens_verbatim() {
        let detector = Detector::new();
        let map = HashMap::from([("[EMAIL_1]".to_owned(), "a@example.com".to_owned())]);

        let restored = detector.unmask("See [EMAIL_1] and [EMAIL_2].", &map);
        assert_eq!(restored, "See a@example.com and [EMAIL_2].");
    }

    #[test]
    fn unmask_is_idempotent() {
        let detector = Detector::new();
        let (masked, map) = detector.mask("Contact a@example.com now.");

        let once = detector.unmask(&masked, &map);
        let twice = detector.unmask(&once, &map);
        assert_eq!(once, twice);
    }
}
