use std::sync::LazyLock;
use regex::Regex;

/// A postal code has exactly this many characters
pub const CODE_LEN: usize = 8;

static DIGITS_ONLY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{8}$").unwrap());

/// Decides when a draft is complete enough to be looked up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompletionRule {
    /// any 8 characters
    Length,
    /// exactly 8 ASCII digits
    #[default]
    Digits,
}

impl CompletionRule {
    pub fn is_complete(&self, draft: &str) -> bool {
        match self {
            CompletionRule::Length => draft.chars().count() == CODE_LEN,
            CompletionRule::Digits => DIGITS_ONLY.is_match(draft),
        }
    }
}

/// What a single change did to the field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// longer than [`CODE_LEN`], ignored
    Rejected,
    /// draft updated, nothing to look up
    Edited,
    /// draft updated and complete, look this code up
    Committed(String),
}

/// The postal code field: a draft edited on every change and the last committed code.
#[derive(Debug, Default)]
pub struct PostalCodeInput {
    draft: String,
    committed: Option<String>,
    rule: CompletionRule,
}

impl PostalCodeInput {
    pub fn new(rule: CompletionRule) -> Self {
        Self {
            rule,
            ..Default::default()
        }
    }

    /// Apply the full new contents of the field.
    ///
    /// Committing is all-or-nothing and fires on every complete change, even when the
    /// same code was committed before.
    pub fn on_change(&mut self, raw: &str) -> Change {
        if raw.chars().count() > CODE_LEN {
            return Change::Rejected;
        }
        self.draft = raw.to_string();
        if self.is_complete() {
            self.committed = Some(raw.to_string());
            Change::Committed(raw.to_string())
        } else {
            Change::Edited
        }
    }

    pub fn is_complete(&self) -> bool {
        self.rule.is_complete(&self.draft)
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn committed(&self) -> Option<&str> {
        self.committed.as_deref()
    }

    /// message to show under the field while the draft can't be looked up
    pub fn validation_message(&self) -> Option<&'static str> {
        if self.draft.is_empty() || self.is_complete() {
            None
        } else if self.draft.chars().count() == CODE_LEN {
            Some("postal codes contain digits only")
        } else {
            Some("enter 8 digits to look up a postal code")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nine_characters_leave_everything_unchanged() {
        let mut input = PostalCodeInput::new(CompletionRule::Digits);
        assert_eq!(input.on_change("01310100"), Change::Committed("01310100".to_string()));

        for raw in ["013101001", "0131010012345", "abcdefghi"] {
            assert_eq!(input.on_change(raw), Change::Rejected);
            assert_eq!(input.draft(), "01310100");
            assert_eq!(input.committed(), Some("01310100"));
        }
    }

    #[test]
    fn short_drafts_never_commit() {
        let mut input = PostalCodeInput::new(CompletionRule::Digits);
        for raw in ["", "0", "0123", "0123456"] {
            assert_eq!(input.on_change(raw), Change::Edited);
            assert_eq!(input.draft(), raw);
            assert_eq!(input.committed(), None);
        }
    }

    #[test]
    fn committed_survives_later_edits() {
        let mut input = PostalCodeInput::new(CompletionRule::Digits);
        input.on_change("01310100");
        input.on_change("0131");

        assert_eq!(input.draft(), "0131");
        assert_eq!(input.committed(), Some("01310100"));
    }

    #[test]
    fn same_code_commits_every_time() {
        let mut input = PostalCodeInput::new(CompletionRule::Digits);
        assert!(matches!(input.on_change("01310100"), Change::Committed(_)));
        assert!(matches!(input.on_change("01310100"), Change::Committed(_)));
    }

    #[test]
    fn digit_rule_blocks_letters() {
        let mut input = PostalCodeInput::new(CompletionRule::Digits);

        assert_eq!(input.on_change("0131010a"), Change::Edited);
        assert_eq!(input.committed(), None);
        assert_eq!(input.validation_message(), Some("postal codes contain digits only"));
    }

    #[test]
    fn length_rule_accepts_any_eight_characters() {
        let mut input = PostalCodeInput::new(CompletionRule::Length);

        assert_eq!(input.on_change("0131-010"), Change::Committed("0131-010".to_string()));
        assert_eq!(input.validation_message(), None);
    }

    #[test]
    fn length_is_counted_in_characters() {
        let mut input = PostalCodeInput::new(CompletionRule::Length);

        assert_eq!(input.on_change("ááááááá"), Change::Edited);
        assert_eq!(input.on_change("áááááááá"), Change::Committed("áááááááá".to_string()));
    }

    #[test]
    fn validation_message_only_for_partial_drafts() {
        let mut input = PostalCodeInput::default();
        assert_eq!(input.validation_message(), None);

        input.on_change("0131");
        assert_eq!(input.validation_message(), Some("enter 8 digits to look up a postal code"));

        input.on_change("01310100");
        assert_eq!(input.validation_message(), None);
    }
}
