//! Command/text extraction after a rule matches.
//!
//! Literal kinds set `command` to the pattern and `text` to the raw text with
//! the first occurrence of the pattern removed. Regex rules collect every
//! match into `command` and every fragment between matches into `text`, both
//! joined with `|`.
//!
//! ```text
//! command "/help" on "/help now"  ->  command "/help",  text " now"
//! regex   "\d+"   on "a12b34c"    ->  command "12|34",  text "a|b|c"
//! ```

use xiuxian_core::Event;

use crate::rule::Rule;

/// Separator used when joining regex matches and fragments.
pub const JOIN_SEPARATOR: &str = "|";

impl<A> Rule<A> {
    /// Writes `command` and `text` into `event`.
    ///
    /// Not idempotent: a second call would strip the pattern from the raw text
    /// again while `text` already lacks it. The router calls this once per
    /// match on its own copy of the event.
    pub(crate) fn extract_into(&self, event: &mut Event) {
        match self.compiled() {
            Some(re) => {
                event.command = re
                    .find_iter(&event.raw_text)
                    .map(|m| m.as_str())
                    .collect::<Vec<_>>()
                    .join(JOIN_SEPARATOR);
                event.text = re
                    .split(&event.raw_text)
                    .collect::<Vec<_>>()
                    .join(JOIN_SEPARATOR);
            }
            None => {
                event.command = self.pattern().to_string();
                event.text = remove_first(&event.raw_text, self.pattern());
            }
        }
    }

    /// Returns a copy of `event` with `command` and `text` filled in.
    ///
    /// The input is left untouched. This does not check whether the rule
    /// matches.
    pub fn extracted(&self, event: &Event) -> Event {
        let mut event = event.clone();
        self.extract_into(&mut event);
        event
    }
}

fn remove_first(haystack: &str, pattern: &str) -> String {
    if pattern.is_empty() {
        return haystack.to_string();
    }
    haystack.replacen(pattern, "", 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleKind;

    fn extract(kind: RuleKind, pattern: &str, raw_text: &str) -> Event {
        let rule = Rule::new(kind, pattern, ()).unwrap();
        rule.extracted(&Event::default().with_raw_text(raw_text))
    }

    #[test]
    fn test_command_extraction() {
        let event = extract(RuleKind::Command, "/help", "/help now");
        assert_eq!(event.command, "/help");
        assert_eq!(event.text, " now");
        assert_eq!(event.raw_text, "/help now");
    }

    #[test]
    fn test_regex_extraction() {
        let event = extract(RuleKind::Regex, r"\d+", "a12b34c");
        assert_eq!(event.command, "12|34");
        assert_eq!(event.text, "a|b|c");
    }

    #[test]
    fn test_regex_extraction_with_edge_matches() {
        let event = extract(RuleKind::Regex, r"\d+", "12ab34");
        assert_eq!(event.command, "12|34");
        assert_eq!(event.text, "|ab|");
    }

    #[test]
    fn test_regex_capture_groups_do_not_change_extraction() {
        let event = extract(RuleKind::Regex, r"(\d+)d", "roll 2d6 and 3d8");
        assert_eq!(event.command, "2d|3d");
        assert_eq!(event.text, "roll |6 and |8");
    }

    #[test]
    fn test_removes_only_first_occurrence() {
        let event = extract(RuleKind::Keyword, "ha", "haha ha");
        assert_eq!(event.command, "ha");
        assert_eq!(event.text, "ha ha");
    }

    #[test]
    fn test_suffix_removes_first_occurrence_not_last() {
        let event = extract(RuleKind::Suffix, "吗", "吗？好吗");
        assert_eq!(event.text, "？好吗");
    }

    #[test]
    fn test_fullmatch_leaves_empty_text() {
        let event = extract(RuleKind::Fullmatch, "签到", "签到");
        assert_eq!(event.command, "签到");
        assert_eq!(event.text, "");
    }

    #[test]
    fn test_empty_pattern_keeps_raw_text() {
        let event = extract(RuleKind::Keyword, "", "anything");
        assert_eq!(event.command, "");
        assert_eq!(event.text, "anything");
    }

    #[test]
    fn test_file_rule_text_is_raw_text_when_extension_absent() {
        let event = extract(RuleKind::FileExtension, "zip", "here is my save");
        assert_eq!(event.command, "zip");
        assert_eq!(event.text, "here is my save");
    }

    #[test]
    fn test_extracted_leaves_input_untouched() {
        let rule = Rule::prefix("/", ()).build().unwrap();
        let original = Event::default().with_raw_text("/ping");
        let copy = rule.extracted(&original);

        assert_eq!(copy.text, "ping");
        assert!(original.command.is_empty());
        assert!(original.text.is_empty());
    }
}
