//! Heuristic transcript summarizer: pure sentence extraction, no external
//! calls, no state.
//!
//! The algorithm splits the transcript on sentence punctuation, keeps
//! segments whose trimmed length exceeds 15 characters, and selects up to
//! four key points: the first segment, one or two middle segments at the
//! 30%/60% marks, and the last segment. Instruction keywords pick the
//! output format, with fixed precedence bullet > executive > action >
//! default.
//!
//! Distinctness checks compare the *raw* (untrimmed) segments while the
//! emitted points are trimmed. That asymmetry is deliberate: it is the
//! observable behavior callers and the form client already depend on.

use crate::error::CoreError;

/// A segment only counts as a sentence when its trimmed length exceeds this.
const MEANINGFUL_SENTENCE_MIN_CHARS: usize = 15;

/// Below this many meaningful sentences the transcript is returned as-is.
const MIN_SENTENCES_TO_SUMMARIZE: usize = 3;

const BULLET_MARKER: &str = "\u{2022}";

/// Output format selected by case-insensitive substring match on the
/// instruction text. Precedence is source order: bullet > executive >
/// action > default paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryFormat {
    /// Each point prefixed with a bullet marker, blank line between points.
    Bulleted,
    /// "EXECUTIVE SUMMARY:" header, points prefixed with "-".
    Executive,
    /// "KEY POINTS:" header, points prefixed with "*".
    ActionPoints,
    /// Points joined with ".\n\n" and a trailing period.
    Paragraph,
}

impl SummaryFormat {
    /// Picks the format from free-text instructions. An input matching
    /// several keywords resolves to the first branch in precedence order.
    pub fn from_instructions(instructions: &str) -> Self {
        let lower = instructions.to_lowercase();
        if lower.contains("bullet") {
            SummaryFormat::Bulleted
        } else if lower.contains("executive") {
            SummaryFormat::Executive
        } else if lower.contains("action") {
            SummaryFormat::ActionPoints
        } else {
            SummaryFormat::Paragraph
        }
    }
}

/// Raw segments that qualify as meaningful sentences. Segments keep their
/// surrounding whitespace; only the length check trims.
fn meaningful_sentences(transcript: &str) -> Vec<&str> {
    transcript
        .split(['.', '!', '?'])
        .filter(|s| s.trim().chars().count() > MEANINGFUL_SENTENCE_MIN_CHARS)
        .collect()
}

/// Selects the ordered key points (trimmed) from the raw segments.
/// Caller guarantees `sentences` is non-empty.
fn select_key_points<'a>(sentences: &[&'a str]) -> Vec<&'a str> {
    let count = sentences.len();
    let mut points: Vec<&str> = Vec::new();

    // First segment usually carries the main topic.
    points.push(sentences[0].trim());

    if count >= 5 {
        let mid1 = (count as f64 * 0.3).floor() as usize;
        let mid2 = (count as f64 * 0.6).floor() as usize;
        if sentences[mid1] != sentences[0] {
            points.push(sentences[mid1].trim());
        }
        if sentences[mid2] != sentences[mid1] {
            points.push(sentences[mid2].trim());
        }
    } else if count >= 4 {
        let mid = count / 2;
        if sentences[mid] != sentences[0] {
            points.push(sentences[mid].trim());
        }
    }

    // Last segment usually carries conclusions or actions.
    if count >= 2 {
        let last = sentences[count - 1].trim();
        if !last.is_empty() && last != sentences[0] {
            points.push(last);
        }
    }

    points
}

fn format_key_points(points: &[&str], format: SummaryFormat) -> String {
    match format {
        SummaryFormat::Bulleted => points
            .iter()
            .map(|p| format!("{BULLET_MARKER} {p}"))
            .collect::<Vec<_>>()
            .join("\n\n"),
        SummaryFormat::Executive => format!(
            "EXECUTIVE SUMMARY:\n\n{}",
            points
                .iter()
                .map(|p| format!("- {p}"))
                .collect::<Vec<_>>()
                .join("\n\n")
        ),
        SummaryFormat::ActionPoints => format!(
            "KEY POINTS:\n\n{}",
            points
                .iter()
                .map(|p| format!("* {p}"))
                .collect::<Vec<_>>()
                .join("\n\n")
        ),
        SummaryFormat::Paragraph => format!("{}.", points.join(".\n\n")),
    }
}

/// Summarizes a transcript. Pure and idempotent; a transcript with fewer
/// than 3 meaningful sentences is returned unchanged. Empty input is the
/// caller's validation concern, not this function's.
pub fn summarize(transcript: &str, instructions: &str) -> String {
    let sentences = meaningful_sentences(transcript);
    if sentences.len() < MIN_SENTENCES_TO_SUMMARIZE {
        return transcript.to_string();
    }
    let points = select_key_points(&sentences);
    tracing::debug!(key_points = points.len(), "heuristic summary built");
    format_key_points(&points, SummaryFormat::from_instructions(instructions))
}

/// Which summarization strategy the gateway runs. Heuristic is the default
/// and the only one exercised in normal operation; Remote exists for a
/// hosted-model deployment behind the same seam.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SummarizerMode {
    #[default]
    Heuristic,
    Remote,
}

impl SummarizerMode {
    /// Anything that is not exactly "remote" (case-insensitive) falls back
    /// to the heuristic.
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("remote") {
            SummarizerMode::Remote
        } else {
            SummarizerMode::Heuristic
        }
    }
}

/// Strategy seam for summarization. One concrete local implementation
/// ([`HeuristicSummarizer`]) plus a remote-model one, so callers never care
/// which is wired in.
#[async_trait::async_trait]
pub trait Summarizer: Send + Sync {
    /// Strategy name for logging.
    fn name(&self) -> &str;

    /// Produces the summary for a non-empty transcript.
    async fn summarize(&self, transcript: &str, instructions: &str) -> Result<String, CoreError>;
}

/// Local sentence-extraction strategy. Never fails.
pub struct HeuristicSummarizer;

#[async_trait::async_trait]
impl Summarizer for HeuristicSummarizer {
    fn name(&self) -> &str {
        "heuristic"
    }

    async fn summarize(&self, transcript: &str, instructions: &str) -> Result<String, CoreError> {
        Ok(summarize(transcript, instructions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEETING: &str = "Alice opened the meeting. We discussed the budget shortfall in detail today. Bob proposed a new vendor contract. The team agreed to revisit pricing next week. Action: Carol will send the updated proposal by Friday.";

    #[test]
    fn short_transcript_returned_unchanged() {
        let t = "Too short. Tiny note. Ok.";
        assert_eq!(summarize(t, ""), t);
    }

    #[test]
    fn whitespace_padding_does_not_make_a_sentence_meaningful() {
        // Trimmed length is what counts, not the raw segment length.
        let t = "hi.                                     hello there. bye.";
        assert_eq!(summarize(t, ""), t);
    }

    #[test]
    fn five_sentences_join_first_middles_and_last() {
        // 5 qualifying sentences: indices 0, floor(1.5)=1, floor(3.0)=3, 4.
        let expected = "Alice opened the meeting.\n\nWe discussed the budget shortfall in detail today.\n\nThe team agreed to revisit pricing next week.\n\nAction: Carol will send the updated proposal by Friday.";
        assert_eq!(summarize(MEETING, ""), expected);
    }

    #[test]
    fn five_or_more_sentences_yield_three_to_four_distinct_points() {
        let sentences = meaningful_sentences(MEETING);
        assert_eq!(sentences.len(), 5);
        let points = select_key_points(&sentences);
        assert!(points.len() >= 3 && points.len() <= 4);
        assert_eq!(points[0], "Alice opened the meeting");
        assert_eq!(
            *points.last().unwrap(),
            "Action: Carol will send the updated proposal by Friday"
        );
        let mut deduped = points.clone();
        deduped.dedup();
        assert_eq!(deduped.len(), points.len());
    }

    #[test]
    fn four_sentences_include_the_middle_pick() {
        let t = "First sentence of the call. Second item on the agenda list. Third item about the roadmap. Final decision was postponed again.";
        let sentences = meaningful_sentences(t);
        assert_eq!(sentences.len(), 4);
        let points = select_key_points(&sentences);
        assert_eq!(
            points,
            vec![
                "First sentence of the call",
                "Third item about the roadmap",
                "Final decision was postponed again",
            ]
        );
    }

    #[test]
    fn three_sentences_keep_first_and_last() {
        let t = "Kickoff happened this morning. Middle section went long today. Wrap-up notes were circulated.";
        let sentences = meaningful_sentences(t);
        assert_eq!(sentences.len(), 3);
        let points = select_key_points(&sentences);
        assert_eq!(
            points,
            vec!["Kickoff happened this morning", "Wrap-up notes were circulated"]
        );
    }

    #[test]
    fn bullet_instruction_prefixes_every_point() {
        let out = summarize(MEETING, "please use BULLET points");
        assert!(!out.is_empty());
        for line in out.split("\n\n") {
            assert!(line.starts_with("\u{2022} "), "unexpected line: {line:?}");
        }
    }

    #[test]
    fn executive_instruction_adds_header() {
        let out = summarize(MEETING, "an Executive overview");
        assert!(out.starts_with("EXECUTIVE SUMMARY:\n\n- "));
    }

    #[test]
    fn action_instruction_adds_key_points_header() {
        let out = summarize(MEETING, "list the action items");
        assert!(out.starts_with("KEY POINTS:\n\n* "));
    }

    #[test]
    fn keyword_precedence_is_bullet_then_executive_then_action() {
        let bullets = summarize(MEETING, "bullet executive action");
        assert!(bullets.starts_with("\u{2022} "));
        let executive = summarize(MEETING, "executive action");
        assert!(executive.starts_with("EXECUTIVE SUMMARY:"));
    }

    #[test]
    fn summarize_is_idempotent() {
        assert_eq!(summarize(MEETING, "bullet"), summarize(MEETING, "bullet"));
        assert_eq!(summarize(MEETING, ""), summarize(MEETING, ""));
    }

    #[test]
    fn exclamation_and_question_marks_delimit_sentences() {
        let t = "What a productive meeting this was! Should we ship the feature next sprint? Everyone agreed to the plan today.";
        let sentences = meaningful_sentences(t);
        assert_eq!(sentences.len(), 3);
    }

    #[test]
    fn format_parse_defaults_to_paragraph() {
        assert_eq!(SummaryFormat::from_instructions(""), SummaryFormat::Paragraph);
        assert_eq!(
            SummaryFormat::from_instructions("keep it brief"),
            SummaryFormat::Paragraph
        );
        assert_eq!(
            SummaryFormat::from_instructions("BULLETED list"),
            SummaryFormat::Bulleted
        );
    }

    #[test]
    fn mode_parse_only_recognizes_remote() {
        assert_eq!(SummarizerMode::parse("remote"), SummarizerMode::Remote);
        assert_eq!(SummarizerMode::parse(" REMOTE "), SummarizerMode::Remote);
        assert_eq!(SummarizerMode::parse("heuristic"), SummarizerMode::Heuristic);
        assert_eq!(SummarizerMode::parse("anything"), SummarizerMode::Heuristic);
    }

    #[tokio::test]
    async fn heuristic_strategy_wraps_the_pure_function() {
        let s = HeuristicSummarizer;
        let out = s.summarize(MEETING, "").await.unwrap();
        assert_eq!(out, summarize(MEETING, ""));
        assert_eq!(s.name(), "heuristic");
    }
}
