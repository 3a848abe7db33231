//! Evaluation fields computed from several columns rather than mapped 1:1.

use eva_ingest::RowSet;
use eva_model::{Evaluation, OTHER_CODE, RecordKind};
use tracing::debug;

use crate::filter::join_sentences;
use crate::numeric::{is_negative_token, is_positive_token, parse_i64};
use crate::resolve::{ApplyStats, FieldResolver, assign_field};

/// Yes/no columns voting for each evaluation type, with the type code.
pub const EVALUATION_TYPE_COLUMNS: [(&str, &str); 3] = [
    ("Process", "PROCESS"),
    ("Impact", "IMPACT"),
    ("Economic", "ECONOMIC"),
];
pub const OTHER_TYPE_COLUMN: &str = "Other evaluation type (please state)";
pub const OTHER_TYPE_PLACEHOLDER: &str = "Other evaluation type (not stated)";

pub const ISSUE_COLUMN: &str = "Issue to be addressed";
pub const ETHICS_COLUMN: &str = "Ethics approval applied for";

const SAMPLE_SIZE_FIELD: &str = "sample_size";

const YES: &str = "YES";
const NO: &str = "NO";

/// Positive and negative votes in a column, plus values that were neither.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteCount {
    pub positive: usize,
    pub negative: usize,
    pub free_text: Vec<String>,
}

impl VoteCount {
    pub fn passes(&self) -> bool {
        self.positive > self.negative
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DerivedFieldComputer<'a> {
    resolver: FieldResolver<'a>,
}

impl<'a> DerivedFieldComputer<'a> {
    pub fn new(resolver: FieldResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Count yes/no votes over every filtered value of `header`.
    pub fn votes(&self, rows: &RowSet<'_>, header: &str) -> VoteCount {
        let values = self.resolver.values(rows, header);
        let mut count = VoteCount::default();
        for value in values.occurrences() {
            if is_positive_token(value) {
                count.positive += 1;
            } else if is_negative_token(value) {
                count.negative += 1;
            } else {
                count.free_text.push(value.clone());
            }
        }
        count
    }

    fn presence(&self, rows: &RowSet<'_>, header: &str) -> &'static str {
        if self.resolver.values(rows, header).is_empty() {
            NO
        } else {
            YES
        }
    }

    pub fn compute(&self, evaluation: &mut Evaluation, rows: &RowSet<'_>) -> ApplyStats {
        let mut stats = ApplyStats::default();

        let issue = self.presence(rows, ISSUE_COLUMN);
        assign_field(evaluation, "issue_description_option", issue.into(), &mut stats);
        let ethics = self.presence(rows, ETHICS_COLUMN);
        assign_field(evaluation, "ethics_option", ethics.into(), &mut stats);
        assign_field(evaluation, "grants_option", NO.into(), &mut stats);

        let mut types = Vec::new();
        for (header, code) in EVALUATION_TYPE_COLUMNS {
            let votes = self.votes(rows, header);
            debug!(
                column = header,
                positive = votes.positive,
                negative = votes.negative,
                "evaluation type votes"
            );
            if votes.passes() {
                types.push(code.to_string());
            }
        }
        let other = self.votes(rows, OTHER_TYPE_COLUMN);
        if other.passes() {
            types.push(OTHER_CODE.to_string());
            let text = join_sentences(other.free_text.iter().map(String::as_str))
                .unwrap_or_else(|| OTHER_TYPE_PLACEHOLDER.to_string());
            assign_field(evaluation, "evaluation_type_other", text.into(), &mut stats);
        }
        if !types.is_empty() {
            assign_field(evaluation, "evaluation_type", types.into(), &mut stats);
        }

        if let Some(details) = self.sample_size_details(rows) {
            assign_field(evaluation, "sample_size_details", details.into(), &mut stats);
        }

        stats
    }

    /// Non-numeric text found in the column feeding `sample_size`.
    fn sample_size_details(&self, rows: &RowSet<'_>) -> Option<String> {
        let mapping = self
            .resolver
            .schema()
            .mappings(RecordKind::Evaluation)
            .iter()
            .find(|mapping| mapping.target_field == SAMPLE_SIZE_FIELD)?;
        let values = self.resolver.values(rows, &mapping.source_header);
        join_sentences(
            values
                .distinct()
                .iter()
                .map(String::as_str)
                .filter(|value| parse_i64(value).is_none()),
        )
    }
}
