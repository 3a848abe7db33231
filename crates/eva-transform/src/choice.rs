//! Matching filtered values against a choice table.
//!
//! Labels are compared after lowercasing and removing trailing periods. A value
//! that matches no label becomes [`OTHER_CODE`] when the table accepts it, with
//! the original text returned for the companion `<field>_other` attribute.

use eva_model::{ChoiceTable, OTHER_CODE};

use crate::filter::{FilteredValues, join_sentences};

/// Result of a single-choice match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceMatch {
    pub code: String,
    pub other: Option<String>,
}

/// Result of a multiple-choice match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiChoiceMatch {
    pub codes: Vec<String>,
    pub other: Option<String>,
}

/// Resolve the modal value to one code.
///
/// Returns `None` when nothing matched and the table has no OTHER fallback.
pub fn resolve_single_choice(values: &FilteredValues, table: &ChoiceTable) -> Option<ChoiceMatch> {
    let modal = values.modal()?;
    if let Some(code) = table.lookup(modal) {
        return Some(ChoiceMatch {
            code: code.to_string(),
            other: None,
        });
    }
    if !table.supports_other {
        tracing::debug!(table = %table.name, value = modal, "no matching choice");
        return None;
    }
    Some(ChoiceMatch {
        code: OTHER_CODE.to_string(),
        other: join_sentences(values.distinct().iter().map(String::as_str)),
    })
}

/// Resolve every distinct value, collecting all matched codes in first-seen order.
///
/// Aliases of one code (`DfT` and `Department for Transport`) yield that code once.
/// Returns `None` when no code was collected.
pub fn resolve_multiple_choice(
    values: &FilteredValues,
    table: &ChoiceTable,
) -> Option<MultiChoiceMatch> {
    let mut codes: Vec<String> = Vec::new();
    let mut unmatched: Vec<&str> = Vec::new();
    for value in values.distinct() {
        match table.lookup(value) {
            Some(code) => {
                if !codes.iter().any(|seen| seen == code) {
                    codes.push(code.to_string());
                }
            }
            None => unmatched.push(value),
        }
    }

    let mut other = None;
    if !unmatched.is_empty() {
        if table.supports_other {
            if !codes.iter().any(|code| code == OTHER_CODE) {
                codes.push(OTHER_CODE.to_string());
            }
            other = join_sentences(unmatched);
        } else {
            tracing::debug!(table = %table.name, unmatched = unmatched.len(), "values without a matching choice");
        }
    }

    if codes.is_empty() {
        return None;
    }
    Some(MultiChoiceMatch { codes, other })
}

#[cfg(test)]
mod tests {
    use crate::filter::ValueFilter;

    use super::*;

    fn measure_type() -> ChoiceTable {
        ChoiceTable::new("measure_type", true)
            .with("Binary", "BINARY")
            .with("Continuous", "CONTINUOUS")
    }

    fn organisation() -> ChoiceTable {
        ChoiceTable::new("organisation", false)
            .with("Department for Transport", "department-for-transport")
            .with("DfT", "department-for-transport")
            .with("Home Office", "home-office")
    }

    fn values(raw: &[&str]) -> FilteredValues {
        ValueFilter::default().filter(raw.iter().copied())
    }

    #[test]
    fn single_choice_matches_label() {
        let matched = resolve_single_choice(&values(&["continuous."]), &measure_type()).unwrap();
        assert_eq!(matched.code, "CONTINUOUS");
        assert_eq!(matched.other, None);
    }

    #[test]
    fn single_choice_falls_back_to_other() {
        let matched =
            resolve_single_choice(&values(&["Some Weird Label"]), &measure_type()).unwrap();
        assert_eq!(
            matched,
            ChoiceMatch {
                code: "OTHER".to_string(),
                other: Some("Some Weird Label.".to_string()),
            }
        );
    }

    #[test]
    fn single_choice_without_other_leaves_field_unset() {
        assert!(resolve_single_choice(&values(&["Treasury"]), &organisation()).is_none());
        assert!(resolve_single_choice(&values(&[]), &measure_type()).is_none());
    }

    #[test]
    fn multiple_choice_collects_every_match() {
        let matched = resolve_multiple_choice(
            &values(&["Home Office", "DfT", "Department for Transport", "Treasury"]),
            &organisation(),
        )
        .unwrap();
        assert_eq!(matched.codes, vec!["home-office", "department-for-transport"]);
        assert_eq!(matched.other, None);
    }

    #[test]
    fn multiple_choice_adds_other_for_unmatched() {
        let matched =
            resolve_multiple_choice(&values(&["Binary", "Survey", "Diary."]), &measure_type())
                .unwrap();
        assert_eq!(matched.codes, vec!["BINARY", "OTHER"]);
        assert_eq!(matched.other.as_deref(), Some("Diary. Survey."));
    }
}
