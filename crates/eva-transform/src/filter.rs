//! Removal of empty and boilerplate values before resolution.

/// Phrases that mark a cell as carrying no information.
pub const DEFAULT_DENY_LIST: &[&str] = &[
    "Information not identified within the report",
    "Information not announced in the report",
    "Information not provided",
    "Not applicable",
    "N/A",
];

/// Drops values that are blank (ignoring trailing periods) or that contain a
/// deny-listed phrase, compared case-insensitively.
#[derive(Debug, Clone)]
pub struct ValueFilter {
    deny: Vec<String>,
}

impl Default for ValueFilter {
    fn default() -> Self {
        Self::new(DEFAULT_DENY_LIST.iter().copied())
    }
}

impl ValueFilter {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let deny = phrases
            .into_iter()
            .map(|phrase| phrase.as_ref().trim().to_lowercase())
            .filter(|phrase| !phrase.is_empty())
            .collect();
        Self { deny }
    }

    pub fn phrases(&self) -> &[String] {
        &self.deny
    }

    pub fn is_allowed(&self, value: &str) -> bool {
        if value.trim().trim_end_matches('.').trim().is_empty() {
            return false;
        }
        let lowered = value.to_lowercase();
        !self.deny.iter().any(|phrase| lowered.contains(phrase.as_str()))
    }

    pub fn filter<'a, I>(&self, raw: I) -> FilteredValues
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut filtered = FilteredValues::default();
        for value in raw {
            if self.is_allowed(value) {
                filtered.push(value.trim());
            }
        }
        filtered
    }
}

/// Values that survived filtering.
///
/// Keeps both the full multiset in encounter order (for modal selection and
/// vote counting) and the distinct values in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredValues {
    occurrences: Vec<String>,
    distinct: Vec<String>,
}

impl FilteredValues {
    fn push(&mut self, value: &str) {
        if !self.distinct.iter().any(|seen| seen == value) {
            self.distinct.push(value.to_string());
        }
        self.occurrences.push(value.to_string());
    }

    pub fn occurrences(&self) -> &[String] {
        &self.occurrences
    }

    pub fn distinct(&self) -> &[String] {
        &self.distinct
    }

    pub fn is_empty(&self) -> bool {
        self.distinct.is_empty()
    }

    /// The most frequent value; ties go to the value seen first.
    pub fn modal(&self) -> Option<&str> {
        let mut best: Option<(&str, usize)> = None;
        for value in &self.distinct {
            let count = self.occurrences.iter().filter(|v| *v == value).count();
            if best.is_none_or(|(_, top)| count > top) {
                best = Some((value.as_str(), count));
            }
        }
        best.map(|(value, _)| value)
    }
}

/// Join values as sentences: trailing periods stripped, duplicates and
/// blanks dropped, sorted, joined with `". "` and closed with one `"."`.
pub fn join_sentences<'a, I>(values: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut parts: Vec<&str> = values
        .into_iter()
        .map(|value| value.trim().trim_end_matches('.').trim_end())
        .filter(|value| !value.is_empty())
        .collect();
    parts.sort_unstable();
    parts.dedup();
    if parts.is_empty() {
        return None;
    }
    Some(format!("{}.", parts.join(". ")))
}
