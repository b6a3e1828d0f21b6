use base64::{Engine as _, engine::general_purpose};

/// Encodes a parser (`cbn`) or extension (`cbnSnippet`) blob with standard padded base64.
///
/// Empty input yields an empty string.
#[inline]
pub fn encode_blob(raw: impl AsRef<[u8]>) -> String {
    general_purpose::STANDARD.encode(raw.as_ref())
}

/// Encodes sample log lines for a parser dry-run.
///
/// Empty lines are dropped rather than encoded, so the output can be shorter
/// than the input. Relative order of the remaining lines is kept.
pub fn encode_logs<I, S>(logs: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    logs.into_iter()
        .filter(|log| !log.as_ref().is_empty())
        .map(|log| general_purpose::STANDARD.encode(log.as_ref()))
        .collect()
}
