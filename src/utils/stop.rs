/// Truncate `text` at the earliest occurrence of any stop sequence.
///
/// Empty stop sequences are ignored. Text without a match is returned whole.
pub fn enforce_stop_sequences(text: &str, stop: &[String]) -> String {
    let cut = stop
        .iter()
        .filter(|s| !s.is_empty())
        .filter_map(|s| text.find(s.as_str()))
        .min();

    match cut {
        Some(idx) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
