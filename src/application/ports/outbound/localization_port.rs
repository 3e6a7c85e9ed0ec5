/// Port for message templates keyed by dotted path
pub trait LocalizationPort: Send + Sync {
    /// Format the template at `key`, substituting `{name}` placeholders
    ///
    /// Unknown keys come back verbatim.
    fn format(&self, key: &str, params: &[(&str, &str)]) -> String;

    /// Every raw template in the phrase list at `key`
    fn phrase_list(&self, key: &str) -> Vec<String>;
}

/// Replace each `{name}` in `template` with its value
pub fn fill_placeholders(template: &str, params: &[(&str, &str)]) -> String {
    params
        .iter()
        .fold(template.to_string(), |text, (name, value)| {
            text.replace(&format!("{{{}}}", name), value)
        })
}
