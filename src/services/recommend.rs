/// Builds the recommendation prompt from one library's watch history
///
/// The comma-separated-list instruction is what `parse_titles` relies on;
/// the model is steered away from numbered lists because numbering survives
/// a comma split and pollutes the search queries.
pub fn build_prompt(watched: &[String], count: u32) -> String {
    let mut query =
        String::from("Can you give me movie recommendations based on what I've watched? ");
    query.push_str(&format!("I've watched {}. ", watched.join(", ")));
    query.push_str("Can you base your recommendations solely on what I've watched already. ");
    query.push_str(&format!("I need around {}. ", count));
    query.push_str("Please give me the comma separated list, not a numbered list.");
    query
}

/// Splits a completion into candidate titles
///
/// Trusts the prompt's formatting instruction: segments are split on
/// commas, trimmed, and empty segments dropped. A malformed response
/// degrades to wherever the split happens to fall; this never errors.
pub fn parse_titles(response: &str) -> Vec<String> {
    response
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}
