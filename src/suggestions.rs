//! # Error Suggestions
//!
//! Helpers for turning errors into messages that say what went wrong AND how
//! to fix it.

use std::path::Path;

/// Generate an error for when an explicitly requested configuration file is
/// missing.
pub fn config_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Configuration file not found: {path}\n\n\
         hint: Create a .devroute file in your home directory\n\
         hint: Use -c/--config to specify a different path\n\
         hint: Set the DEVROUTE_CONFIG environment variable",
        path = path.display()
    )
}

/// Build the "did you mean" hint for an unknown directory name.
///
/// Returns `None` when no declared directory is close enough to suggest, or
/// a hint listing how to declare it when nothing is declared at all.
pub fn unknown_directory_hint(name: &str, declared: &[&str]) -> Option<String> {
    if declared.is_empty() {
        return Some(format!(
            "Declare it first with '+{} <path>' before referring to it",
            name
        ));
    }
    find_similar(name, declared).map(|similar| format!("Did you mean '{}'?", similar))
}

/// Find a similar string from a list of candidates using edit distance.
///
/// Returns Some(candidate) if a close match is found (edit distance <= 2).
fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = edit_distance(input, candidate);
            if distance <= 2 && distance < input.len() {
                Some((candidate, distance))
            } else {
                None
            }
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Calculate the Levenshtein edit distance between two strings.
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    // single-row dynamic programming
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut current = vec![i + 1; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        previous = current;
    }
    previous[b.len()]
}
