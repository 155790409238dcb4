/// Typographic characters the question bank is known to carry, with their
/// ASCII replacements.
const REPLACEMENTS: &[(char, &str)] = &[
    ('\u{2010}', "-"),
    ('\u{2011}', "-"),
    ('\u{2012}', "-"),
    ('\u{2013}', "-"),
    ('\u{2014}', "-"),
    ('\u{2212}', "-"),
    ('\u{00ad}', "-"),
    ('\u{2026}', "..."),
    ('\u{201c}', "\""),
    ('\u{201d}', "\""),
    ('\u{2019}', "'"),
    ('\u{00a0}', " "),
    ('\u{2009}', " "),
    ('\u{202f}', " "),
];

/// Maps typographic characters to ASCII-safe equivalents and collapses all
/// whitespace runs to single spaces.
pub fn sanitize(s: &str) -> String {
    let mut mapped = String::with_capacity(s.len());
    for c in s.chars() {
        match REPLACEMENTS.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => mapped.push_str(to),
            None => mapped.push(c),
        }
    }
    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn sanitize_all(items: &[String]) -> Vec<String> {
    items.iter().map(|s| sanitize(s)).collect()
}
