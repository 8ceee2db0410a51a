//! Line helpers for cell sources stored as terminator-preserving lines.

/// Split text into lines, keeping each line's own terminator.
///
/// `\n` and `\r\n` both end a line; the final line keeps no terminator when the
/// text does not end with one. Empty input yields no lines.
pub fn split_lines_keeping_terminators(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(str::to_string).collect()
}

/// Concatenate stored lines back into one string.
pub fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let capacity = lines.iter().map(|line| line.as_ref().len()).sum();
    let mut out = String::with_capacity(capacity);
    for line in lines {
        out.push_str(line.as_ref());
    }
    out
}
