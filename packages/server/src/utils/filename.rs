/// Sanitize a client-supplied filename into a safe flat display name.
///
/// Path components are stripped, whitespace collapses to underscores, and only
/// ASCII alphanumerics plus `-`, `_`, `.` survive. Leading and trailing dots
/// and underscores are trimmed so the result never names a hidden file or a
/// traversal component. May return an empty string when nothing safe remains.
pub fn sanitize_filename(name: &str) -> String {
    // Only the last path component counts as the filename.
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let mut out = String::with_capacity(base.len());
    let mut last_was_space = false;
    for c in base.chars() {
        if c.is_whitespace() {
            if !last_was_space && !out.is_empty() {
                out.push('_');
            }
            last_was_space = true;
        } else if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
            out.push(c);
            last_was_space = false;
        } else {
            last_was_space = false;
        }
    }

    out.trim_matches(['.', '_']).to_string()
}
