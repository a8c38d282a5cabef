//! Path-component sanitization.

/// Makes `name` safe to use as a single path component.
///
/// Replaces NUL, `/`, `\` and control characters with `_` and truncates to
/// 255 bytes (Linux NAME_MAX). Everything else, spaces included, is kept so
/// the local name stays recognisable.
pub fn sanitize_path_component(name: &str) -> String {
    const NAME_MAX: usize = 255;

    let out: String = name
        .chars()
        .map(|c| {
            if c == '\0' || c == '/' || c == '\\' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    if out.len() > NAME_MAX {
        let mut take = NAME_MAX;
        while take > 0 && !out.is_char_boundary(take) {
            take -= 1;
        }
        out[..take].to_string()
    } else {
        out
    }
}
