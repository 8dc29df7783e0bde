/// Marker AngularJS forms append to the label of a required field.
pub const REQUIRED_MARKER: &str = " *";

/// Trim and collapse every run of whitespace into a single space.
///
/// Returns `None` when nothing but whitespace is left.
pub fn collapse_whitespace(raw: &str) -> Option<String> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// XPath `normalize-space()`: like [`collapse_whitespace`], but only space, tab,
/// CR and LF count as whitespace, so a no-break space survives.
pub fn collapse_xml_space(raw: &str) -> String {
    raw.split([' ', '\t', '\r', '\n'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Remove a trailing required-field marker (`" *"`), then any whitespace left behind.
pub fn strip_required_marker(label: &str) -> String {
    match label.strip_suffix(REQUIRED_MARKER) {
        Some(stripped) => stripped.trim_end().to_string(),
        None => label.to_string(),
    }
}

/// Full label normalization: collapse whitespace, then strip the required marker.
pub fn normalize_label(raw: &str) -> Option<String> {
    let collapsed = collapse_whitespace(raw)?;
    let stripped = strip_required_marker(&collapsed);

    if stripped.is_empty() { None } else { Some(stripped) }
}

/// Resolve the value of a content-inclusion attribute (`ng-include`).
///
/// The attribute holds an AngularJS expression, almost always a quoted template path such as
/// `'modules/cases/views/details.html'`. String literals, optionally joined with `+`, are
/// unquoted and unescaped. Any other expression is returned trimmed and untouched.
pub fn parse_include_source(raw: &str) -> String {
    let trimmed = raw.trim();
    parse_literal_concat(trimmed).unwrap_or_else(|| trimmed.to_string())
}

fn parse_literal_concat(expr: &str) -> Option<String> {
    let mut out = String::new();
    let mut chars = expr.chars().peekable();
    let mut expect_literal = true;

    loop {
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }

        match chars.next() {
            None => return if expect_literal { None } else { Some(out) },
            Some('+') if !expect_literal => expect_literal = true,
            Some(quote @ ('\'' | '"')) if expect_literal => {
                loop {
                    match chars.next()? {
                        '\\' => out.push(chars.next()?),
                        c if c == quote => break,
                        c => out.push(c),
                    }
                }
                expect_literal = false;
            }
            Some(_) => return None,
        }
    }
}
