//! Pure template resolution: placeholder substitution and conditional
//! block inclusion driven by a [`ResponseSet`].
//!
//! Two marker kinds are recognized:
//!
//! - `{{KEY}}` — replaced verbatim by the response value for the
//!   lowercase form of `KEY`.
//! - `{{#if_<category>_<option>}}...{{/if_<category>_<option>}}` — the
//!   content is kept iff the response recorded for `<category>` equals
//!   `<option>` (case-insensitively); otherwise the whole block is
//!   dropped.
//!
//! Malformed or unmatched markers are left in place untouched; the
//! resolver never fails.

use crate::responses::ResponseSet;

const OPEN_PREFIX: &str = "{{#if_";
const CLOSE_PREFIX: &str = "{{/if_";
const MARKER_END: &str = "}}";

/// Resolves a template against a response set.
///
/// Placeholder substitution runs first, over the original template, so
/// conditional marker names are never themselves subject to
/// substitution. Conditional blocks are then resolved on the
/// substituted text. The function is pure and total: any input yields
/// an output, with unrecognized markers passed through verbatim.
#[must_use]
pub fn resolve(template: &str, responses: &ResponseSet) -> String {
    let substituted = substitute_placeholders(template, responses);
    resolve_conditionals(&substituted, responses)
}

/// Replaces every `{{UPPER(key)}}` marker with its response value.
///
/// Values are inserted verbatim: no escaping, and correctly-formed
/// input never contains another key's marker inside a value.
fn substitute_placeholders(template: &str, responses: &ResponseSet) -> String {
    let mut result = template.to_string();

    for (key, value) in responses.iter() {
        let marker = format!("{{{{{}}}}}", key.to_uppercase());
        if result.contains(&marker) {
            result = result.replace(&marker, value);
        }
    }

    result
}

/// Resolves conditional blocks by scanning for open markers and pairing
/// each with its matching close marker.
///
/// Included content is resolved recursively, so arbitrarily nested
/// blocks settle in a single pass. An opener with no matching close
/// marker is emitted literally and scanning continues inside it, which
/// leaves mismatched pairs intact while still resolving any well-formed
/// blocks that follow.
fn resolve_conditionals(input: &str, responses: &ResponseSet) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(open_at) = rest.find(OPEN_PREFIX) {
        let after_prefix = &rest[open_at + OPEN_PREFIX.len()..];

        let Some(cond_end) = after_prefix.find(MARKER_END) else {
            // Opener never closed with `}}`: literal text from here on.
            out.push_str(rest);
            return out;
        };

        let condition = &after_prefix[..cond_end];
        if condition.is_empty() || condition.contains('}') || condition.contains("{{") {
            // Not a well-formed condition; keep the prefix as literal
            // text and keep scanning after it.
            let skip = open_at + OPEN_PREFIX.len();
            out.push_str(&rest[..skip]);
            rest = &rest[skip..];
            continue;
        }

        let body_start = open_at + OPEN_PREFIX.len() + cond_end + MARKER_END.len();

        match find_matching_close(&rest[body_start..], condition) {
            Some((content_len, close_len)) => {
                out.push_str(&rest[..open_at]);

                let content = &rest[body_start..body_start + content_len];
                if condition_met(condition, responses) {
                    out.push_str(&resolve_conditionals(content, responses));
                }

                rest = &rest[body_start + content_len + close_len..];
            }
            None => {
                // Unmatched opener stays in the output; its interior is
                // still scanned for resolvable blocks.
                out.push_str(&rest[..body_start]);
                rest = &rest[body_start..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Finds the close marker paired with an already-consumed opener.
///
/// Openers for the same condition nested inside the content are tracked
/// so that a block is paired with its own close marker, not the close
/// marker of an inner block. Returns the content length and the close
/// marker length, or `None` if the block is never closed.
fn find_matching_close(input: &str, condition: &str) -> Option<(usize, usize)> {
    let open = format!("{OPEN_PREFIX}{condition}{MARKER_END}");
    let close = format!("{CLOSE_PREFIX}{condition}{MARKER_END}");

    let mut depth = 0usize;
    let mut pos = 0usize;

    loop {
        let close_at = input[pos..].find(&close)? + pos;
        let open_at = input[pos..].find(&open).map(|i| i + pos);

        match open_at {
            Some(o) if o < close_at => {
                depth += 1;
                pos = o + open.len();
            }
            _ if depth > 0 => {
                depth -= 1;
                pos = close_at + close.len();
            }
            _ => return Some((close_at, close.len())),
        }
    }
}

/// Decides whether a conditional block's content is included.
///
/// The condition splits on its last underscore: the final segment is
/// the expected option, everything before it is the category key. A
/// condition with no underscore has no derivable category and is never
/// included.
fn condition_met(condition: &str, responses: &ResponseSet) -> bool {
    let Some((category, option)) = condition.rsplit_once('_') else {
        return false;
    };
    if category.is_empty() {
        return false;
    }

    responses
        .get(category)
        .is_some_and(|value| value.eq_ignore_ascii_case(option))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn responses(pairs: &[(&str, &str)]) -> ResponseSet {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_plain_text_unchanged() {
        let r = responses(&[("package_manager", "uv")]);
        let template = "# Instructions\n\nNo markers here.\n";
        assert_eq!(resolve(template, &r), template);
    }

    #[test]
    fn test_placeholder_substitution() {
        let r = responses(&[("code_formatter", "black")]);
        assert_eq!(resolve("Formatter: {{CODE_FORMATTER}}", &r), "Formatter: black");
    }

    #[test]
    fn test_all_known_markers_consumed() {
        let r = responses(&[("package_manager", "uv"), ("linter", "ruff")]);
        let output = resolve(
            "Install with {{PACKAGE_MANAGER}}; lint with {{LINTER}} and {{LINTER}}.",
            &r,
        );

        assert!(!output.contains("{{PACKAGE_MANAGER}}"));
        assert!(!output.contains("{{LINTER}}"));
        assert_eq!(output, "Install with uv; lint with ruff and ruff.");
    }

    #[test]
    fn test_unknown_placeholder_left_alone() {
        let r = responses(&[("linter", "ruff")]);
        let output = resolve("{{UNKNOWN_KEY}} and {{LINTER}}", &r);
        assert_eq!(output, "{{UNKNOWN_KEY}} and ruff");
    }

    #[test]
    fn test_conditional_inclusion() {
        let r = responses(&[("package_manager", "uv")]);
        let template = "{{#if_package_manager_uv}}Use uv.{{/if_package_manager_uv}}\
                        {{#if_package_manager_pip}}Use pip.{{/if_package_manager_pip}}";
        assert_eq!(resolve(template, &r), "Use uv.");
    }

    #[test]
    fn test_conditional_case_insensitive() {
        let r = responses(&[("package_manager", "UV")]);
        let template = "{{#if_package_manager_uv}}match{{/if_package_manager_uv}}";
        assert_eq!(resolve(template, &r), "match");
    }

    #[test]
    fn test_conditional_multiline_content() {
        let r = responses(&[("testing_framework", "pytest")]);
        let template =
            "{{#if_testing_framework_pytest}}\nRun pytest.\nUse fixtures.\n{{/if_testing_framework_pytest}}";
        assert_eq!(resolve(template, &r), "\nRun pytest.\nUse fixtures.\n");
    }

    #[test]
    fn test_condition_without_underscore_removed() {
        let r = responses(&[("x", "x")]);
        assert_eq!(resolve("{{#if_x}}text{{/if_x}}", &r), "");
    }

    #[test]
    fn test_unknown_category_removed() {
        let r = responses(&[("linter", "ruff")]);
        assert_eq!(
            resolve("before {{#if_type_checker_mypy}}mypy{{/if_type_checker_mypy}}after", &r),
            "before after"
        );
    }

    #[test]
    fn test_unmatched_open_marker_left_unresolved() {
        let r = responses(&[("linter", "ruff")]);
        let template = "{{#if_linter_ruff}}no closing marker";
        assert_eq!(resolve(template, &r), template);
    }

    #[test]
    fn test_mismatched_pair_left_unresolved() {
        let r = responses(&[("linter", "ruff")]);
        let template = "{{#if_linter_ruff}}body{{/if_linter_flake8}}";
        assert_eq!(resolve(template, &r), template);
    }

    #[test]
    fn test_dangling_close_marker_left_unresolved() {
        let r = responses(&[("linter", "ruff")]);
        let template = "text {{/if_linter_ruff}} more";
        assert_eq!(resolve(template, &r), template);
    }

    #[test]
    fn test_blocks_after_unmatched_opener_still_resolve() {
        let r = responses(&[("linter", "ruff")]);
        let template = "{{#if_linter_broken {{#if_linter_ruff}}ok{{/if_linter_ruff}}";
        assert_eq!(resolve(template, &r), "{{#if_linter_broken ok");
    }

    #[test]
    fn test_nested_conditionals_both_true() {
        let r = responses(&[("package_manager", "uv"), ("type_checker", "mypy")]);
        let template = "{{#if_package_manager_uv}}uv({{#if_type_checker_mypy}}mypy{{/if_type_checker_mypy}}){{/if_package_manager_uv}}";
        assert_eq!(resolve(template, &r), "uv(mypy)");
    }

    #[test]
    fn test_nested_conditional_outer_false_drops_inner() {
        let r = responses(&[("package_manager", "pip"), ("type_checker", "mypy")]);
        let template = "{{#if_package_manager_uv}}uv({{#if_type_checker_mypy}}mypy{{/if_type_checker_mypy}}){{/if_package_manager_uv}}kept";
        assert_eq!(resolve(template, &r), "kept");
    }

    #[test]
    fn test_nested_conditional_inner_false() {
        let r = responses(&[("package_manager", "uv"), ("type_checker", "none")]);
        let template = "{{#if_package_manager_uv}}uv({{#if_type_checker_mypy}}mypy{{/if_type_checker_mypy}}){{/if_package_manager_uv}}";
        assert_eq!(resolve(template, &r), "uv()");
    }

    #[test]
    fn test_substitution_happens_before_conditionals() {
        let r = responses(&[("package_manager", "uv")]);
        let template = "{{#if_package_manager_uv}}Manager: {{PACKAGE_MANAGER}}{{/if_package_manager_uv}}";
        assert_eq!(resolve(template, &r), "Manager: uv");
    }

    #[test]
    fn test_idempotence() {
        let r = responses(&[
            ("package_manager", "uv"),
            ("linter", "ruff"),
            ("type_checker", "none"),
        ]);
        let template = "Use {{PACKAGE_MANAGER}}.\n\
            {{#if_linter_ruff}}Lint with ruff.{{/if_linter_ruff}}\n\
            {{#if_type_checker_mypy}}Check with mypy.{{/if_type_checker_mypy}}\n\
            {{#if_broken}}orphan{{/if_other}}";

        let once = resolve(template, &r);
        let twice = resolve(&once, &r);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_template() {
        let r = responses(&[("linter", "ruff")]);
        assert_eq!(resolve("", &r), "");
    }

    #[test]
    fn test_empty_condition_left_unresolved() {
        let r = ResponseSet::new();
        let template = "{{#if_}}body{{/if_}}";
        assert_eq!(resolve(template, &r), template);
    }

    #[test]
    fn test_multi_underscore_category() {
        let r = responses(&[("code_formatter", "ruff_format")]);
        // Last underscore splits the condition: category is
        // "code_formatter_ruff", option is "format" -- no such category,
        // so the block is removed. Matches original split semantics.
        let template = "{{#if_code_formatter_ruff_format}}x{{/if_code_formatter_ruff_format}}";
        assert_eq!(resolve(template, &r), "");

        // Single-token options resolve as expected.
        let r = responses(&[("code_formatter", "black")]);
        let template = "{{#if_code_formatter_black}}black{{/if_code_formatter_black}}";
        assert_eq!(resolve(template, &r), "black");
    }
}
