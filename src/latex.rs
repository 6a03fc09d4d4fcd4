//! Display-math cleanup for generated replies
//!
//! Local models frequently emit bare LaTeX that markdown renderers show
//! as plain text. This module wraps the two most common shapes in
//! `$$ ... $$` display-math delimiters:
//!
//! 1. `f(x) = <expression>` up to the end of the line or a period
//! 2. `\begin{cases} ... \end{cases}` blocks, including multi-line ones
//!
//! Both rewrites are unconditional textual substitutions. Applying
//! [`fix_latex`] to already-wrapped text double-wraps it, so it must
//! run exactly once per reply.

use regex::Regex;
use std::sync::OnceLock;

static FX_EQUATION: OnceLock<Regex> = OnceLock::new();
static CASES_BLOCK: OnceLock<Regex> = OnceLock::new();

fn fx_equation() -> &'static Regex {
    FX_EQUATION.get_or_init(|| Regex::new(r"(f\(x\)\s*=\s*[^.\n]+)").unwrap())
}

fn cases_block() -> &'static Regex {
    CASES_BLOCK.get_or_init(|| Regex::new(r"(?s)(\\begin\{cases\}.*?\\end\{cases\})").unwrap())
}

/// Wrap recognized math notation in display-math delimiters
///
/// # Examples
///
/// ```
/// use companion::latex::fix_latex;
///
/// assert_eq!(fix_latex("f(x) = x^2 + 1."), "$$f(x) = x^2 + 1$$.");
/// ```
pub fn fix_latex(text: &str) -> String {
    let text = fx_equation().replace_all(text, "$$$$${1}$$$$");
    let text = cases_block().replace_all(&text, "$$$$${1}$$$$");
    text.into_owned()
}
