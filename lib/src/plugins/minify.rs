//! Conservative CSS and script minification.
//!
//! These strip what is provably safe to strip (comments, redundant
//! whitespace) and leave the rest alone. String literals pass through
//! untouched, and script minification keeps line structure so automatic
//! semicolon insertion is never disturbed.

use crate::error::Result;
use crate::output::Output;
use crate::plugin::{Phase, Plugin};
use crate::util;

/// CSS minification for every stylesheet in the output tree.
pub struct MinifyCss;

impl Plugin for MinifyCss {
    fn name(&self) -> &'static str {
        "minify_css"
    }

    fn phase(&self) -> Phase {
        Phase::Packaging
    }

    fn process(&self, output: &mut Output) -> Result<()> {
        for file in output.files_mut() {
            if util::ext_is(&file.path, "css") {
                if let Some(text) = file.as_text_mut() {
                    *text = minify_css(text);
                }
            }
        }

        Ok(())
    }
}

/// Script minification for every script in the output tree.
pub struct MinifyJs;

impl Plugin for MinifyJs {
    fn name(&self) -> &'static str {
        "minify_javascript"
    }

    fn phase(&self) -> Phase {
        Phase::Packaging
    }

    fn process(&self, output: &mut Output) -> Result<()> {
        for file in output.files_mut() {
            if util::ext_is(&file.path, "js") {
                if let Some(text) = file.as_text_mut() {
                    *text = minify_js(text);
                }
            }
        }

        Ok(())
    }
}

/// Strips comments and collapses whitespace. A single space survives only
/// between tokens that need separating; spaces adjacent to punctuation
/// that already separates tokens are dropped.
pub fn minify_css(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }

                    prev = c;
                }
            }
            '"' | '\'' => {
                out.push(c);
                copy_string(&mut out, &mut chars, c);
            }
            c if c.is_whitespace() => {
                while chars.peek().map_or(false, |c| c.is_whitespace()) {
                    chars.next();
                }

                let prev = out.chars().last();
                let next = chars.peek().copied();
                if !css_boundary(prev) && !css_boundary(next) {
                    out.push(' ');
                }
            }
            c => out.push(c),
        }
    }

    out
}

fn css_boundary(c: Option<char>) -> bool {
    matches!(c, None | Some('{' | '}' | ':' | ';' | ',' | '>'))
}

/// Strips `//` and `/* */` comments outside string literals, drops
/// indentation and blank lines, and otherwise leaves every line as it was.
pub fn minify_js(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '/' if chars.peek() == Some(&'/') => {
                while chars.peek().map_or(false, |&c| c != '\n') {
                    chars.next();
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let (mut prev, mut multiline) = ('\0', false);
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }

                    multiline |= c == '\n';
                    prev = c;
                }

                // A spanned comment may be all that separated two
                // statements.
                if multiline {
                    trim_line_end(&mut out);
                    while chars.peek().map_or(false, |&c| c == ' ' || c == '\t') {
                        chars.next();
                    }

                    if !out.is_empty() && !out.ends_with('\n') {
                        out.push('\n');
                    }
                }
            }
            '"' | '\'' | '`' => {
                out.push(c);
                copy_string(&mut out, &mut chars, c);
            }
            '\n' => {
                trim_line_end(&mut out);
                while chars.peek().map_or(false, |&c| c == ' ' || c == '\t') {
                    chars.next();
                }

                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            c => out.push(c),
        }
    }

    while out.ends_with(char::is_whitespace) {
        out.pop();
    }

    out
}

fn trim_line_end(out: &mut String) {
    while out.ends_with(' ') || out.ends_with('\t') {
        out.pop();
    }
}

fn copy_string<I>(out: &mut String, chars: &mut I, quote: char)
    where I: Iterator<Item = char>
{
    let mut escaped = false;
    for c in chars.by_ref() {
        out.push(c);
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            break;
        }
    }
}

#[cfg(test)]
mod minify_tests {
    use super::{minify_css, minify_js};

    #[test]
    fn css_comments_and_whitespace_go() {
        let css = "/* header */\nbody {\n    color : red;\n}\n\na > b,\nc {}\n";
        assert_eq!(minify_css(css), "body{color:red;}a>b,c{}");
    }

    #[test]
    fn css_strings_survive() {
        let css = "a::before { content: \"  /* not a comment */  \"; }";
        let min = minify_css(css);
        assert!(min.contains("\"  /* not a comment */  \""));
    }

    #[test]
    fn css_descendant_selectors_keep_their_space() {
        assert_eq!(minify_css(".nav .item { x: y }"), ".nav .item{x:y}");
    }

    #[test]
    fn js_comments_go_but_lines_stay() {
        let js = "// setup\nlet a = 1 // trailing\n  let b = 2\n\n/* done */\n";
        assert_eq!(minify_js(js), "let a = 1\nlet b = 2");
    }

    #[test]
    fn js_strings_and_templates_survive() {
        let js = "let url = \"http://x// not a comment\"\nlet t = `a\n  b`";
        let min = minify_js(js);
        assert!(min.contains("http://x// not a comment"));
        assert!(min.contains("`a\n  b`"));
    }

    #[test]
    fn js_spanned_comment_keeps_statements_apart() {
        let js = "let a = 1 /*\n*/ let b = 2";
        assert_eq!(minify_js(js), "let a = 1\nlet b = 2");
    }
}
