use once_cell::sync::Lazy;
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use serde::{Deserialize, Serialize};
use syntect::html::{ClassedHTMLGenerator, ClassStyle};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);

static DEFAULT_SYNTAX: Lazy<&'static SyntaxReference>
    = Lazy::new(|| SYNTAX_SET.find_syntax_plain_text());

/// Starts loading the syntax definitions off-thread so the first highlighted
/// code block doesn't pay for it.
#[inline]
pub fn warm_up() {
    rayon::spawn(|| { Lazy::force(&SYNTAX_SET); });
}

/// The content-rendering engine: which markdown dialect pages are rendered
/// with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkdownEngine {
    /// Plain CommonMark.
    #[default]
    CommonMark,
    /// CommonMark plus tables, footnotes, strikethrough, and smart
    /// punctuation.
    Extended,
}

impl MarkdownEngine {
    fn options(self) -> Options {
        match self {
            MarkdownEngine::CommonMark => Options::empty(),
            MarkdownEngine::Extended => Options::ENABLE_TABLES
                | Options::ENABLE_FOOTNOTES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_SMART_PUNCTUATION,
        }
    }
}

/// Splits TOML front matter between `+++` fences off of `input`. Returns
/// `(front_matter, body)`; input without a leading fence is all body.
pub fn split_front_matter(input: &str) -> (Option<&str>, &str) {
    const PREFIX: &str = "+++\n";
    const SUFFIX: &str = "\n+++\n";

    let Some(rest) = input.strip_prefix(PREFIX) else {
        return (None, input);
    };

    match rest.split_once(SUFFIX) {
        Some((front_matter, body)) => (Some(front_matter), body),
        None => (None, input),
    }
}

/// Renders `input` to HTML with the selected engine, highlighting fenced
/// code blocks when `highlight` is set.
pub fn render(input: &str, engine: MarkdownEngine, highlight: bool) -> String {
    let parser = Parser::new_ext(input, engine.options());
    let mut html = String::with_capacity(input.len() * 3 / 2);
    match highlight {
        true => pulldown_cmark::html::push_html(&mut html, Highlighter::new(parser)),
        false => pulldown_cmark::html::push_html(&mut html, parser),
    }

    html
}

/// Replaces fenced code block events with pre-highlighted HTML, classed so a
/// stylesheet can theme it.
struct Highlighter<'a, I> {
    generator: Option<ClassedHTMLGenerator<'static>>,
    language: pulldown_cmark::CowStr<'a>,
    inner: I,
}

impl<'a, I: Iterator<Item = Event<'a>>> Highlighter<'a, I> {
    fn new(inner: I) -> Self {
        Highlighter { generator: None, language: "".into(), inner }
    }
}

impl<'a, I: Iterator<Item = Event<'a>>> Iterator for Highlighter<'a, I> {
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next()? {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(label))) => {
                    // Fence labels like `rust,ignore` carry the language
                    // before the first comma.
                    let language = label.split_once(',')
                        .map(|(prefix, _)| prefix.to_string().into())
                        .unwrap_or_else(|| label.clone());

                    let syntax = SYNTAX_SET.find_syntax_by_token(&language)
                        .unwrap_or_else(|| *DEFAULT_SYNTAX);

                    self.generator = Some(html_generator(syntax));
                    self.language = language;
                }
                Event::Text(text) if self.generator.is_some() => {
                    let generator = self.generator.as_mut().unwrap();
                    for line in LinesWithEndings::from(&text) {
                        let _ = generator.parse_html_for_line_which_includes_newline(line);
                    }
                }
                Event::End(TagEnd::CodeBlock) if self.generator.is_some() => {
                    let generator = self.generator.take().unwrap();
                    let html = code_block(&self.language, generator.finalize());
                    return Some(Event::Html(html.into()));
                }
                event => return Some(event),
            }
        }
    }
}

fn html_generator(syntax: &SyntaxReference) -> ClassedHTMLGenerator<'_> {
    ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAX_SET, ClassStyle::Spaced)
}

fn code_block(language: &str, code: String) -> String {
    match language.is_empty() {
        true => format!("<pre class=\"highlight\"><code>{code}</code></pre>"),
        false => format!(
            "<pre class=\"highlight\"><code class=\"language-{language}\">{code}</code></pre>"
        ),
    }
}

#[cfg(test)]
mod render_tests {
    use super::*;

    #[test]
    fn engines_differ_on_tables() {
        let table = "| a | b |\n|---|---|\n| 1 | 2 |\n";
        assert!(!render(table, MarkdownEngine::CommonMark, false).contains("<table>"));
        assert!(render(table, MarkdownEngine::Extended, false).contains("<table>"));
    }

    #[test]
    fn front_matter_is_split() {
        let input = "+++\ntitle = \"Intro\"\n+++\n# Hello\n";
        let (meta, body) = split_front_matter(input);
        assert_eq!(meta, Some("title = \"Intro\""));
        assert_eq!(body, "# Hello\n");
    }

    #[test]
    fn unterminated_front_matter_is_body() {
        let input = "+++\ntitle = \"Intro\"\n# Hello\n";
        let (meta, body) = split_front_matter(input);
        assert_eq!(meta, None);
        assert_eq!(body, input);
    }

    #[test]
    fn fenced_code_is_highlighted() {
        let input = "```rust\nfn main() {}\n```\n";
        let html = render(input, MarkdownEngine::Extended, true);
        assert!(html.contains("class=\"highlight\""));
        assert!(html.contains("language-rust"));

        let plain = render(input, MarkdownEngine::Extended, false);
        assert!(!plain.contains("class=\"highlight\""));
    }
}
