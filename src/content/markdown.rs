//! Markdown rendering with syntax highlighting

use lazy_static::lazy_static;
use pulldown_cmark::{
    html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, TextMergeStream,
};
use regex::Regex;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::config::{HighlightConfig, MarkdownConfig};
use crate::helpers::html_escape;

lazy_static! {
    static ref BARE_URL: Regex = Regex::new(r#"https?://[^\s<>"']+"#).unwrap();
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    markdown: MarkdownConfig,
    highlight: HighlightConfig,
}

impl MarkdownRenderer {
    /// Create a renderer with default options
    pub fn new() -> Self {
        Self::with_options(MarkdownConfig::default(), HighlightConfig::default())
    }

    /// Create with custom settings
    pub fn with_options(markdown: MarkdownConfig, highlight: HighlightConfig) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            markdown,
            highlight,
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        // Front-matter is stripped by FrontMatter::parse, so no metadata blocks here
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_GFM;
        let parser = TextMergeStream::new(Parser::new_ext(markdown, options));

        let mut events: Vec<Event> = Vec::new();
        let mut code_block: Option<Option<String>> = None;
        let mut code_content = String::new();
        let mut link_depth = 0usize;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(lang) if !lang.is_empty() => {
                            // Info strings like "rust,ignore" or "js title=x"
                            lang.split(|c: char| c == ',' || c.is_whitespace())
                                .next()
                                .map(str::to_string)
                        }
                        _ => None,
                    };
                    code_block = Some(lang);
                    code_content.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    let lang = code_block.take().flatten();
                    let html = self.highlight_code(&code_content, lang.as_deref());
                    events.push(Event::Html(CowStr::from(html)));
                }
                Event::Text(text) if code_block.is_some() => code_content.push_str(&text),
                Event::Start(Tag::Link { .. }) => {
                    link_depth += 1;
                    events.push(event);
                }
                Event::End(TagEnd::Link) => {
                    link_depth = link_depth.saturating_sub(1);
                    events.push(event);
                }
                Event::Text(text) if self.markdown.linkify && link_depth == 0 => {
                    linkify(text, &mut events);
                }
                Event::SoftBreak if self.markdown.breaks => events.push(Event::HardBreak),
                Event::Html(raw) | Event::InlineHtml(raw) if !self.markdown.html => {
                    events.push(Event::Text(raw));
                }
                _ => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");
        let plain = || {
            format!(
                r#"<pre class="language-{lang}"><code class="language-{lang}">{}</code></pre>"#,
                html_escape(code)
            )
        };

        if !self.highlight.enable {
            return plain();
        }

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let Some(theme) = self
            .theme_set
            .themes
            .get(&self.highlight.theme)
            .or_else(|| self.theme_set.themes.values().next())
        else {
            return plain();
        };

        match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
            Ok(highlighted) if self.highlight.line_number => {
                add_line_numbers(&highlighted, lang)
            }
            Ok(highlighted) => format!(
                r#"<figure class="highlight {}">{}</figure>"#,
                lang, highlighted
            ),
            Err(e) => {
                tracing::debug!("Highlighting failed for {}: {}", lang, e);
                plain()
            }
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a text event around bare URLs, emitting anchors for each URL
fn linkify<'a>(text: CowStr<'a>, events: &mut Vec<Event<'a>>) {
    let s: &str = &text;
    let mut last = 0;
    for m in BARE_URL.find_iter(s) {
        let url = m
            .as_str()
            .trim_end_matches(['.', ',', ';', ':', '!', '?', ')']);
        let end = m.start() + url.len();
        if m.start() > last {
            events.push(Event::Text(CowStr::from(s[last..m.start()].to_string())));
        }
        let escaped = html_escape(url);
        events.push(Event::InlineHtml(CowStr::from(format!(
            r#"<a href="{}">{}</a>"#,
            escaped, escaped
        ))));
        last = end;
    }

    if last == 0 {
        events.push(Event::Text(text));
    } else if last < s.len() {
        events.push(Event::Text(CowStr::from(s[last..].to_string())));
    }
}

/// Wrap highlighted code in a gutter table
fn add_line_numbers(code: &str, lang: &str) -> String {
    let lines: Vec<&str> = code.lines().collect();

    let gutter = (1..=lines.len())
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
        lang,
        gutter,
        lines.join("\n")
    )
}
