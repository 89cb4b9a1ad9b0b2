//! Markdown rendering with syntax-highlighted code blocks.
//!
//! Two steps:
//! 1. pulldown-cmark turns the body into HTML, escaping code block contents
//! 2. every `<pre><code>` block is unescaped, highlighted with syntect, and
//!    written back as `<pre class="chroma language-X"><code>…</code></pre>`
//!
//! Highlighting never fails a render. A block that cannot be highlighted is
//! emitted escaped and unstyled. Whitespace inside code, tabs included, is
//! kept exactly as written.

use pulldown_cmark::{Options, Parser, html};
use regex::{Captures, Regex};
use syntect::{
    easy::HighlightLines,
    highlighting::{Theme, ThemeSet},
    html::{IncludeBackground, styled_line_to_highlighted_html},
    parsing::{SyntaxReference, SyntaxSet},
    util::LinesWithEndings,
};
use tracing::{debug, warn};

use quire_core::{
    application::ports::MarkdownRenderer,
    error::{Context, QuireResult},
};

/// Theme used when none is configured or the configured one is unknown.
pub const DEFAULT_THEME: &str = "base16-ocean.dark";

const CODE_BLOCK: &str = r#"<pre><code(?:\s+class="language-([^"]+)")?>([\s\S]*?)</code></pre>"#;

/// [`MarkdownRenderer`] using pulldown-cmark and syntect.
pub struct HighlightingRenderer {
    code_block: Regex,
    syntaxes: SyntaxSet,
    theme: Theme,
}

impl HighlightingRenderer {
    /// Load the bundled syntaxes and the named color theme.
    pub fn new(theme_name: &str) -> QuireResult<Self> {
        let code_block = Regex::new(CODE_BLOCK).context("compiling code block pattern")?;
        let mut themes = ThemeSet::load_defaults();

        let theme = match themes.themes.remove(theme_name) {
            Some(theme) => theme,
            None => {
                warn!(theme = theme_name, fallback = DEFAULT_THEME, "unknown highlight theme");
                themes.themes.remove(DEFAULT_THEME).unwrap_or_default()
            }
        };

        Ok(Self {
            code_block,
            syntaxes: SyntaxSet::load_defaults_newlines(),
            theme,
        })
    }

    /// Replace every code block in rendered HTML with a highlighted one.
    fn highlight_blocks(&self, html: &str) -> String {
        self.code_block
            .replace_all(html, |caps: &Captures| {
                let language = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
                let code = unescape_html(caps.get(2).map(|m| m.as_str()).unwrap_or_default());
                self.highlight(&code, language)
            })
            .into_owned()
    }

    fn highlight(&self, code: &str, language: &str) -> String {
        if code.is_empty() {
            return "<pre><code></code></pre>".to_string();
        }

        let syntax = self.syntax_for(code, language);
        match self.highlight_lines(code, syntax) {
            Ok(formatted) => {
                let class = if language.is_empty() {
                    String::new()
                } else {
                    format!(" language-{language}")
                };
                format!("<pre class=\"chroma{class}\"><code>{formatted}</code></pre>")
            }
            Err(e) => {
                debug!(language, error = %e, "highlighting failed, emitting plain block");
                plain_block(code, language)
            }
        }
    }

    /// Language hint first, then the first line (shebangs, `<?php`, ...),
    /// then plain text.
    fn syntax_for(&self, code: &str, language: &str) -> &SyntaxReference {
        let by_hint = (!language.is_empty())
            .then(|| self.syntaxes.find_syntax_by_token(language))
            .flatten();

        by_hint
            .or_else(|| {
                let first_line = code.lines().next().unwrap_or_default();
                self.syntaxes.find_syntax_by_first_line(first_line)
            })
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text())
    }

    fn highlight_lines(&self, code: &str, syntax: &SyntaxReference) -> Result<String, syntect::Error> {
        let mut highlighter = HighlightLines::new(syntax, &self.theme);
        let mut out = String::with_capacity(code.len() * 2);

        for line in LinesWithEndings::from(code) {
            let regions = highlighter.highlight_line(line, &self.syntaxes)?;
            out.push_str(&styled_line_to_highlighted_html(&regions, IncludeBackground::No)?);
        }

        Ok(out)
    }
}

impl MarkdownRenderer for HighlightingRenderer {
    fn render(&self, markdown: &str) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_TASKLISTS);

        let parser = Parser::new_ext(markdown, options);
        let mut body = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut body, parser);

        self.highlight_blocks(&body)
    }
}

fn plain_block(code: &str, language: &str) -> String {
    let class = if language.is_empty() {
        String::new()
    } else {
        format!(" class=\"language-{language}\"")
    };
    format!("<pre><code{class}>{}</code></pre>", escape_html(code))
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Undo the entity escaping pulldown-cmark applies to code text.
/// `&amp;` goes last so `&amp;lt;` stays `&lt;`.
fn unescape_html(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
