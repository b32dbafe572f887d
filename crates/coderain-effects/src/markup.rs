//! Rendered output of the text effect.

use coderain_core::{Link, Result, Rgba, Wrappers};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

/// One frame of a text effect.
///
/// The same frame can be emitted as HTML, for web hosts, or as a ratatui
/// [`Line`] for the terminal.
#[derive(Debug, Clone, PartialEq)]
pub struct Markup {
    /// Decoration inserted before and after the text, verbatim.
    pub wrappers: Option<Wrappers>,
    pub link: Option<Link>,
    /// Characters already locked in.
    pub resolved: String,
    /// One scrambled glyph per unresolved character.
    pub pending: Vec<char>,
    pub pending_color: Rgba,
    /// Colour of `pending[0]`, when it should stand out.
    pub highlight: Option<Rgba>,
    /// Occupies space without being visible.
    pub hidden: bool,
}

impl Markup {
    /// Invisible copy of the finished text, used to give the container its
    /// final size before the effect starts.
    pub fn placeholder(message: &str, wrappers: Option<Wrappers>, link: Option<Link>) -> Self {
        Self {
            wrappers,
            link,
            resolved: message.to_string(),
            pending: Vec::new(),
            pending_color: Rgba::TRANSPARENT,
            highlight: None,
            hidden: true,
        }
    }

    /// Whether every character has resolved.
    pub fn is_resolved(&self) -> bool {
        self.pending.is_empty()
    }

    /// Text as displayed, decoration included.
    pub fn plain_text(&self) -> String {
        let (prefix, suffix) = self.wrapper_parts();
        let mut text = String::from(prefix);
        text.push_str(&self.resolved);
        text.extend(self.pending.iter());
        text.push_str(suffix);
        text
    }

    /// Display width in terminal cells.
    pub fn width(&self) -> usize {
        self.to_line().width()
    }

    /// HTML for a web container.
    pub fn to_html(&self) -> String {
        let (prefix, suffix) = self.wrapper_parts();
        let mut html = String::new();

        if self.hidden {
            html.push_str(r#"<span style="visibility: hidden;">"#);
        }
        html.push_str(prefix);
        if let Some(link) = &self.link {
            html.push_str(&format!(
                r#"<a href="{}" target="{}">"#,
                link.url, link.target
            ));
        }

        html.push_str(&self.resolved);

        if !self.pending.is_empty() {
            html.push_str(&format!(
                r#"<span style="color: {};">"#,
                self.pending_color
            ));
            for (i, glyph) in self.pending.iter().enumerate() {
                match self.highlight {
                    Some(color) if i == 0 => {
                        html.push_str(&format!(r#"<span style="color: {color};">{glyph}</span>"#));
                    }
                    _ => html.push(*glyph),
                }
            }
            html.push_str("</span>");
        }

        if self.link.is_some() {
            html.push_str("</a>");
        }
        html.push_str(suffix);
        if self.hidden {
            html.push_str("</span>");
        }
        html
    }

    /// Styled terminal line. Linked text is underlined.
    pub fn to_line(&self) -> Line<'static> {
        if self.hidden {
            let blank = " ".repeat(Line::raw(self.plain_text()).width());
            return Line::raw(blank);
        }

        let (prefix, suffix) = self.wrapper_parts();
        let body = if self.link.is_some() {
            Style::new().add_modifier(Modifier::UNDERLINED)
        } else {
            Style::new()
        };

        let mut spans = Vec::with_capacity(self.pending.len() + 3);
        if !prefix.is_empty() {
            spans.push(Span::raw(prefix.to_string()));
        }
        if !self.resolved.is_empty() {
            spans.push(Span::styled(self.resolved.clone(), body));
        }
        for (i, glyph) in self.pending.iter().enumerate() {
            let color = match self.highlight {
                Some(color) if i == 0 => color,
                _ => self.pending_color,
            };
            spans.push(Span::styled(glyph.to_string(), body.fg(color.to_color())));
        }
        if !suffix.is_empty() {
            spans.push(Span::raw(suffix.to_string()));
        }
        Line::from(spans)
    }

    fn wrapper_parts(&self) -> (&str, &str) {
        match &self.wrappers {
            Some(w) => (w.prefix.as_str(), w.suffix.as_str()),
            None => ("", ""),
        }
    }
}

/// A container whose whole content is replaced on every frame.
pub trait MarkupSurface {
    fn set_content(&mut self, markup: Markup) -> Result<()>;

    fn clear(&mut self) -> Result<()>;
}

/// [`MarkupSurface`] that keeps the latest frame for the host to draw.
#[derive(Debug, Clone, Default)]
pub struct MarkupBuffer {
    content: Option<Markup>,
    revision: u64,
}

impl MarkupBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest frame, if any.
    pub fn content(&self) -> Option<&Markup> {
        self.content.as_ref()
    }

    /// Incremented on every change, so hosts can skip redundant work.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

impl MarkupSurface for MarkupBuffer {
    fn set_content(&mut self, markup: Markup) -> Result<()> {
        self.content = Some(markup);
        self.revision += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.content = None;
        self.revision += 1;
        Ok(())
    }
}
