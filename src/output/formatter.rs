//! Console rendering of controller notices, including Markdown responses

use crate::session::controller::Notice;
use colored::{Color, Colorize};
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag};

pub struct ConsoleFormatter {
    use_colors: bool,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn icon(&self, emoji: &str, plain: &str) -> String {
        if self.use_colors {
            emoji.to_string()
        } else {
            plain.to_string()
        }
    }

    pub fn format_notice(&self, notice: &Notice) -> String {
        match notice {
            Notice::Status(text) => format!("{} {}", self.icon("📄", "[i]"), text),
            Notice::Progress(text) => format!(
                "{} {}",
                self.icon("⏳", "[~]"),
                self.colorize(text, Color::BrightBlack)
            ),
            Notice::Success(text) => format!(
                "{} {}",
                self.icon("✅", "[+]"),
                self.colorize(text, Color::Green)
            ),
            Notice::Error(text) => format!(
                "{} {}",
                self.icon("❌", "[x]"),
                self.colorize(text, Color::Red)
            ),
            Notice::Warning(text) => format!(
                "{} {}",
                self.icon("⚠️ ", "[!]"),
                self.colorize(text, Color::Yellow)
            ),
            Notice::Response(markdown) => {
                let title = if self.use_colors {
                    "AI Analysis Result:".color(Color::Blue).bold().to_string()
                } else {
                    "AI Analysis Result:".to_string()
                };
                format!("---\n{}\n\n{}", title, self.render_markdown(markdown))
            }
        }
    }

    pub fn format_notices(&self, notices: &[Notice]) -> String {
        notices
            .iter()
            .map(|notice| self.format_notice(notice))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Turn Markdown into terminal text: headings, emphasis, lists, code and rules.
    pub fn render_markdown(&self, markdown: &str) -> String {
        let mut out = String::new();
        let mut lists: Vec<Option<u64>> = Vec::new();
        let mut heading: Option<HeadingLevel> = None;
        let mut strong = false;
        let mut emphasis = false;
        let mut in_code_block = false;

        for event in Parser::new(markdown) {
            match event {
                Event::Start(Tag::Heading(level, _, _)) => {
                    ensure_blank_line(&mut out);
                    let prefix = match level {
                        HeadingLevel::H1 => "█ ",
                        HeadingLevel::H2 => "▓ ",
                        HeadingLevel::H3 => "▒ ",
                        _ => "░ ",
                    };
                    out.push_str(&self.colorize(prefix, heading_color(level)));
                    heading = Some(level);
                }
                Event::End(Tag::Heading(..)) => {
                    heading = None;
                    out.push('\n');
                }
                Event::Start(Tag::Paragraph) => {
                    if lists.is_empty() {
                        ensure_blank_line(&mut out);
                    }
                }
                Event::End(Tag::Paragraph) => {
                    if !out.ends_with('\n') {
                        out.push('\n');
                    }
                }
                Event::Start(Tag::List(start)) => {
                    if !out.is_empty() && !out.ends_with('\n') {
                        out.push('\n');
                    }
                    lists.push(start);
                }
                Event::End(Tag::List(_)) => {
                    lists.pop();
                }
                Event::Start(Tag::Item) => {
                    let depth = lists.len().saturating_sub(1);
                    out.push_str(&"  ".repeat(depth));
                    let bullet = match lists.last_mut() {
                        Some(Some(n)) => {
                            let label = format!("{}. ", n);
                            *n += 1;
                            label
                        }
                        _ => "• ".to_string(),
                    };
                    out.push_str(&bullet);
                }
                Event::End(Tag::Item) => {
                    if !out.ends_with('\n') {
                        out.push('\n');
                    }
                }
                Event::Start(Tag::Strong) => strong = true,
                Event::End(Tag::Strong) => strong = false,
                Event::Start(Tag::Emphasis) => emphasis = true,
                Event::End(Tag::Emphasis) => emphasis = false,
                Event::Start(Tag::CodeBlock(_)) => {
                    ensure_blank_line(&mut out);
                    in_code_block = true;
                }
                Event::End(Tag::CodeBlock(_)) => in_code_block = false,
                Event::Start(Tag::BlockQuote) => out.push_str("│ "),
                Event::Text(text) => {
                    if in_code_block {
                        for line in text.lines() {
                            out.push_str("    ");
                            out.push_str(&self.colorize(line, Color::Cyan));
                            out.push('\n');
                        }
                    } else {
                        out.push_str(&self.style_text(&text, heading, strong, emphasis));
                    }
                }
                Event::Code(code) => out.push_str(&self.colorize(&code, Color::Cyan)),
                Event::SoftBreak | Event::HardBreak => out.push('\n'),
                Event::Rule => {
                    ensure_blank_line(&mut out);
                    out.push_str(&"─".repeat(40));
                    out.push('\n');
                }
                _ => {}
            }
        }

        out.trim_end().to_string()
    }

    fn style_text(&self, text: &str, heading: Option<HeadingLevel>, strong: bool, emphasis: bool) -> String {
        if !self.use_colors {
            return text.to_string();
        }

        let mut styled = text.normal();
        if let Some(level) = heading {
            styled = styled.color(heading_color(level)).bold();
        }
        if strong {
            styled = styled.bold();
        }
        if emphasis {
            styled = styled.italic();
        }
        styled.to_string()
    }
}

fn heading_color(level: HeadingLevel) -> Color {
    match level {
        HeadingLevel::H1 => Color::Blue,
        HeadingLevel::H2 => Color::Green,
        HeadingLevel::H3 => Color::Yellow,
        _ => Color::White,
    }
}

fn ensure_blank_line(out: &mut String) {
    if out.is_empty() {
        return;
    }
    while !out.ends_with("\n\n") {
        out.push('\n');
    }
}
