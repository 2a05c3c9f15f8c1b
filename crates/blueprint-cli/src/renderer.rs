//! Terminal rendering of markdown output via termimad, with a plain-text
//! fallback for `--no-color` and piped output.

use anyhow::Result;
use termimad::{MadSkin, crossterm::style::Color};

/// How a single markdown line is printed in rich mode.
#[derive(Debug, PartialEq, Eq)]
enum LineStyle {
    Header,
    Fence,
    Code,
    Text,
}

/// Terminal renderer that can switch between rich and plain text output
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();

        skin.set_headers_fg(Color::Blue);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.code_block.set_bg(Color::AnsiValue(238));
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self { rich_enabled, skin }
    }

    /// Render markdown text to the terminal.
    ///
    /// Headers keep their `#` markers. Lines inside fenced blocks (script
    /// steps) are printed untouched so shell commands are never reflowed.
    pub fn render(&self, markdown: &str) -> Result<()> {
        if !self.rich_enabled {
            print!("{markdown}");
            return Ok(());
        }

        let mut in_fence = false;
        for line in markdown.lines() {
            match classify(line, in_fence) {
                LineStyle::Fence => {
                    in_fence = !in_fence;
                    println!("\x1b[90m{line}\x1b[0m");
                }
                LineStyle::Code => println!("{line}"),
                LineStyle::Header => println!("\x1b[34m{line}\x1b[0m"),
                LineStyle::Text => {
                    self.skin.print_inline(line);
                    println!();
                }
            }
        }
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

fn classify(line: &str, in_fence: bool) -> LineStyle {
    if line.trim_start().starts_with("```") {
        LineStyle::Fence
    } else if in_fence {
        LineStyle::Code
    } else if line.starts_with('#') {
        LineStyle::Header
    } else {
        LineStyle::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_renderer() {
        let renderer = TerminalRenderer::new(false);
        assert!(!renderer.rich_enabled);
        assert!(renderer.render("# 1. Todo\n").is_ok());
    }

    #[test]
    fn test_default_is_rich() {
        let renderer = TerminalRenderer::default();
        assert!(renderer.rich_enabled);
    }

    #[test]
    fn test_classify_lines() {
        assert_eq!(classify("## Steps", false), LineStyle::Header);
        assert_eq!(classify("```sh", false), LineStyle::Fence);
        assert_eq!(classify("# not a header", true), LineStyle::Code);
        assert_eq!(classify("- file: `/a.txt`", false), LineStyle::Text);
    }
}
