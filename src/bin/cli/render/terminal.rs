use revisa_lib::exam_stats::summary::LabelCount;

/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &'static str = "\x1b[0m";
    pub const BOLD: &'static str = "\x1b[1m";
    pub const DIM: &'static str = "\x1b[2m";
    pub const RED: &'static str = "\x1b[31m";
    pub const GREEN: &'static str = "\x1b[32m";
    pub const YELLOW: &'static str = "\x1b[33m";
    pub const CYAN: &'static str = "\x1b[36m";
}

/// Wrap `text` in `color` when colors are enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

pub fn heading(text: &str, use_color: bool) -> String {
    paint(text, Color::BOLD, use_color)
}

/// Horizontal rule of box-drawing characters
pub fn rule(width: usize) -> String {
    "\u{2500}".repeat(width)
}

/// Truncate to `width` characters, with an ellipsis when cut
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Render counts as a labelled bar chart
pub fn render_counts(counts: &[LabelCount], use_color: bool) -> Vec<String> {
    const BAR_WIDTH: usize = 30;

    let label_width = counts
        .iter()
        .map(|c| c.label.chars().count())
        .max()
        .unwrap_or(5)
        .clamp(5, 32);
    let max = counts.iter().map(|c| c.count).max().unwrap_or(0);

    counts
        .iter()
        .map(|c| {
            let len = if max == 0 { 0 } else { c.count * BAR_WIDTH / max };
            let bar = paint(&"\u{2588}".repeat(len.max(1)), Color::CYAN, use_color);
            let label = truncate(&c.label, label_width);
            let pad = label_width - label.chars().count();
            format!("  {}{} {:>5} {}", label, " ".repeat(pad), c.count, bar)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Cirurgia", 10), "Cirurgia");
        assert_eq!(truncate("Clínica Médica", 8), "Clíni...");
    }

    #[test]
    fn test_paint() {
        assert_eq!(paint("x", Color::RED, false), "x");
        assert_eq!(paint("x", Color::RED, true), "\x1b[31mx\x1b[0m");
    }

    #[test]
    fn test_render_counts() {
        let counts = vec![
            LabelCount {
                label: "Cirurgia".into(),
                count: 10,
            },
            LabelCount {
                label: "Pediatria".into(),
                count: 5,
            },
        ];
        let lines = render_counts(&counts, false);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("  Cirurgia "));
        assert!(lines[0].ends_with(&"\u{2588}".repeat(30)));
        assert!(lines[1].ends_with(&"\u{2588}".repeat(15)));
    }
}
