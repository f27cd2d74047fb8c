// Helvetica glyph metrics and word wrapping
//
// Widths are the Adobe AFM advance widths (1/1000 em) for the printable
// ASCII range of the two standard-14 fonts the reports use. Anything outside
// that range is measured as a default-width glyph.

use super::layout::FontStyle;

/// Points per millimetre
const PT_PER_MM: f32 = 72.0 / 25.4;

/// Width used for glyphs without an entry (bullet, non-ASCII symbols)
const DEFAULT_GLYPH_WIDTH: u16 = 556;

/// Helvetica, code points 32..=126
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

/// Helvetica-Bold, code points 32..=126
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    333, 333, 584, 584, 584, 611, 975, // ':'..'@'
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    333, 278, 333, 584, 556, 333, // '['..'`'
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // 'a'..'m'
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // 'n'..'z'
    389, 280, 389, 584, // '{'..'~'
];

fn glyph_width(ch: char, style: FontStyle) -> u16 {
    let table = match style {
        FontStyle::Normal => &HELVETICA,
        FontStyle::Bold => &HELVETICA_BOLD,
    };
    let code = ch as u32;
    if (32..=126).contains(&code) {
        table[(code - 32) as usize]
    } else {
        DEFAULT_GLYPH_WIDTH
    }
}

/// Rendered width of `text` in millimetres.
pub fn text_width_mm(text: &str, font_size: f32, style: FontStyle) -> f32 {
    let units: u32 = text.chars().map(|ch| glyph_width(ch, style) as u32).sum();
    units as f32 / 1000.0 * font_size / PT_PER_MM
}

/// Greedy word wrap to `max_width` millimetres.
///
/// Explicit newlines start a new paragraph. A single word wider than the
/// line is split between characters.
pub fn split_text_to_size(text: &str, max_width: f32, font_size: f32, style: FontStyle) -> Vec<String> {
    let fits = |candidate: &str| text_width_mm(candidate, font_size, style) <= max_width;
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };

            if fits(&candidate) {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if fits(word) {
                current = word.to_string();
            } else {
                // Hard-break an overlong word
                for ch in word.chars() {
                    current.push(ch);
                    if !fits(&current) && current.chars().count() > 1 {
                        current.pop();
                        lines.push(std::mem::take(&mut current));
                        current.push(ch);
                    }
                }
            }
        }

        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_scales_with_font_size() {
        let small = text_width_mm("Savings", 10.0, FontStyle::Normal);
        let large = text_width_mm("Savings", 20.0, FontStyle::Normal);
        assert!((large - 2.0 * small).abs() < 1e-4);
    }

    #[test]
    fn test_bold_is_wider() {
        let normal = text_width_mm("Transaction Records", 14.0, FontStyle::Normal);
        let bold = text_width_mm("Transaction Records", 14.0, FontStyle::Bold);
        assert!(bold > normal);
    }

    #[test]
    fn test_known_width() {
        // "0" is 556 units; 1000 units at 72pt is exactly one inch
        let width = text_width_mm("0", 72.0, FontStyle::Normal);
        assert!((width - 0.556 * 25.4).abs() < 1e-3);
    }

    #[test]
    fn test_short_text_is_one_line() {
        let lines = split_text_to_size("Buy a bike", 175.0, 10.0, FontStyle::Normal);
        assert_eq!(lines, vec!["Buy a bike".to_string()]);
    }

    #[test]
    fn test_long_text_wraps_within_width() {
        let text = "Remember to move the birthday money into this jar before the end of the month and \
                    to skip takeaway coffee on weekdays so the weekly target stays realistic for everyone";
        let lines = split_text_to_size(text, 60.0, 10.0, FontStyle::Normal);

        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width_mm(line, 10.0, FontStyle::Normal) <= 60.0);
        }
        assert_eq!(lines.join(" "), text.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn test_overlong_word_is_broken() {
        let word = "a".repeat(200);
        let lines = split_text_to_size(&word, 20.0, 10.0, FontStyle::Normal);

        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn test_newlines_start_new_lines() {
        let lines = split_text_to_size("first\nsecond", 175.0, 10.0, FontStyle::Normal);
        assert_eq!(lines, vec!["first".to_string(), "second".to_string()]);
    }
}
