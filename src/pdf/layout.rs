use pdf_writer::{Content, Name, Str};

use crate::fonts::FontEntry;

// F4 paper (215 × 330 mm) in points.
pub(crate) const PAGE_WIDTH: f32 = 610.0;
pub(crate) const PAGE_HEIGHT: f32 = 936.0;
pub(crate) const MARGIN: f32 = 50.0;

pub(crate) const BODY_SIZE: f32 = 12.0;
pub(crate) const BODY_LINE_H: f32 = 18.0;

/// Mutable layout cursor for one composition: the open content stream, the
/// finished page streams and the vertical baseline position. Owned by a
/// single `compose` call; never shared.
pub(crate) struct LayoutState {
    finished: Vec<Content>,
    current: Content,
    /// Baseline y of the next line to draw. Top of a fresh page is
    /// `PAGE_HEIGHT - MARGIN`; drawing advances it downward.
    pub(crate) cursor_y: f32,
}

impl LayoutState {
    pub(crate) fn new() -> Self {
        LayoutState {
            finished: Vec::new(),
            current: Content::new(),
            cursor_y: PAGE_HEIGHT - MARGIN,
        }
    }

    pub(crate) fn content_width() -> f32 {
        PAGE_WIDTH - 2.0 * MARGIN
    }

    /// Close the current page and start a fresh one at the top margin.
    pub(crate) fn new_page(&mut self) {
        self.finished
            .push(std::mem::replace(&mut self.current, Content::new()));
        self.cursor_y = PAGE_HEIGHT - MARGIN;
    }

    /// Start a new page unless at least `needed` points remain above the
    /// bottom margin.
    pub(crate) fn ensure_space(&mut self, needed: f32) {
        if self.cursor_y - needed < MARGIN {
            self.new_page();
        }
    }

    pub(crate) fn advance(&mut self, dy: f32) {
        self.cursor_y -= dy;
    }

    /// All page content streams, in page order.
    pub(crate) fn finish(mut self) -> Vec<Content> {
        self.finished.push(self.current);
        self.finished
    }

    fn show_text_at(&mut self, text: &str, x: f32, y: f32, font: &FontEntry, size: f32) {
        self.current
            .begin_text()
            .set_font(Name(font.pdf_name.as_bytes()), size)
            .next_line(x, y)
            .show(Str(&font.encode(text)))
            .end_text();
    }

    /// Draw one line at an absolute position, ignoring the cursor. Used for
    /// the fixed signature-placeholder page.
    pub(crate) fn draw_text_at(&mut self, text: &str, x: f32, y: f32, font: &FontEntry, size: f32) {
        self.show_text_at(text, x, y, font, size);
    }

    /// Draw a line centered horizontally at the current cursor position.
    /// The cursor is not advanced; callers control the following gap.
    pub(crate) fn draw_centered(&mut self, text: &str, font: &FontEntry, size: f32) {
        let x = (PAGE_WIDTH - font.text_width(text, size)) / 2.0;
        self.show_text_at(text, x, self.cursor_y, font, size);
    }

    /// Horizontal separator across the content width at the cursor position.
    pub(crate) fn draw_rule(&mut self) {
        self.current
            .save_state()
            .set_line_width(1.5)
            .move_to(MARGIN, self.cursor_y)
            .line_to(PAGE_WIDTH - MARGIN, self.cursor_y)
            .stroke()
            .restore_state();
    }

    /// Lay out body text with justified alignment, splitting on embedded
    /// newlines into paragraphs. The page-break handling follows two rules:
    /// a coarse whole-paragraph pre-check (raw text width over usable width,
    /// rounded up — deliberately approximate), then an exact one-line check
    /// before each drawn line.
    pub(crate) fn draw_body(&mut self, text: &str, font: &FontEntry, size: f32, line_h: f32) {
        let max_width = Self::content_width();

        for paragraph in text.split('\n') {
            let words: Vec<&str> = paragraph.split(' ').filter(|w| !w.is_empty()).collect();
            if words.is_empty() {
                // blank line: advance once
                self.ensure_space(line_h);
                self.advance(line_h);
                continue;
            }

            let estimated_lines = (font.text_width(paragraph, size) / max_width).ceil().max(1.0);
            self.ensure_space(estimated_lines * line_h);

            let lines = split_paragraph_lines(&words, font, size, max_width);
            let last = lines.len() - 1;
            for (i, line) in lines.iter().enumerate() {
                self.ensure_space(line_h);
                if i != last && line.len() > 1 {
                    self.draw_justified_line(line, font, size, max_width);
                } else {
                    // single word, or the paragraph's last line
                    let joined = line.join(" ");
                    self.show_text_at(&joined, MARGIN, self.cursor_y, font, size);
                }
                self.advance(line_h);
            }
        }
    }

    /// Spread a full line across the usable width: total glyph width is
    /// measured without spaces and the slack is distributed evenly between
    /// words, each drawn at its cumulative x offset.
    fn draw_justified_line(&mut self, words: &[&str], font: &FontEntry, size: f32, max_width: f32) {
        let glyph_width: f32 = words.iter().map(|w| font.word_width(w, size)).sum();
        let gap = (max_width - glyph_width) / (words.len() - 1) as f32;

        let c = &mut self.current;
        c.begin_text();
        c.set_font(Name(font.pdf_name.as_bytes()), size);
        let mut x = MARGIN;
        let mut prev_x = 0.0;
        let mut prev_y = 0.0;
        for word in words {
            c.next_line(x - prev_x, self.cursor_y - prev_y);
            prev_x = x;
            prev_y = self.cursor_y;
            c.show(Str(&font.encode(word)));
            x += font.word_width(word, size) + gap;
        }
        c.end_text();
    }
}

/// Greedy word wrap: accumulate words until the next one would exceed
/// `max_width`, then break. Words are atomic — a single word wider than the
/// line is kept whole and allowed to overflow the margin. The trailing
/// partial line is always returned (a paragraph yields at least one line).
pub(crate) fn split_paragraph_lines<'a>(
    words: &[&'a str],
    font: &FontEntry,
    size: f32,
    max_width: f32,
) -> Vec<Vec<&'a str>> {
    let mut lines: Vec<Vec<&str>> = Vec::new();
    let mut line: Vec<&str> = Vec::new();
    let mut line_width = 0.0f32;

    for &word in words {
        let word_width = font.word_width(word, size);
        let proposed = if line.is_empty() {
            word_width
        } else {
            line_width + font.space_width(size) + word_width
        };
        if proposed > max_width && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
            line.push(word);
            line_width = word_width;
        } else {
            line.push(word);
            line_width = proposed;
        }
    }
    lines.push(line);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    // Every glyph 500/1000 units wide: at size 10 each char is 5pt.
    fn font() -> FontEntry {
        FontEntry::fixed_width(500.0)
    }

    #[test]
    fn short_text_stays_on_one_line() {
        let words = ["satu", "dua"];
        let lines = split_paragraph_lines(&words, &font(), 10.0, 100.0);
        assert_eq!(lines, vec![vec!["satu", "dua"]]);
    }

    #[test]
    fn wraps_when_next_word_would_overflow() {
        // "aaaa bbbb" = 20 + 5 + 20 = 45pt; cccc pushes to 70 > 60
        let words = ["aaaa", "bbbb", "cccc"];
        let lines = split_paragraph_lines(&words, &font(), 10.0, 60.0);
        assert_eq!(lines, vec![vec!["aaaa", "bbbb"], vec!["cccc"]]);
    }

    #[test]
    fn overlong_single_word_is_kept_whole() {
        let words = ["sangatpanjangsekali"];
        let lines = split_paragraph_lines(&words, &font(), 10.0, 40.0);
        assert_eq!(lines, vec![vec!["sangatpanjangsekali"]]);
    }

    #[test]
    fn overlong_word_mid_paragraph_gets_its_own_line() {
        let words = ["ab", "katayangsangatpanjang", "cd"];
        let lines = split_paragraph_lines(&words, &font(), 10.0, 40.0);
        assert_eq!(
            lines,
            vec![vec!["ab"], vec!["katayangsangatpanjang"], vec!["cd"]]
        );
    }

    #[test]
    fn trailing_partial_line_is_always_present() {
        let words = ["aaaa", "bbbb", "cccc", "dd"];
        let lines = split_paragraph_lines(&words, &font(), 10.0, 60.0);
        assert_eq!(lines.last().unwrap(), &vec!["cccc", "dd"]);
    }

    #[test]
    fn cursor_advances_and_breaks_pages() {
        let mut state = LayoutState::new();
        assert_eq!(state.cursor_y, PAGE_HEIGHT - MARGIN);
        state.advance(BODY_LINE_H);
        assert_eq!(state.cursor_y, PAGE_HEIGHT - MARGIN - BODY_LINE_H);

        // exhaust the page: ensure_space must open a second page
        state.cursor_y = MARGIN + 1.0;
        state.ensure_space(BODY_LINE_H);
        assert_eq!(state.cursor_y, PAGE_HEIGHT - MARGIN);
        assert_eq!(state.finish().len(), 2);
    }

    #[test]
    fn long_body_spills_onto_new_pages() {
        let mut state = LayoutState::new();
        let text = std::iter::repeat("kata").take(2000).collect::<Vec<_>>().join(" ");
        state.draw_body(&text, &font(), BODY_SIZE, BODY_LINE_H);
        assert!(state.finish().len() >= 2);
    }

    #[test]
    fn empty_paragraph_advances_one_line() {
        let mut state = LayoutState::new();
        let before = state.cursor_y;
        state.draw_body("", &font(), BODY_SIZE, BODY_LINE_H);
        assert_eq!(state.cursor_y, before - BODY_LINE_H);
    }
}
