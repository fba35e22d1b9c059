//! The chat input field: composed text plus a character cursor.

use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MessageInputState {
    text: String,
    /// Character index, not byte index.
    cursor: usize,
}

impl MessageInputState {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Terminal columns occupied by the text before the cursor.
    pub fn cursor_columns(&self) -> usize {
        let byte_idx = self.byte_index(self.cursor);
        self.text[..byte_idx].width()
    }

    pub fn insert_char(&mut self, ch: char) {
        let byte_idx = self.byte_index(self.cursor);
        self.text.insert(byte_idx, ch);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        self.remove_at_cursor();
    }

    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            self.remove_at_cursor();
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = std::cmp::min(self.cursor + 1, self.char_count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    fn remove_at_cursor(&mut self) {
        let start = self.byte_index(self.cursor);
        let end = self.byte_index(self.cursor + 1);
        self.text.replace_range(start..end, "");
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map_or(self.text.len(), |(byte_idx, _)| byte_idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> MessageInputState {
        let mut state = MessageInputState::default();
        text.chars().for_each(|ch| state.insert_char(ch));
        state
    }

    #[test]
    fn typing_appends_at_cursor() {
        let mut state = typed("Moscw");
        state.move_left();
        state.insert_char('o');

        assert_eq!(state.text(), "Moscow");
        assert_eq!(state.cursor(), 5);
    }

    #[test]
    fn backspace_and_delete_remove_around_cursor() {
        let mut state = typed("abc");
        state.backspace();
        assert_eq!(state.text(), "ab");

        state.move_home();
        state.delete();
        assert_eq!(state.text(), "b");
        assert_eq!(state.cursor(), 0);

        state.backspace();
        assert_eq!(state.text(), "b");
    }

    #[test]
    fn cursor_stays_inside_text() {
        let mut state = typed("ab");
        state.move_right();
        assert_eq!(state.cursor(), 2);

        state.move_home();
        state.move_left();
        assert_eq!(state.cursor(), 0);

        state.move_end();
        assert_eq!(state.cursor(), 2);
    }

    #[test]
    fn handles_multibyte_text() {
        let mut state = typed("Сочи");
        state.backspace();
        assert_eq!(state.text(), "Соч");

        state.move_home();
        state.delete();
        assert_eq!(state.text(), "оч");
    }

    #[test]
    fn cursor_columns_count_wide_characters() {
        let state = typed("東京");

        assert_eq!(state.cursor(), 2);
        assert_eq!(state.cursor_columns(), 4);
    }

    #[test]
    fn clear_resets_text_and_cursor() {
        let mut state = typed("hi");
        state.clear();

        assert!(state.is_empty());
        assert_eq!(state.cursor(), 0);
    }
}
