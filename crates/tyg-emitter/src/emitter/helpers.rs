use super::{Precedence, Printer};
use tyg_parser::NodeIndex;

const INDENT: &str = "    ";

impl Printer<'_> {
    // =========================================================================
    // Output Helpers
    // =========================================================================

    /// Write text, indenting first when at the start of a line.
    pub(super) fn write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.at_line_start {
            for _ in 0..self.indent_level {
                self.output.push_str(INDENT);
            }
            self.at_line_start = false;
        }
        self.output.push_str(text);
    }

    pub(super) fn write_space(&mut self) {
        self.write(" ");
    }

    pub(super) fn write_line(&mut self) {
        self.output.push('\n');
        self.at_line_start = true;
    }

    /// Make sure the output ends with `count` empty lines. Nothing is
    /// written at the very start of the output.
    pub(super) fn write_blank_lines(&mut self, count: usize) {
        if self.output.is_empty() {
            return;
        }
        let trailing = self.output.bytes().rev().take_while(|b| *b == b'\n').count();
        for _ in trailing..=count {
            self.write_line();
        }
    }

    pub(super) const fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    pub(super) const fn decrease_indent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    // =========================================================================
    // Lists
    // =========================================================================

    /// Emit `items` separated by `", "`.
    pub(super) fn emit_comma_list(&mut self, items: &[NodeIndex], required: Precedence) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_expression(*item, required);
        }
    }

    pub(super) fn write_names(&mut self, names: &[String]) {
        self.write(&names.join(", "));
    }
}
