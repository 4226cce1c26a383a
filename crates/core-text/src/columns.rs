//! Raw column <-> display column mapping.
//!
//! Only the *leading* tab run of a line is expanded (to [`TAB_WIDTH`] cells);
//! every other code point, including tabs after the first non-tab character,
//! occupies exactly one cell. Both rendering and the status line use this
//! mapping so the cursor and the reported column always agree.
//!
//! Round-trip guarantee: for a line with `k` leading tabs and any raw column
//! `c` in `[0, k]`, `unpad_col(line, pad_col(line, c)) == c`.

/// Cells occupied by one leading tab.
pub const TAB_WIDTH: usize = 4;

/// Number of tabs at the start of `line`.
pub fn leading_tabs(line: &[char]) -> usize {
    line.iter().take_while(|&&c| c == '\t').count()
}

/// Raw (code point) column -> display column.
pub fn pad_col(line: &[char], col: usize) -> usize {
    let tabs = leading_tabs(line);
    if col < tabs {
        col * TAB_WIDTH
    } else {
        col + tabs * (TAB_WIDTH - 1)
    }
}

/// Display column -> raw column, clamped to the line length.
///
/// A display column that falls inside a leading tab resolves to the tab that
/// contains it.
pub fn unpad_col(line: &[char], display: usize) -> usize {
    if line.is_empty() {
        return 0;
    }
    let tabs = leading_tabs(line);
    let col = if display < tabs * TAB_WIDTH {
        display / TAB_WIDTH
    } else {
        display - tabs * (TAB_WIDTH - 1)
    };
    col.min(line.len())
}

/// Display column of a mouse click -> raw column.
///
/// Inside the leading tab run a click past the middle of a tab snaps to the
/// following tab stop; elsewhere it behaves like [`unpad_col`].
pub fn snap_display_col(line: &[char], display: usize) -> usize {
    let tabs = leading_tabs(line);
    let cell = display + 1;
    let col = if cell <= tabs * TAB_WIDTH {
        let (stop, within) = (cell / TAB_WIDTH, cell % TAB_WIDTH);
        if within > TAB_WIDTH / 2 { stop + 1 } else { stop }
    } else {
        display - tabs * (TAB_WIDTH - 1)
    };
    col.min(line.len())
}
