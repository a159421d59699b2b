//! Thumbnail grid layout.
//!
//! Tiles are laid out in fixed-width rows; each row is as tall as its tallest
//! tile. Rows are what the virtual list scrolls over.

use std::ops::Range;

use gifpick_engine::Tile;
use gpui::{px, size, Pixels, ScrollStrategy, Size};
use gpui_component::VirtualListScrollHandle;

use crate::theme::Theme;

/// Tile index ranges, one per row.
pub fn rows(tile_count: usize, columns: usize) -> Vec<Range<usize>> {
    let columns = columns.max(1);
    (0..tile_count)
        .step_by(columns)
        .map(|start| start..(start + columns).min(tile_count))
        .collect()
}

/// Row that holds the tile at `index`.
pub fn row_of(index: usize, columns: usize) -> usize {
    index / columns.max(1)
}

/// Virtual list item sizes for the rows, gap included.
pub fn row_sizes(tiles: &[Tile], theme: &Theme) -> Vec<Size<Pixels>> {
    rows(tiles.len(), theme.columns)
        .into_iter()
        .map(|range| {
            let height = tiles[range]
                .iter()
                .map(|tile| theme.tile_height(tile.size))
                .fold(px(0.), |a, b| if b > a { b } else { a });
            size(px(0.), height + theme.tile_gap)
        })
        .collect()
}

/// Keep the cursor tile's row on screen.
pub fn scroll_to_cursor(scroll_handle: &VirtualListScrollHandle, cursor: usize, columns: usize) {
    scroll_handle.scroll_to_item(row_of(cursor, columns), ScrollStrategy::Nearest);
}
