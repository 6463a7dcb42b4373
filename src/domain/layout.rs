/// Space reserved for the page header and settings bar
const HEADER_HEIGHT: u32 = 120;
/// Outer margin around the board stack
const PAGE_MARGIN: u32 = 100;
/// Gap kept between the two stacked boards
const BOARD_GAP: u32 = 40;
/// Boards never shrink below this
const MIN_BOARD_HEIGHT: u32 = 300;

/// Display height of each board for a viewport `viewport_height` pixels tall.
///
/// The available area is split between two stacked boards.
pub fn board_height_for_viewport(viewport_height: u32) -> u32 {
    let available = viewport_height.saturating_sub(HEADER_HEIGHT + PAGE_MARGIN);
    (available / 2).saturating_sub(BOARD_GAP).max(MIN_BOARD_HEIGHT)
}
