//! Display driver trait for the status OLED

/// Errors that can occur with the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Controller did not acknowledge on the bus
    Bus,
    /// Drawing requested before a successful `init`
    NotInitialized,
}

/// Display width in pixels
pub const DISPLAY_WIDTH: u32 = 128;

/// Display height in pixels
pub const DISPLAY_HEIGHT: u32 = 64;

/// Pixel-graphics display with a back buffer
///
/// Drawing calls only touch the back buffer; `present` pushes it to the
/// panel. Coordinates are in pixels from the top-left corner, text is
/// drawn with a fixed 6x10 font whose top edge sits at `y`.
pub trait DisplayDriver {
    /// Bring up the panel controller
    fn init(&mut self) -> Result<(), DisplayError>;

    /// Clear the back buffer
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Draw ASCII text
    fn draw_text(&mut self, x: i32, y: i32, text: &str) -> Result<(), DisplayError>;

    /// Draw a rectangle outline, or a solid block when `filled`
    fn draw_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        filled: bool,
    ) -> Result<(), DisplayError>;

    /// Draw a one-pixel line
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) -> Result<(), DisplayError>;

    /// Flush the back buffer to the panel
    fn present(&mut self) -> Result<(), DisplayError>;
}
