//! Screen composition
//!
//! The status OLED is 128x64 pixels; with a 6x10 font that gives 21
//! columns. Layout:
//!
//! ```text
//! y=0   HEART            OK     header: knob mode, link
//! y=11  ---------------------
//! y=14  body row 0
//! y=25  body row 1
//! y=36  body row 2 / progress bar
//! y=52  ---------------------
//! y=54  footer (status, max 10 chars)
//! ```
//!
//! A [`Frame`] is composed first and drawn second, so the composition can
//! be checked without a display.

use core::fmt::{self, Write};

use heapless::String;

use crate::sensing::SensorSnapshot;
use crate::state::SystemState;
use crate::traits::{DisplayDriver, DisplayError, DISPLAY_WIDTH};

/// Characters per row with the 6x10 font
pub const DISPLAY_COLS: usize = 21;

/// Maximum footer length
pub const FOOTER_LEN: usize = 10;

/// Number of progress steps in the examination animation
pub const PROGRESS_STEPS: u32 = 20;

/// Milliseconds per progress step
pub const PROGRESS_STEP_MS: u32 = 250;

const HEADER_Y: i32 = 0;
const HEADER_RULE_Y: i32 = 11;
const BODY_Y: i32 = 14;
const ROW_PITCH: i32 = 11;
const BAR_X: i32 = 4;
const BAR_Y: i32 = 38;
const BAR_HEIGHT: u32 = 8;
const BAR_STEP_WIDTH: u32 = 6;
const FOOTER_RULE_Y: i32 = 52;
const FOOTER_Y: i32 = 54;
const LINK_X: i32 = 110;

/// One row of text
pub type Row = String<DISPLAY_COLS>;

/// Everything the presenter needs for one frame
#[derive(Debug, Clone, Copy)]
pub struct DisplayView<'a> {
    pub snapshot: &'a SensorSnapshot,
    pub state: SystemState,
    pub connected: bool,
    /// Last `display.text` from the host
    pub host_text: Option<&'a str>,
    pub now_ms: u32,
}

/// A composed screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    pub header: Row,
    pub link: &'static str,
    pub body: [Row; 3],
    /// Examination animation step, `0..PROGRESS_STEPS`
    pub progress: Option<u32>,
    pub footer: String<FOOTER_LEN>,
}

/// `fmt::Write` adapter that silently drops what does not fit
struct Truncate<'a, const N: usize>(&'a mut String<N>);

impl<const N: usize> Write for Truncate<'_, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for ch in s.chars() {
            if self.0.push(ch).is_err() {
                break;
            }
        }
        Ok(())
    }
}

fn line<const N: usize>(args: fmt::Arguments<'_>) -> String<N> {
    let mut out = String::new();
    let _ = Truncate(&mut out).write_fmt(args);
    out
}

/// Pseudo-progress step for the examination animation
pub fn progress_step(now_ms: u32) -> u32 {
    (now_ms / PROGRESS_STEP_MS) % PROGRESS_STEPS
}

/// Footer status: link loss first, then host text, then the state label
pub fn footer_text(
    connected: bool,
    host_text: Option<&str>,
    state: SystemState,
) -> String<FOOTER_LEN> {
    let status = match (connected, host_text) {
        (false, _) => "NO LINK",
        (true, Some(text)) if !text.is_empty() => text,
        (true, _) => state.label(),
    };
    line(format_args!("{}", status))
}

/// Display presenter
#[derive(Debug, Default)]
pub struct DisplayPresenter {
    frame: Frame,
}

impl DisplayPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently composed frame
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Compose the frame for `view`
    pub fn compose(&mut self, view: &DisplayView<'_>) -> &Frame {
        let snapshot = view.snapshot;

        self.frame = Frame {
            header: line(format_args!("{}", snapshot.knob_mode.label())),
            link: if view.connected { "OK" } else { "--" },
            body: Default::default(),
            progress: None,
            footer: footer_text(view.connected, view.host_text, view.state),
        };

        let body = &mut self.frame.body;
        match view.state {
            SystemState::Initializing => {
                body[0] = line(format_args!("Starting up"));
            }
            SystemState::Idle => {
                body[0] = if snapshot.distance_valid {
                    let tag = if snapshot.distance_in_range { " ok" } else { "" };
                    line(format_args!("Dist: {}mm{}", snapshot.distance_mm, tag))
                } else {
                    line(format_args!("Dist: ---"))
                };
                body[1] = if snapshot.temperature_valid {
                    line(format_args!("Temp: {:.1}C", snapshot.temperature_c))
                } else {
                    line(format_args!("Temp: ---"))
                };
                body[2] = movement_row(snapshot);
            }
            SystemState::Examining => {
                body[0] = line(format_args!("Examining..."));
                body[1] = movement_row(snapshot);
                self.frame.progress = Some(progress_step(view.now_ms));
            }
            SystemState::Results => match view.host_text {
                Some(text) if !text.is_empty() => {
                    let (first, rest) = wrap_row(text);
                    body[0] = first;
                    body[1] = wrap_row(rest).0;
                }
                _ => body[0] = line(format_args!("Awaiting result")),
            },
            SystemState::Error => {
                body[0] = line(format_args!("! ERROR !"));
                body[1] = line(format_args!("See host"));
            }
        }

        &self.frame
    }

    /// Compose and draw one frame
    pub fn render<D: DisplayDriver>(
        &mut self,
        display: &mut D,
        view: &DisplayView<'_>,
    ) -> Result<(), DisplayError> {
        self.compose(view);
        self.draw(display)
    }

    /// Draw the current frame
    pub fn draw<D: DisplayDriver>(&self, display: &mut D) -> Result<(), DisplayError> {
        let frame = &self.frame;
        let right = DISPLAY_WIDTH as i32 - 1;

        display.clear()?;
        display.draw_text(0, HEADER_Y, &frame.header)?;
        display.draw_text(LINK_X, HEADER_Y, frame.link)?;
        display.draw_line(0, HEADER_RULE_Y, right, HEADER_RULE_Y)?;

        let mut y = BODY_Y;
        for row in frame.body.iter() {
            if !row.is_empty() {
                display.draw_text(0, y, row)?;
            }
            y += ROW_PITCH;
        }

        if let Some(step) = frame.progress {
            let full = PROGRESS_STEPS * BAR_STEP_WIDTH;
            display.draw_rect(BAR_X, BAR_Y, full, BAR_HEIGHT, false)?;
            display.draw_rect(BAR_X, BAR_Y, (step + 1) * BAR_STEP_WIDTH, BAR_HEIGHT, true)?;
        }

        display.draw_line(0, FOOTER_RULE_Y, right, FOOTER_RULE_Y)?;
        display.draw_text(0, FOOTER_Y, &frame.footer)?;
        display.present()
    }
}

/// Fill one row from the front of `text`, returning the part that did not fit
///
/// Row capacity is in bytes, so a row of multibyte text holds fewer
/// characters; a character is never split.
fn wrap_row(text: &str) -> (Row, &str) {
    let mut row = Row::new();
    for (at, ch) in text.char_indices() {
        if row.push(ch).is_err() {
            return (row, &text[at..]);
        }
    }
    (row, "")
}

fn movement_row(snapshot: &SensorSnapshot) -> Row {
    if snapshot.movement_detected {
        line(format_args!("Moving - hold still"))
    } else {
        let ms = snapshot.movement_stable_duration_ms;
        line(format_args!("Still {}.{}s", ms / 1000, (ms % 1000) / 100))
    }
}
