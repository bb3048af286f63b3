//! SH1106 OLED display driver
//!
//! 128x64 monochrome panel over I2C. Drawing goes into a RAM frame buffer
//! through `embedded-graphics`; `present` pushes the buffer page by page.

use core::convert::Infallible;

use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};
use embedded_hal::i2c::I2c;
use triage_core::traits::{DisplayDriver, DisplayError, DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// SH1106 I2C address (typically 0x3C or 0x3D)
const ADDR: u8 = 0x3C;

const WIDTH: usize = DISPLAY_WIDTH as usize;
const PAGES: usize = DISPLAY_HEIGHT as usize / 8;

/// The 128 visible columns start at column 2 of the 132-column RAM
const COLUMN_OFFSET: u8 = 2;

/// SH1106 commands
mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_LOW_COLUMN: u8 = 0x00;
    pub const SET_HIGH_COLUMN: u8 = 0x10;
    pub const SET_PAGE_ADDR: u8 = 0xB0;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
}

const INIT_SEQUENCE: &[u8] = &[
    cmd::DISPLAY_OFF,
    cmd::SET_CLOCK_DIV,
    0x80,
    cmd::SET_MUX_RATIO,
    0x3F, // 64 lines
    cmd::SET_DISPLAY_OFFSET,
    0x00,
    cmd::SET_START_LINE,
    cmd::SET_CHARGE_PUMP,
    0x14,
    cmd::SET_SEG_REMAP,
    cmd::SET_COM_SCAN_DEC,
    cmd::SET_COM_PINS,
    0x12,
    cmd::SET_CONTRAST,
    0xCF,
    cmd::SET_PRECHARGE,
    0xF1,
    cmd::SET_VCOM_DETECT,
    0x40,
    cmd::SET_NORMAL,
    cmd::DISPLAY_ON,
];

/// 1 bit per pixel, organized as 8-pixel-high pages
struct FrameBuffer {
    pages: [[u8; WIDTH]; PAGES],
}

impl FrameBuffer {
    const fn new() -> Self {
        Self {
            pages: [[0; WIDTH]; PAGES],
        }
    }

    fn fill(&mut self, byte: u8) {
        for page in self.pages.iter_mut() {
            page.fill(byte);
        }
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(DISPLAY_WIDTH, DISPLAY_HEIGHT)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<P>(&mut self, pixels: P) -> Result<(), Self::Error>
    where
        P: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (usize::try_from(point.x), usize::try_from(point.y)) else {
                continue;
            };
            if x >= WIDTH || y >= PAGES * 8 {
                continue;
            }

            let byte = &mut self.pages[y / 8][x];
            let bit = 1 << (y % 8);
            if color.is_on() {
                *byte |= bit;
            } else {
                *byte &= !bit;
            }
        }
        Ok(())
    }
}

/// Draw into the frame buffer; drawing to RAM cannot fail
fn draw<D>(drawable: &D, frame: &mut FrameBuffer)
where
    D: Drawable<Color = BinaryColor>,
{
    let _ = drawable.draw(frame);
}

/// SH1106 OLED driver
pub struct Sh1106<I> {
    i2c: I,
    frame: FrameBuffer,
    ready: bool,
}

impl<I: I2c> Sh1106<I> {
    pub fn new(i2c: I) -> Self {
        Self {
            i2c,
            frame: FrameBuffer::new(),
            ready: false,
        }
    }

    fn command(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.i2c
            .write(ADDR, &[0x00, byte])
            .map_err(|_| DisplayError::Bus)
    }

    fn ensure_ready(&self) -> Result<(), DisplayError> {
        if self.ready {
            Ok(())
        } else {
            Err(DisplayError::NotInitialized)
        }
    }
}

impl<I: I2c> DisplayDriver for Sh1106<I> {
    fn init(&mut self) -> Result<(), DisplayError> {
        self.ready = false;
        for &byte in INIT_SEQUENCE {
            self.command(byte)?;
        }
        self.frame.fill(0);
        self.ready = true;
        self.present()
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.ensure_ready()?;
        self.frame.fill(0);
        Ok(())
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str) -> Result<(), DisplayError> {
        self.ensure_ready()?;
        let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        draw(
            &Text::with_baseline(text, Point::new(x, y), style, Baseline::Top),
            &mut self.frame,
        );
        Ok(())
    }

    fn draw_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        filled: bool,
    ) -> Result<(), DisplayError> {
        self.ensure_ready()?;
        let style = if filled {
            PrimitiveStyle::with_fill(BinaryColor::On)
        } else {
            PrimitiveStyle::with_stroke(BinaryColor::On, 1)
        };
        draw(
            &Rectangle::new(Point::new(x, y), Size::new(width, height)).into_styled(style),
            &mut self.frame,
        );
        Ok(())
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) -> Result<(), DisplayError> {
        self.ensure_ready()?;
        draw(
            &Line::new(Point::new(x0, y0), Point::new(x1, y1))
                .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1)),
            &mut self.frame,
        );
        Ok(())
    }

    fn present(&mut self) -> Result<(), DisplayError> {
        self.ensure_ready()?;
        for page in 0..PAGES {
            self.command(cmd::SET_PAGE_ADDR | page as u8)?;
            self.command(cmd::SET_LOW_COLUMN | COLUMN_OFFSET)?;
            self.command(cmd::SET_HIGH_COLUMN)?;

            let mut data = [0u8; WIDTH + 1];
            data[0] = 0x40; // data mode
            data[1..].copy_from_slice(&self.frame.pages[page]);
            self.i2c
                .write(ADDR, &data)
                .map_err(|_| DisplayError::Bus)?;
        }
        Ok(())
    }
}
