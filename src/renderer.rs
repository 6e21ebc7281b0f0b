//! # Tide Clock Rendering
//!
//! This module draws display frames to a terminal and to small monochrome
//! panels. The panel path is written against `embedded-graphics`, so the same
//! drawing code targets an e-ink driver or the in-memory [`PanelBuffer`] used
//! for the terminal preview.

use crate::display::{DisplayFrame, DisplaySink};
use embedded_graphics::{
    mono_font::{
        ascii::{FONT_10X20, FONT_6X10},
        MonoTextStyle,
    },
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Circle, Line, PrimitiveStyle},
    text::{Baseline, Text},
};
use std::{convert::Infallible, io::Write};

/// ANSI clear-screen and cursor-home.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Label column width for the terminal layout.
const LABEL_WIDTH: usize = 16;

/// Renders frames as labelled text lines.
pub struct TerminalSink<W: Write> {
    out: W,
    clear_screen: bool,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W, clear_screen: bool) -> Self {
        Self { out, clear_screen }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DisplaySink for TerminalSink<W> {
    fn show(&mut self, frame: &DisplayFrame) -> std::io::Result<()> {
        if self.clear_screen {
            write!(self.out, "{}", CLEAR_SCREEN)?;
        }

        let rows = [
            ("Current time", &frame.current_time),
            ("Last high tide", &frame.reference),
            ("Tide status", &frame.status),
            ("Time until next", &frame.time_until_next),
            ("Next high tide", &frame.next_high),
            ("Next low tide", &frame.next_low),
        ];
        for (label, value) in rows {
            writeln!(self.out, "{:<width$}{}", label, value, width = LABEL_WIDTH)?;
        }
        self.out.flush()
    }

    fn alert(&mut self, message: &str) -> std::io::Result<()> {
        let rule = "─".repeat(message.chars().count() + 2);
        writeln!(self.out, "┌{}┐", rule)?;
        writeln!(self.out, "│ {} │", message)?;
        writeln!(self.out, "└{}┘", rule)?;
        self.out.flush()
    }
}

/// One-bit frame buffer with the e-ink row layout: each row is
/// `ceil(width / 8)` bytes, most significant bit leftmost.
pub struct PanelBuffer {
    width: u32,
    height: u32,
    bits: Vec<u8>,
}

impl PanelBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let bytes_per_row = width.div_ceil(8);
        Self {
            width,
            height,
            bits: vec![0x00; (bytes_per_row * height) as usize],
        }
    }

    /// Packed pixel rows, a set bit is an inked pixel.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    pub fn pixel(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let (index, mask) = self.locate(x, y);
        self.bits[index] & mask != 0
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, on: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let (index, mask) = self.locate(x, y);
        if on {
            self.bits[index] |= mask;
        } else {
            self.bits[index] &= !mask;
        }
    }

    /// Number of inked pixels.
    pub fn lit_pixels(&self) -> u32 {
        self.bits.iter().map(|b| b.count_ones()).sum()
    }

    /// Render the buffer with half-block characters, two pixel rows per line.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(((self.width + 1) * self.height.div_ceil(2)) as usize * 3);
        for y in (0..self.height).step_by(2) {
            for x in 0..self.width {
                let top = self.pixel(x, y);
                let bottom = self.pixel(x, y + 1);
                out.push(match (top, bottom) {
                    (true, true) => '█',
                    (true, false) => '▀',
                    (false, true) => '▄',
                    (false, false) => ' ',
                });
            }
            out.push('\n');
        }
        out
    }

    fn locate(&self, x: u32, y: u32) -> (usize, u8) {
        let bytes_per_row = self.width.div_ceil(8);
        ((y * bytes_per_row + x / 8) as usize, 0x80 >> (x % 8))
    }
}

impl OriginDimensions for PanelBuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for PanelBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0 && point.y >= 0 {
                self.set_pixel(point.x as u32, point.y as u32, color.is_on());
            }
        }
        Ok(())
    }
}

/// Draws frames on any monochrome `embedded-graphics` target.
///
/// Layout, top to bottom: clock, status in the large font, countdown, next
/// high and low water, then one tide cycle with a marker at the current phase.
pub struct PanelSink<D> {
    target: D,
}

impl<D> PanelSink<D>
where
    D: DrawTarget<Color = BinaryColor>,
{
    pub fn new(target: D) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &D {
        &self.target
    }

    pub fn into_inner(self) -> D {
        self.target
    }

    fn draw_frame(&mut self, frame: &DisplayFrame) {
        let small = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        let large = MonoTextStyle::new(&FONT_10X20, BinaryColor::On);

        self.target.clear(BinaryColor::Off).ok();

        let lines = [
            (Point::new(2, 2), frame.current_time.clone(), small),
            (Point::new(2, 14), frame.status.clone(), large),
            (Point::new(2, 36), format!("Next turn in {}", frame.time_until_next), small),
            (Point::new(2, 48), format!("High {}", frame.next_high), small),
            (Point::new(2, 60), format!("Low  {}", frame.next_low), small),
        ];
        for (position, text, style) in lines {
            Text::with_baseline(&text, position, style, Baseline::Top)
                .draw(&mut self.target)
                .ok();
        }

        if let Some(phase) = frame.phase {
            self.draw_cycle(phase);
        }
    }

    /// Plot one cycle as a cosine, high water at the top edge of the band.
    fn draw_cycle(&mut self, phase: f32) {
        let bounds = self.target.bounding_box();
        let width = bounds.size.width as i32;
        let top = 74;
        let bottom = bounds.size.height as i32 - 4;
        if bottom - top < 8 || width < 16 {
            return;
        }

        let left = 4;
        let right = width - 5;
        let band = (bottom - top) as f32;
        let tau = std::f32::consts::TAU;

        let level_to_y = |p: f32| top + ((1.0 - (p * tau).cos()) / 2.0 * band).round() as i32;
        let phase_to_x = |p: f32| left + (p * (right - left) as f32).round() as i32;

        let curve = PrimitiveStyle::with_stroke(BinaryColor::On, 1);
        let mut previous_point = None;
        for x in left..=right {
            let p = (x - left) as f32 / (right - left) as f32;
            let current_point = Point::new(x, level_to_y(p));
            if let Some(prev_point) = previous_point {
                Line::new(prev_point, current_point)
                    .into_styled(curve)
                    .draw(&mut self.target)
                    .ok();
            }
            previous_point = Some(current_point);
        }

        // Now marker: vertical tick plus a filled dot on the curve
        let now = Point::new(phase_to_x(phase), level_to_y(phase));
        Line::new(Point::new(now.x, top), Point::new(now.x, bottom))
            .into_styled(curve)
            .draw(&mut self.target)
            .ok();
        Circle::with_center(now, 7)
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut self.target)
            .ok();
    }
}

impl<D> DisplaySink for PanelSink<D>
where
    D: DrawTarget<Color = BinaryColor>,
{
    fn show(&mut self, frame: &DisplayFrame) -> std::io::Result<()> {
        self.draw_frame(frame);
        Ok(())
    }

    fn alert(&mut self, message: &str) -> std::io::Result<()> {
        let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        self.target.clear(BinaryColor::Off).ok();
        Text::with_baseline(message, Point::new(2, 2), style, Baseline::Top)
            .draw(&mut self.target)
            .ok();
        Ok(())
    }
}

/// Panel rendering previewed on a terminal as block characters.
pub struct PanelPreview<W: Write> {
    panel: PanelSink<PanelBuffer>,
    out: W,
    clear_screen: bool,
}

impl<W: Write> PanelPreview<W> {
    pub fn new(out: W, width: u32, height: u32, clear_screen: bool) -> Self {
        Self {
            panel: PanelSink::new(PanelBuffer::new(width, height)),
            out,
            clear_screen,
        }
    }

    pub fn buffer(&self) -> &PanelBuffer {
        self.panel.target()
    }

    fn flush_panel(&mut self) -> std::io::Result<()> {
        if self.clear_screen {
            write!(self.out, "{}", CLEAR_SCREEN)?;
        }
        self.out.write_all(self.panel.target().to_ascii().as_bytes())?;
        self.out.flush()
    }
}

impl<W: Write> DisplaySink for PanelPreview<W> {
    fn show(&mut self, frame: &DisplayFrame) -> std::io::Result<()> {
        self.panel.show(frame)?;
        self.flush_panel()
    }

    fn alert(&mut self, message: &str) -> std::io::Result<()> {
        self.panel.alert(message)?;
        self.flush_panel()
    }
}
