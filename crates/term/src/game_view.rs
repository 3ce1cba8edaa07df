//! GameView: maps a `GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::GameSnapshot;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{CellKind, BOARD_SIZE};

const PLAY_BG: Rgb = Rgb::new(24, 28, 24);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// A lightweight terminal renderer for the Snake board.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
}

/// Board origin and frame size inside a viewport.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Frame size (board plus border) in terminal cells.
    pub fn frame_size(&self) -> (u16, u16) {
        let n = BOARD_SIZE as u16;
        (n * self.cell_w + 2, n * self.cell_h + 2)
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let (w, h) = self.frame_size();
        let frame = Frame {
            x: viewport.width.saturating_sub(w) / 2,
            y: match self.anchor_y {
                AnchorY::Center => viewport.height.saturating_sub(h) / 2,
                AnchorY::Top => 0,
            },
            w,
            h,
        };

        self.draw_border(fb, frame);

        for (y, row) in snap.cells.iter().enumerate() {
            for (x, &kind) in row.iter().enumerate() {
                self.draw_cell(fb, frame, x as u16, y as u16, kind);
            }
        }

        self.draw_side_panel(fb, snap, viewport, frame);

        if snap.game_over {
            self.draw_overlay(fb, frame, "GAME OVER", "arrows/R");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, f: Frame) {
        let style = CellStyle::fg_on(Rgb::new(200, 200, 200), PANEL_BG);

        fb.put_char(f.x, f.y, '┌', style);
        fb.put_char(f.x + f.w - 1, f.y, '┐', style);
        fb.put_char(f.x, f.y + f.h - 1, '└', style);
        fb.put_char(f.x + f.w - 1, f.y + f.h - 1, '┘', style);

        for dx in 1..f.w - 1 {
            fb.put_char(f.x + dx, f.y, '─', style);
            fb.put_char(f.x + dx, f.y + f.h - 1, '─', style);
        }
        for dy in 1..f.h - 1 {
            fb.put_char(f.x, f.y + dy, '│', style);
            fb.put_char(f.x + f.w - 1, f.y + dy, '│', style);
        }
    }

    fn draw_cell(&self, fb: &mut FrameBuffer, f: Frame, x: u16, y: u16, kind: CellKind) {
        let (ch, style) = match kind {
            CellKind::Empty => ('·', CellStyle::fg_on(Rgb::new(70, 80, 70), PLAY_BG).dim()),
            CellKind::Head => ('█', CellStyle::fg_on(Rgb::new(150, 255, 120), PLAY_BG).bold()),
            CellKind::Body => ('█', CellStyle::fg_on(Rgb::new(60, 180, 70), PLAY_BG)),
            CellKind::Food => ('█', CellStyle::fg_on(Rgb::new(230, 70, 60), PLAY_BG).bold()),
        };
        let px = f.x + 1 + x * self.cell_w;
        let py = f.y + 1 + y * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, viewport: Viewport, f: Frame) {
        let panel_x = f.x.saturating_add(f.w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 10 {
            return;
        }

        let label = CellStyle::default().bold();
        let value = CellStyle::fg_on(Rgb::new(200, 200, 200), PANEL_BG);
        let hint = value.dim();

        let mut y = f.y;
        fb.put_str(panel_x, y, "SCORE", label);
        fb.put_u32(panel_x, y + 1, snap.score, value);
        y += 3;

        fb.put_str(panel_x, y, "LENGTH", label);
        fb.put_u32(panel_x, y + 1, snap.length as u32, value);
        y += 3;

        fb.put_str(panel_x, y, "DIRECTION", label);
        fb.put_str(panel_x, y + 1, snap.direction.label(), value);
        y += 3;

        fb.put_str(panel_x, y, "GAME", label);
        fb.put_u32(panel_x, y + 1, snap.episode_id + 1, value);
        y += 3;

        fb.put_str(panel_x, y, "KEYS", label);
        fb.put_str(panel_x, y + 1, "arrows/wasd", hint);
        fb.put_str(panel_x, y + 2, "r new game", hint);
        fb.put_str(panel_x, y + 3, "q quit", hint);
    }

    fn draw_overlay(&self, fb: &mut FrameBuffer, f: Frame, title: &str, subtitle: &str) {
        let style = CellStyle::fg_on(Rgb::new(255, 255, 255), PANEL_BG).bold();
        let mid_y = f.y.saturating_add(f.h / 2);

        for (dy, text) in [(0u16, title), (1, subtitle)] {
            let text_w = text.chars().count() as u16;
            let x = f.x.saturating_add(f.w.saturating_sub(text_w) / 2);
            fb.put_str(x, mid_y + dy, text, if dy == 0 { style } else { style.dim() });
        }
    }
}
