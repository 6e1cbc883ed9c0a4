use crate::camera::CameraFrame;
use crate::game::Rect;

/// ソフトウェア描画用フレームバッファ (0RGB)
#[derive(Debug, Clone)]
pub struct Canvas {
    buffer: Vec<u32>,
    width: usize,
    height: usize,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            buffer: vec![0u32; width * height],
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn buffer(&self) -> &[u32] {
        &self.buffer
    }

    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.buffer[y * self.width + x]
    }

    pub fn clear(&mut self, color: u32) {
        self.buffer.fill(color);
    }

    /// 矩形を塗りつぶす（キャンバス外はクリップ）
    pub fn fill_rect(&mut self, rect: &Rect, color: u32) {
        let x0 = clip(rect.x, self.width);
        let x1 = clip(rect.right(), self.width);
        let y0 = clip(rect.y, self.height);
        let y1 = clip(rect.bottom(), self.height);
        if x0 >= x1 {
            return;
        }
        for y in y0..y1 {
            let row = y * self.width;
            self.buffer[row + x0..row + x1].fill(color);
        }
    }

    /// フレームを左右反転し、左上 (0, 0) の dest_width x dest_height に最近傍で拡縮して描く
    pub fn draw_mirrored(&mut self, frame: &CameraFrame, dest_width: usize, dest_height: usize) {
        if frame.width == 0 || frame.height == 0 || dest_width == 0 || dest_height == 0 {
            return;
        }
        let w = dest_width.min(self.width);
        let h = dest_height.min(self.height);
        for dy in 0..h {
            let sy = dy * frame.height / dest_height;
            for dx in 0..w {
                let sx = (dest_width - 1 - dx) * frame.width / dest_width;
                self.buffer[dy * self.width + dx] = frame.pixel(sx, sy);
            }
        }
    }
}

fn clip(v: f32, max: usize) -> usize {
    if v <= 0.0 {
        0
    } else {
        (v.round() as usize).min(max)
    }
}
