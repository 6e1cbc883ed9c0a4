/// 軸並行の矩形（キャンバス座標、ピクセル）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// x を [0, bound_width - width] に収める。幅が足りなければ 0。
    pub fn clamp_x(&mut self, bound_width: f32) {
        let max_x = (bound_width - self.width).max(0.0);
        self.x = self.x.clamp(0.0, max_x);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let r = Rect::new(10.0, 20.0, 5.0, 8.0);
        assert_eq!(r.right(), 15.0);
        assert_eq!(r.bottom(), 28.0);
    }

    #[test]
    fn test_clamp_x() {
        let mut r = Rect::new(-3.0, 0.0, 50.0, 100.0);
        r.clamp_x(640.0);
        assert_eq!(r.x, 0.0);

        r.x = 700.0;
        r.clamp_x(640.0);
        assert_eq!(r.x, 590.0);
    }

    #[test]
    fn test_clamp_x_narrow_bounds() {
        let mut r = Rect::new(12.0, 0.0, 50.0, 100.0);
        r.clamp_x(30.0);
        assert_eq!(r.x, 0.0);
    }
}
