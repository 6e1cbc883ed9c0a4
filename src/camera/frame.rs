/// 0RGB ピクセルバッファ（minifb と同じ形式）
#[derive(Debug, Clone, PartialEq)]
pub struct CameraFrame {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl CameraFrame {
    pub fn new(width: usize, height: usize, pixels: Vec<u32>) -> Self {
        debug_assert_eq!(pixels.len(), width * height);
        Self { width, height, pixels }
    }

    /// 単色フレーム
    pub fn filled(width: usize, height: usize, color: u32) -> Self {
        Self::new(width, height, vec![color; width * height])
    }

    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }
}

/// カメラ映像のプレビュー供給元
pub trait PreviewSource: Send + Sync {
    /// 最新フレームを指定サイズに縮小して返す。初回フレーム到着前は None。
    fn preview(&self, width: usize, height: usize) -> Option<CameraFrame>;
}
