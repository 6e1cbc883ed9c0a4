use crate::camera::CameraFrame;
use crate::game::GameSession;

use super::canvas::Canvas;

/// 背景色 (RGB)
pub const BACKGROUND_COLOR: u32 = 0x000000;

/// キャラクターの色 (RGB)
pub const CHARACTER_COLOR: u32 = 0xFF0000; // 赤

/// ゴールラインの色 (RGB)
pub const FINISH_LINE_COLOR: u32 = 0xFFFFFF; // 白

/// 1フレーム分の描画: クリア → カメラプレビュー → ゴールライン → キャラクター
pub fn draw_scene(
    canvas: &mut Canvas,
    session: &GameSession,
    preview: Option<&CameraFrame>,
    preview_size: (usize, usize),
) {
    canvas.clear(BACKGROUND_COLOR);
    if let Some(frame) = preview {
        canvas.draw_mirrored(frame, preview_size.0, preview_size.1);
    }
    canvas.fill_rect(session.finish_line(), FINISH_LINE_COLOR);
    canvas.fill_rect(session.character(), CHARACTER_COLOR);
}
