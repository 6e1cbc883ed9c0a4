use anyhow::Result;
use ndarray::Array4;
use opencv::{
    core::{Mat, Size, Vec3b},
    imgproc,
    prelude::*,
};

/// MoveNet用の入力サイズ
pub const MOVENET_INPUT_SIZE: i32 = 192;

/// BGR フレームを MoveNet の入力テンソル [1, 192, 192, 3] (RGB, 0.0-255.0) に変換
///
/// アスペクト比は保持しない（モデル出力の正規化座標がそのまま元フレームに対応する）
pub fn preprocess_for_movenet(frame: &Mat) -> Result<Array4<f32>> {
    let mut resized = Mat::default();
    imgproc::resize(
        frame,
        &mut resized,
        Size::new(MOVENET_INPUT_SIZE, MOVENET_INPUT_SIZE),
        0.0,
        0.0,
        imgproc::INTER_LINEAR,
    )?;

    let size = MOVENET_INPUT_SIZE as usize;
    let mut tensor = Array4::<f32>::zeros((1, size, size, 3));
    for y in 0..size {
        for x in 0..size {
            let bgr = resized.at_2d::<Vec3b>(y as i32, x as i32)?;
            tensor[[0, y, x, 0]] = bgr[2] as f32;
            tensor[[0, y, x, 1]] = bgr[1] as f32;
            tensor[[0, y, x, 2]] = bgr[0] as f32;
        }
    }

    Ok(tensor)
}
