use anyhow::{Context, Result};
use ndarray::Array4;
use opencv::prelude::*;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::keypoint::{Keypoint, KeypointIndex, Pose};
use super::preprocess::preprocess_for_movenet;
use super::source::PoseSource;
use crate::camera::ThreadedCamera;

/// 新フレームを待つ最大時間。超えたら「検出なし」として返す。
const FRAME_WAIT_TIMEOUT: Duration = Duration::from_millis(500);

/// MoveNet SinglePose Lightning を使用した姿勢検出器
pub struct PoseDetector {
    session: Session,
}

impl PoseDetector {
    /// ONNXモデルを読み込んで初期化
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let model_path = model_path.as_ref();
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(model_path)
            .with_context(|| format!("Failed to load ONNX model {}", model_path.display()))?;

        Ok(Self { session })
    }

    /// 前処理済みテンソルから姿勢を検出
    ///
    /// 入力: [1, 192, 192, 3] の f32 テンソル
    /// 出力: 元フレーム (frame_width x frame_height) のピクセル座標の Pose
    pub fn detect(&mut self, input: Array4<f32>, frame_width: f32, frame_height: f32) -> Result<Pose> {
        let input_tensor = Tensor::from_array(input)?;
        let outputs = self
            .session
            .run(ort::inputs!["serving_default_input_0" => input_tensor])
            .context("Inference failed")?;

        // MoveNet の出力は [1, 1, 17, 3] (y, x, confidence)、座標は 0.0〜1.0
        let output: ndarray::ArrayViewD<f32> = outputs["StatefulPartitionedCall_0"]
            .try_extract_array()
            .context("Failed to extract output tensor")?;

        let keypoints = KeypointIndex::ALL
            .iter()
            .enumerate()
            .map(|(i, &part)| {
                let y = output[[0, 0, i, 0]] * frame_height;
                let x = output[[0, 0, i, 1]] * frame_width;
                Keypoint::new(part, x, y, output[[0, 0, i, 2]])
            })
            .collect();

        Ok(Pose::new(keypoints))
    }
}

/// カメラスレッドの最新フレームに MoveNet をかけるソース
pub struct MoveNetSource {
    camera: Arc<ThreadedCamera>,
    detector: PoseDetector,
    min_pose_score: f32,
    last_frame_id: u64,
}

impl MoveNetSource {
    pub fn new(camera: Arc<ThreadedCamera>, detector: PoseDetector, min_pose_score: f32) -> Self {
        Self {
            camera,
            detector,
            min_pose_score,
            last_frame_id: 0,
        }
    }
}

impl PoseSource for MoveNetSource {
    fn estimate(&mut self) -> Result<Option<Pose>> {
        let deadline = Instant::now() + FRAME_WAIT_TIMEOUT;
        let frame = loop {
            let frame_id = self.camera.frame_id();
            if frame_id != self.last_frame_id {
                if let Some(frame) = self.camera.get_frame() {
                    self.last_frame_id = frame_id;
                    break frame;
                }
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
            std::thread::sleep(Duration::from_millis(1));
        };

        let (width, height) = (frame.cols() as f32, frame.rows() as f32);
        let input = preprocess_for_movenet(&frame)?;
        let pose = self.detector.detect(input, width, height)?;

        if pose.average_confidence() < self.min_pose_score {
            return Ok(None);
        }
        Ok(Some(pose))
    }
}
