use anyhow::{bail, Context, Result};
use opencv::{
    core::{Mat, Size, Vec3b},
    imgproc,
    prelude::*,
    videoio::{self, VideoCapture, VideoCaptureAPIs},
};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use super::frame::{CameraFrame, PreviewSource};

/// OpenCVを使用したカメラキャプチャ
pub struct OpenCvCamera {
    capture: VideoCapture,
    width: u32,
    height: u32,
}

impl OpenCvCamera {
    /// 解像度を指定してカメラを開く（実際の解像度はドライバ次第）
    pub fn open(index: i32, width: u32, height: u32) -> Result<Self> {
        let mut capture = VideoCapture::new(index, VideoCaptureAPIs::CAP_ANY as i32)
            .with_context(|| format!("Failed to open camera {}", index))?;

        if !capture.is_opened()? {
            bail!("Camera {} is not available", index);
        }

        capture.set(videoio::CAP_PROP_FRAME_WIDTH, width as f64)?;
        capture.set(videoio::CAP_PROP_FRAME_HEIGHT, height as f64)?;
        capture.set(videoio::CAP_PROP_BUFFERSIZE, 1.0)?;

        let actual_width = capture.get(videoio::CAP_PROP_FRAME_WIDTH)? as u32;
        let actual_height = capture.get(videoio::CAP_PROP_FRAME_HEIGHT)? as u32;

        Ok(Self {
            capture,
            width: actual_width,
            height: actual_height,
        })
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// フレームを読み込む（BGR形式）
    pub fn read_frame(&mut self) -> Result<Mat> {
        let mut frame = Mat::default();
        self.capture
            .read(&mut frame)
            .context("Failed to read frame")?;

        if frame.empty() {
            bail!("Empty frame received");
        }

        Ok(frame)
    }
}

/// 別スレッドでカメラキャプチャを行い、最新フレームを提供する
pub struct ThreadedCamera {
    latest: Arc<Mutex<Option<Mat>>>,
    frame_id: Arc<AtomicU64>,
    running: Arc<AtomicBool>,
    width: u32,
    height: u32,
    handle: Option<thread::JoinHandle<()>>,
}

impl ThreadedCamera {
    pub fn start(index: i32, width: u32, height: u32) -> Result<Self> {
        let mut camera = OpenCvCamera::open(index, width, height)?;
        let (w, h) = camera.resolution();
        let latest = Arc::new(Mutex::new(None::<Mat>));
        let frame_id = Arc::new(AtomicU64::new(0));
        let running = Arc::new(AtomicBool::new(true));

        let latest_ref = Arc::clone(&latest);
        let frame_id_ref = Arc::clone(&frame_id);
        let running_ref = Arc::clone(&running);
        let handle = thread::spawn(move || {
            while running_ref.load(Ordering::Relaxed) {
                match camera.read_frame() {
                    Ok(frame) => {
                        if let Ok(mut guard) = latest_ref.lock() {
                            *guard = Some(frame);
                        }
                        frame_id_ref.fetch_add(1, Ordering::Release);
                    }
                    Err(_) => thread::sleep(Duration::from_millis(5)),
                }
            }
        });

        Ok(Self {
            latest,
            frame_id,
            running,
            width: w,
            height: h,
            handle: Some(handle),
        })
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// 新フレームが到着するたびにインクリメントされる
    pub fn frame_id(&self) -> u64 {
        self.frame_id.load(Ordering::Acquire)
    }

    /// 最新フレーム。初回フレーム到着前のみNone。
    pub fn get_frame(&self) -> Option<Mat> {
        let guard = self.latest.lock().ok()?;
        guard.as_ref().map(|m| m.clone())
    }
}

impl Drop for ThreadedCamera {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl PreviewSource for ThreadedCamera {
    fn preview(&self, width: usize, height: usize) -> Option<CameraFrame> {
        let frame = self.get_frame()?;
        mat_to_frame(&frame, width, height).ok()
    }
}

/// BGR Mat を縮小して 0RGB バッファへ変換
pub fn mat_to_frame(frame: &Mat, width: usize, height: usize) -> Result<CameraFrame> {
    let mut resized = Mat::default();
    imgproc::resize(
        frame,
        &mut resized,
        Size::new(width as i32, height as i32),
        0.0,
        0.0,
        imgproc::INTER_AREA,
    )?;

    let mut pixels = Vec::with_capacity(width * height);
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            let p = resized.at_2d::<Vec3b>(y, x)?;
            pixels.push(((p[2] as u32) << 16) | ((p[1] as u32) << 8) | p[0] as u32);
        }
    }
    Ok(CameraFrame::new(width, height, pixels))
}
