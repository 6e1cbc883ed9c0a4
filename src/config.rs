use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub pose: PoseConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub app: AppConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    /// 毎フレームの基本移動量（ピクセル）
    #[serde(default = "default_base_speed")]
    pub base_speed: f32,
    /// ランスピードに掛ける倍率
    #[serde(default = "default_speed_multiplier")]
    pub speed_multiplier: f32,
    /// カウントダウン開始値 (3 → 2 → 1 → 0)
    #[serde(default = "default_countdown_from")]
    pub countdown_from: u32,
    /// カウントダウン1ティックの間隔（ミリ秒）
    #[serde(default = "default_countdown_interval_ms")]
    pub countdown_interval_ms: u64,
    /// スタートジェスチャー（右手首）の信頼度閾値
    #[serde(default = "default_start_confidence")]
    pub start_confidence: f32,
    #[serde(default = "default_character_start_x")]
    pub character_start_x: f32,
    #[serde(default = "default_character_width")]
    pub character_width: f32,
    #[serde(default = "default_character_height")]
    pub character_height: f32,
    /// 画面右端からゴールラインまでの距離
    #[serde(default = "default_finish_line_offset")]
    pub finish_line_offset: f32,
    #[serde(default = "default_finish_line_width")]
    pub finish_line_width: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    #[serde(default)]
    pub index: i32,
    #[serde(default = "default_camera_width")]
    pub width: u32,
    #[serde(default = "default_camera_height")]
    pub height: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PoseConfig {
    #[serde(default = "default_model_path")]
    pub model_path: String,
    /// 全キーポイント平均信頼度がこれ未満なら「人物なし」
    #[serde(default = "default_min_pose_score")]
    pub min_pose_score: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_display_width")]
    pub width: u32,
    #[serde(default = "default_display_height")]
    pub height: u32,
    /// 左上に表示するカメラプレビューのサイズ
    #[serde(default = "default_preview_width")]
    pub preview_width: u32,
    #[serde(default = "default_preview_height")]
    pub preview_height: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    /// FPS などを毎秒ログに出す
    #[serde(default)]
    pub verbose: bool,
}

fn default_base_speed() -> f32 { 5.0 }
fn default_speed_multiplier() -> f32 { 10.0 }
fn default_countdown_from() -> u32 { 3 }
fn default_countdown_interval_ms() -> u64 { 1000 }
fn default_start_confidence() -> f32 { 0.5 }
fn default_character_start_x() -> f32 { 50.0 }
fn default_character_width() -> f32 { 50.0 }
fn default_character_height() -> f32 { 100.0 }
fn default_finish_line_offset() -> f32 { 100.0 }
fn default_finish_line_width() -> f32 { 10.0 }
fn default_camera_width() -> u32 { 640 }
fn default_camera_height() -> u32 { 480 }
fn default_model_path() -> String { "models/movenet_lightning.onnx".to_string() }
fn default_min_pose_score() -> f32 { 0.25 }
fn default_display_width() -> u32 { 1280 }
fn default_display_height() -> u32 { 720 }
fn default_preview_width() -> u32 { 320 }
fn default_preview_height() -> u32 { 180 }
fn default_target_fps() -> u32 { 60 }
fn default_log_dir() -> String { "logs".to_string() }

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            base_speed: default_base_speed(),
            speed_multiplier: default_speed_multiplier(),
            countdown_from: default_countdown_from(),
            countdown_interval_ms: default_countdown_interval_ms(),
            start_confidence: default_start_confidence(),
            character_start_x: default_character_start_x(),
            character_width: default_character_width(),
            character_height: default_character_height(),
            finish_line_offset: default_finish_line_offset(),
            finish_line_width: default_finish_line_width(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: 0,
            width: default_camera_width(),
            height: default_camera_height(),
        }
    }
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            min_pose_score: default_min_pose_score(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: default_display_width(),
            height: default_display_height(),
            preview_width: default_preview_width(),
            preview_height: default_preview_height(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            target_fps: default_target_fps(),
            log_dir: default_log_dir(),
            verbose: false,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("invalid config")?;
        Ok(config)
    }

    /// ファイルがなければデフォルト、壊れていれば警告してデフォルト
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("[config] {e:#}, using defaults");
                Self::default()
            }
        }
    }
}
