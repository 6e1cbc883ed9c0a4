use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use talava_dash::camera::ThreadedCamera;
use talava_dash::config::Config;
use talava_dash::game::GameController;
use talava_dash::log;
use talava_dash::logging::Logger;
use talava_dash::pose::{MoveNetSource, PoseDetector, PosePoller};
use talava_dash::render::MinifbRenderer;

const CONFIG_PATH: &str = "config.toml";
const APP_NAME: &str = "Talava Dash";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = Config::load_or_default(CONFIG_PATH);
    let (logger, log_path) = Logger::open(&config.app.log_dir, "dash")?;

    log!(logger, "{} ({})", APP_NAME, env!("GIT_VERSION"));
    log!(logger, "Log: {}", log_path.display());
    log!(
        logger,
        "[config] base_speed={}, speed_multiplier={}, countdown={}x{}ms, target_fps={}",
        config.game.base_speed,
        config.game.speed_multiplier,
        config.game.countdown_from,
        config.game.countdown_interval_ms,
        config.app.target_fps
    );

    let camera = ThreadedCamera::start(config.camera.index, config.camera.width, config.camera.height)
        .context("camera setup failed")?;
    let camera = Arc::new(camera);
    let (width, height) = camera.resolution();
    log!(logger, "Camera: {}x{}", width, height);

    log!(logger, "Loading model from {}...", config.pose.model_path);
    let detector = PoseDetector::new(&config.pose.model_path)?;
    log!(logger, "Pose model loaded");

    let renderer = MinifbRenderer::new(
        APP_NAME,
        config.display.width as usize,
        config.display.height as usize,
    )?;
    log!(logger, "右手を頭の上に挙げるとスタート  [R] リトライ  [Esc] 終了");

    let token = CancellationToken::new();
    let (tx, rx) = mpsc::channel(4);
    let source = MoveNetSource::new(Arc::clone(&camera), detector, config.pose.min_pose_score);
    let poller = PosePoller::spawn(source, tx, token.child_token());

    let mut controller =
        GameController::new(&config, renderer, logger.clone()).with_preview(camera.clone());
    let run_result = controller.run(rx, token.clone()).await;

    token.cancel();
    let poll_result = poller.shutdown().await;
    log!(logger, "Shutting down...");

    run_result?;
    poll_result?;
    Ok(())
}
