use anyhow::Result;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::time::{self, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::camera::PreviewSource;
use crate::config::Config;
use crate::log;
use crate::logging::Logger;
use crate::pose::Pose;
use crate::render::{draw_scene, Canvas, Display, Input};

use super::session::{finish_message, GameEvent, GamePhase, GameSession};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Quit,
}

/// ゲームループ本体
///
/// セッション・キャンバス・表示先を単独で所有し、
/// 姿勢サンプル / カウントダウン / フレーム描画を 1 つの select ループで処理する。
pub struct GameController<D: Display> {
    session: GameSession,
    display: D,
    canvas: Canvas,
    preview: Option<Arc<dyn PreviewSource>>,
    preview_size: (usize, usize),
    frame_interval: Duration,
    verbose: bool,
    logger: Logger,
}

impl<D: Display> GameController<D> {
    pub fn new(config: &Config, display: D, logger: Logger) -> Self {
        let width = config.display.width as usize;
        let height = config.display.height as usize;
        let fps = config.app.target_fps.max(1);
        Self {
            session: GameSession::new(config.game.clone(), width as f32, height as f32),
            display,
            canvas: Canvas::new(width, height),
            preview: None,
            preview_size: (
                config.display.preview_width as usize,
                config.display.preview_height as usize,
            ),
            frame_interval: Duration::from_secs_f64(1.0 / fps as f64),
            verbose: config.app.verbose,
            logger,
        }
    }

    pub fn with_preview(mut self, preview: Arc<dyn PreviewSource>) -> Self {
        self.preview = Some(preview);
        self
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// 姿勢サンプル 1 件
    pub fn handle_pose(&mut self, pose: Option<&Pose>) -> Option<GameEvent> {
        let event = self.session.on_pose(pose);
        if event == Some(GameEvent::CountdownStarted) {
            log!(self.logger, "[game] start gesture detected, countdown started");
        }
        event
    }

    /// カウントダウン 1 ティック
    pub fn handle_countdown_tick(&mut self, now: Instant) -> Option<GameEvent> {
        let event = self.session.countdown_tick(now);
        match event {
            Some(GameEvent::CountdownTick(n)) => log!(self.logger, "[countdown] {}", n),
            Some(GameEvent::RunStarted) => log!(self.logger, "[countdown] 0, run started"),
            _ => {}
        }
        event
    }

    /// 1 フレーム: 入力処理 → 描画 → 前進・ゴール判定 → 表示
    ///
    /// ゴール後はリセットされるまで描画も前進もしない（最後の画面を出し続ける）。
    pub fn frame(&mut self, now: Instant) -> Result<FrameOutcome> {
        for input in self.display.poll_input() {
            match input {
                Input::Quit => return Ok(FrameOutcome::Quit),
                Input::Reset => {
                    if self.session.reset().is_some() {
                        log!(self.logger, "[game] reset");
                    }
                }
            }
        }
        if !self.display.is_open() {
            return Ok(FrameOutcome::Quit);
        }

        if !matches!(self.session.phase(), GamePhase::Finished { .. }) {
            let (pw, ph) = self.preview_size;
            let preview = self.preview.as_ref().and_then(|p| p.preview(pw, ph));
            draw_scene(&mut self.canvas, &self.session, preview.as_ref(), self.preview_size);

            if let Some(GameEvent::Finished { elapsed }) = self.session.advance(now) {
                let message = finish_message(elapsed);
                log!(self.logger, "[game] {}", message);
                self.display.alert(&message);
            }
        }

        self.display.present(&self.canvas, &self.session.hud())?;
        Ok(FrameOutcome::Continue)
    }

    /// トークンがキャンセルされるか、表示が閉じられるか、姿勢チャネルが閉じるまで回す。
    /// 表示側の終了時はトークンをキャンセルして姿勢ポーリングも止める。
    pub async fn run(
        &mut self,
        mut poses: mpsc::Receiver<Option<Pose>>,
        token: CancellationToken,
    ) -> Result<()> {
        let mut frames = time::interval(self.frame_interval);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut countdown: Option<Interval> = None;

        let mut frame_count = 0u32;
        let mut fps_timer = Instant::now();

        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                sample = poses.recv() => {
                    let Some(pose) = sample else {
                        log!(self.logger, "[pose] source closed");
                        break;
                    };
                    if self.handle_pose(pose.as_ref()) == Some(GameEvent::CountdownStarted) {
                        let period = self.session.countdown_interval();
                        countdown = Some(time::interval_at(time::Instant::now() + period, period));
                    }
                }
                _ = next_countdown_tick(&mut countdown) => {
                    if self.handle_countdown_tick(now()) == Some(GameEvent::RunStarted) {
                        countdown = None;
                    }
                }
                _ = frames.tick() => {
                    if self.frame(now())? == FrameOutcome::Quit {
                        log!(self.logger, "[app] display closed");
                        token.cancel();
                        break;
                    }

                    frame_count += 1;
                    let elapsed = fps_timer.elapsed().as_secs_f32();
                    if self.verbose && elapsed >= 1.0 {
                        log!(
                            self.logger,
                            "[fps] {:.1} run_speed={:.1} x={:.0}",
                            frame_count as f32 / elapsed,
                            self.session.run_speed(),
                            self.session.character().x
                        );
                        frame_count = 0;
                        fps_timer = Instant::now();
                    }
                }
            }
        }
        Ok(())
    }
}

fn now() -> Instant {
    time::Instant::now().into_std()
}

async fn next_countdown_tick(countdown: &mut Option<Interval>) {
    match countdown {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
