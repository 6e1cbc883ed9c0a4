use std::time::Instant;

use crate::config::GameConfig;
use crate::pose::{KeypointIndex, Pose};
use crate::render::Hud;

use super::countdown::{Countdown, CountdownTick};
use super::geometry::Rect;
use super::motion::MotionExtractor;

/// ゲームの進行状態
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GamePhase {
    /// スタートジェスチャー待ち
    Idle,
    CountingDown(Countdown),
    Running { started_at: Instant },
    /// ゴール済み。リセットまでループは止まる。
    Finished { elapsed: f32 },
}

/// 状態遷移の通知
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    CountdownStarted,
    CountdownTick(u32),
    RunStarted,
    Finished { elapsed: f32 },
    Reset,
}

/// 1レース分の状態。コントローラが単独で所有する。
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    canvas_width: f32,
    character: Rect,
    finish_line: Rect,
    motion: MotionExtractor,
    run_speed: f32,
    phase: GamePhase,
    elapsed: f32,
}

impl GameSession {
    pub fn new(config: GameConfig, canvas_width: f32, canvas_height: f32) -> Self {
        let character = Rect::new(
            config.character_start_x,
            canvas_height - config.character_height,
            config.character_width,
            config.character_height,
        );
        let finish_line = Rect::new(
            canvas_width - config.finish_line_offset,
            0.0,
            config.finish_line_width,
            canvas_height,
        );
        Self {
            config,
            canvas_width,
            character,
            finish_line,
            motion: MotionExtractor::new(),
            run_speed: 0.0,
            phase: GamePhase::Idle,
            elapsed: 0.0,
        }
    }

    pub fn phase(&self) -> &GamePhase {
        &self.phase
    }

    pub fn character(&self) -> &Rect {
        &self.character
    }

    pub fn finish_line(&self) -> &Rect {
        &self.finish_line
    }

    pub fn run_speed(&self) -> f32 {
        self.run_speed
    }

    pub fn motion(&self) -> &MotionExtractor {
        &self.motion
    }

    /// 経過秒数（Running 中は最後の advance 時点）
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn countdown_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.config.countdown_interval_ms)
    }

    /// 基本速度 + ランスピード × 倍率
    pub fn move_speed(&self) -> f32 {
        self.config.base_speed + self.run_speed * self.config.speed_multiplier
    }

    /// 姿勢サンプルを処理する。スタートジェスチャーなら CountdownStarted。
    pub fn on_pose(&mut self, pose: Option<&Pose>) -> Option<GameEvent> {
        self.run_speed = self.motion.update_from_pose(pose);

        let pose = pose?;
        if self.phase == GamePhase::Idle && self.is_start_gesture(pose) {
            self.phase = GamePhase::CountingDown(Countdown::new(self.config.countdown_from));
            return Some(GameEvent::CountdownStarted);
        }
        None
    }

    /// 右手首が十分な信頼度で鼻 (keypoints[0]) より上にある
    fn is_start_gesture(&self, pose: &Pose) -> bool {
        let (Some(wrist), Some(nose)) = (pose.find(KeypointIndex::RightWrist), pose.first()) else {
            return false;
        };
        wrist.is_confident(self.config.start_confidence) && wrist.y < nose.y
    }

    /// カウントダウン 1 ティック。0 を表示したら Running へ。
    pub fn countdown_tick(&mut self, now: Instant) -> Option<GameEvent> {
        let GamePhase::CountingDown(countdown) = &mut self.phase else {
            return None;
        };
        match countdown.tick() {
            CountdownTick::Show(n) => Some(GameEvent::CountdownTick(n)),
            CountdownTick::Done => {
                self.phase = GamePhase::Running { started_at: now };
                self.elapsed = 0.0;
                Some(GameEvent::RunStarted)
            }
        }
    }

    /// 1フレーム分キャラクターを進め、タイマーを更新し、ゴール判定する
    pub fn advance(&mut self, now: Instant) -> Option<GameEvent> {
        let GamePhase::Running { started_at } = self.phase else {
            return None;
        };

        self.character.x += self.move_speed();
        self.character.clamp_x(self.canvas_width);
        self.elapsed = now.saturating_duration_since(started_at).as_secs_f32();

        if self.character.right() >= self.finish_line.x {
            self.phase = GamePhase::Finished { elapsed: self.elapsed };
            return Some(GameEvent::Finished { elapsed: self.elapsed });
        }
        None
    }

    /// Finished → Idle。それ以外の状態では無視する。
    pub fn reset(&mut self) -> Option<GameEvent> {
        if !matches!(self.phase, GamePhase::Finished { .. }) {
            return None;
        }
        self.character.x = self.config.character_start_x;
        self.phase = GamePhase::Idle;
        self.elapsed = 0.0;
        self.run_speed = 0.0;
        self.motion.reset();
        Some(GameEvent::Reset)
    }

    pub fn hud(&self) -> Hud {
        let countdown = match &self.phase {
            GamePhase::CountingDown(c) => Some(c.shown().map(|n| n.to_string()).unwrap_or_default()),
            _ => None,
        };
        let alert = match self.phase {
            GamePhase::Finished { elapsed } => Some(finish_message(elapsed)),
            _ => None,
        };
        Hud {
            countdown,
            timer: timer_text(self.elapsed),
            alert,
        }
    }
}

pub fn timer_text(elapsed: f32) -> String {
    format!("Time: {:.2}s", elapsed)
}

pub fn finish_message(elapsed: f32) -> String {
    format!("You finished the 100m dash in {:.2} seconds!", elapsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::Keypoint;
    use std::time::Duration;

    const WIDTH: f32 = 1280.0;
    const HEIGHT: f32 = 720.0;

    fn session() -> GameSession {
        GameSession::new(GameConfig::default(), WIDTH, HEIGHT)
    }

    fn pose(nose_y: f32, wrist_y: f32, wrist_conf: f32, knees: (f32, f32)) -> Pose {
        Pose::new(vec![
            Keypoint::new(KeypointIndex::Nose, 320.0, nose_y, 0.9),
            Keypoint::new(KeypointIndex::RightWrist, 280.0, wrist_y, wrist_conf),
            Keypoint::new(KeypointIndex::LeftKnee, 300.0, knees.0, 0.8),
            Keypoint::new(KeypointIndex::RightKnee, 340.0, knees.1, 0.8),
        ])
    }

    fn hand_up() -> Pose {
        pose(100.0, 50.0, 0.9, (400.0, 400.0))
    }

    fn hand_down() -> Pose {
        pose(100.0, 300.0, 0.9, (400.0, 400.0))
    }

    fn start_running(s: &mut GameSession, t0: Instant) {
        assert_eq!(s.on_pose(Some(&hand_up())), Some(GameEvent::CountdownStarted));
        for _ in 0..3 {
            s.countdown_tick(t0);
        }
        assert_eq!(s.countdown_tick(t0), Some(GameEvent::RunStarted));
    }

    #[test]
    fn test_initial_layout() {
        let s = session();
        assert_eq!(*s.character(), Rect::new(50.0, HEIGHT - 100.0, 50.0, 100.0));
        assert_eq!(*s.finish_line(), Rect::new(WIDTH - 100.0, 0.0, 10.0, HEIGHT));
        assert_eq!(*s.phase(), GamePhase::Idle);
    }

    #[test]
    fn test_hand_above_nose_starts_countdown() {
        let mut s = session();
        assert_eq!(s.on_pose(Some(&hand_down())), None);
        assert_eq!(s.on_pose(Some(&hand_up())), Some(GameEvent::CountdownStarted));
        assert!(matches!(s.phase(), GamePhase::CountingDown(_)));
    }

    #[test]
    fn test_low_confidence_wrist_is_ignored() {
        let mut s = session();
        assert_eq!(s.on_pose(Some(&pose(100.0, 50.0, 0.5, (0.0, 0.0)))), None);
        assert_eq!(*s.phase(), GamePhase::Idle);
    }

    #[test]
    fn test_missing_wrist_or_empty_pose_is_ignored() {
        let mut s = session();
        let no_wrist = Pose::new(vec![Keypoint::new(KeypointIndex::Nose, 0.0, 100.0, 0.9)]);
        assert_eq!(s.on_pose(Some(&no_wrist)), None);
        assert_eq!(s.on_pose(Some(&Pose::default())), None);
        assert_eq!(s.on_pose(None), None);
        assert_eq!(*s.phase(), GamePhase::Idle);
    }

    #[test]
    fn test_gesture_ignored_while_counting_down_or_running() {
        let mut s = session();
        let t0 = Instant::now();
        s.on_pose(Some(&hand_up()));
        s.countdown_tick(t0);
        assert_eq!(s.on_pose(Some(&hand_up())), None);
        assert_eq!(s.hud().countdown.as_deref(), Some("3"));

        s.countdown_tick(t0);
        s.countdown_tick(t0);
        s.countdown_tick(t0);
        assert!(matches!(s.phase(), GamePhase::Running { .. }));
        assert_eq!(s.on_pose(Some(&hand_up())), None);
        assert!(matches!(s.phase(), GamePhase::Running { .. }));
    }

    #[test]
    fn test_countdown_sequence() {
        let mut s = session();
        let t0 = Instant::now();
        s.on_pose(Some(&hand_up()));
        assert_eq!(s.hud().countdown.as_deref(), Some(""));
        assert_eq!(s.countdown_tick(t0), Some(GameEvent::CountdownTick(3)));
        assert_eq!(s.countdown_tick(t0), Some(GameEvent::CountdownTick(2)));
        assert_eq!(s.countdown_tick(t0), Some(GameEvent::CountdownTick(1)));
        assert_eq!(s.countdown_tick(t0), Some(GameEvent::RunStarted));
        assert_eq!(*s.phase(), GamePhase::Running { started_at: t0 });
        assert_eq!(s.hud().countdown, None);
        assert_eq!(s.countdown_tick(t0), None);
    }

    #[test]
    fn test_advance_only_while_running() {
        let mut s = session();
        let t0 = Instant::now();
        assert_eq!(s.advance(t0), None);
        assert_eq!(s.character().x, 50.0);

        s.on_pose(Some(&hand_up()));
        s.advance(t0);
        assert_eq!(s.character().x, 50.0);
    }

    #[test]
    fn test_knee_scenario_move_speed() {
        let mut s = session();
        let t0 = Instant::now();
        start_running(&mut s, t0);

        s.on_pose(Some(&pose(100.0, 300.0, 0.9, (100.0, 100.0))));
        s.on_pose(Some(&pose(100.0, 300.0, 0.9, (90.0, 95.0))));
        assert_eq!(s.run_speed(), 15.0);
        assert_eq!(s.move_speed(), 155.0);

        s.advance(t0 + Duration::from_millis(16));
        assert_eq!(s.character().x, 205.0);
    }

    #[test]
    fn test_base_speed_without_motion() {
        let mut s = session();
        let t0 = Instant::now();
        start_running(&mut s, t0);
        s.on_pose(None);
        s.advance(t0);
        assert_eq!(s.character().x, 55.0);
    }

    #[test]
    fn test_character_clamped_to_canvas() {
        let mut s = GameSession::new(GameConfig::default(), 300.0, 200.0);
        let t0 = Instant::now();
        start_running(&mut s, t0);
        s.on_pose(Some(&pose(100.0, 300.0, 0.9, (0.0, 0.0))));
        s.on_pose(Some(&pose(100.0, 300.0, 0.9, (500.0, 500.0))));
        s.advance(t0);
        assert_eq!(s.character().x, 300.0 - 50.0);
        assert!(s.character().x >= 0.0);
    }

    #[test]
    fn test_negative_speed_clamped_at_zero() {
        let config = GameConfig {
            base_speed: -500.0,
            ..GameConfig::default()
        };
        let mut s = GameSession::new(config, WIDTH, HEIGHT);
        let t0 = Instant::now();
        start_running(&mut s, t0);
        s.advance(t0);
        assert_eq!(s.character().x, 0.0);
    }

    #[test]
    fn test_timer_and_finish() {
        let mut s = session();
        let t0 = Instant::now();
        start_running(&mut s, t0);

        assert_eq!(s.advance(t0 + Duration::from_millis(1500)), None);
        assert!((s.elapsed() - 1.5).abs() < 1e-4);
        assert_eq!(s.hud().timer, "Time: 1.50s");

        // 5px/フレームでゴール (x + 50 >= 1180) まで進める
        let mut finished = None;
        for i in 2..1000u64 {
            if let Some(event) = s.advance(t0 + Duration::from_millis(1500 + i)) {
                finished = Some(event);
                break;
            }
        }
        let Some(GameEvent::Finished { elapsed }) = finished else {
            panic!("never finished");
        };
        assert!(s.character().right() >= s.finish_line().x);
        assert_eq!(*s.phase(), GamePhase::Finished { elapsed });
        assert_eq!(s.hud().alert, Some(finish_message(elapsed)));

        // 停止中は進まない
        let x = s.character().x;
        assert_eq!(s.advance(t0 + Duration::from_secs(60)), None);
        assert_eq!(s.character().x, x);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut s = GameSession::new(GameConfig::default(), 400.0, 300.0);
        let t0 = Instant::now();
        start_running(&mut s, t0);
        s.on_pose(Some(&pose(100.0, 300.0, 0.9, (100.0, 100.0))));
        s.on_pose(Some(&pose(100.0, 300.0, 0.9, (130.0, 70.0))));
        assert!(matches!(s.advance(t0 + Duration::from_secs(2)), Some(GameEvent::Finished { .. })));

        assert_eq!(s.reset(), Some(GameEvent::Reset));
        assert_eq!(*s.phase(), GamePhase::Idle);
        assert_eq!(s.character().x, 50.0);
        assert_eq!(s.elapsed(), 0.0);
        assert_eq!(s.motion().previous(), None);
        assert_eq!(s.hud().timer, "Time: 0.00s");
        assert_eq!(s.hud().alert, None);
    }

    #[test]
    fn test_reset_ignored_unless_finished() {
        let mut s = session();
        assert_eq!(s.reset(), None);
        let t0 = Instant::now();
        start_running(&mut s, t0);
        assert_eq!(s.reset(), None);
        assert!(matches!(s.phase(), GamePhase::Running { .. }));
    }

    #[test]
    fn test_messages() {
        assert_eq!(timer_text(0.0), "Time: 0.00s");
        assert_eq!(finish_message(12.345), "You finished the 100m dash in 12.35 seconds!");
    }
}
