use crate::pose::{KeypointIndex, Pose};

/// 膝の上下動からランスピードを算出する
///
/// 両膝が検出されたフレームだけ前回値を更新する。
/// 検出できなかったフレームは前回値をそのまま残し、スピードは 0。
#[derive(Debug, Default, Clone)]
pub struct MotionExtractor {
    prev: Option<(f32, f32)>,
}

impl MotionExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// 姿勢 1 サンプル分を処理してランスピードを返す
    pub fn update_from_pose(&mut self, pose: Option<&Pose>) -> f32 {
        let knees = pose.and_then(|p| {
            let left = p.find(KeypointIndex::LeftKnee)?;
            let right = p.find(KeypointIndex::RightKnee)?;
            Some((left.y, right.y))
        });
        match knees {
            Some((left_y, right_y)) => self.update(left_y, right_y),
            None => 0.0,
        }
    }

    /// 両膝の Y 座標から |ΔL| + |ΔR| を計算
    pub fn update(&mut self, left_y: f32, right_y: f32) -> f32 {
        let speed = match self.prev {
            Some((prev_left, prev_right)) => (left_y - prev_left).abs() + (right_y - prev_right).abs(),
            None => 0.0,
        };
        self.prev = Some((left_y, right_y));
        speed
    }

    /// 保存している前回値
    pub fn previous(&self) -> Option<(f32, f32)> {
        self.prev
    }

    pub fn reset(&mut self) {
        self.prev = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::Keypoint;

    fn knees(left_y: f32, right_y: f32) -> Pose {
        Pose::new(vec![
            Keypoint::new(KeypointIndex::Nose, 320.0, 80.0, 0.9),
            Keypoint::new(KeypointIndex::LeftKnee, 300.0, left_y, 0.8),
            Keypoint::new(KeypointIndex::RightKnee, 340.0, right_y, 0.8),
        ])
    }

    #[test]
    fn test_first_sample_is_zero() {
        let mut m = MotionExtractor::new();
        assert_eq!(m.update_from_pose(Some(&knees(100.0, 100.0))), 0.0);
        assert_eq!(m.previous(), Some((100.0, 100.0)));
    }

    #[test]
    fn test_sum_of_absolute_deltas() {
        let mut m = MotionExtractor::new();
        m.update_from_pose(Some(&knees(100.0, 100.0)));
        assert_eq!(m.update_from_pose(Some(&knees(90.0, 95.0))), 15.0);
        assert_eq!(m.update_from_pose(Some(&knees(110.0, 85.0))), 30.0);
    }

    #[test]
    fn test_speed_never_negative() {
        let mut m = MotionExtractor::new();
        let samples = [(200.0, 150.0), (120.0, 180.0), (120.0, 180.0), (90.0, 60.0), (300.0, 10.0)];
        for (l, r) in samples {
            assert!(m.update(l, r) >= 0.0);
        }
    }

    #[test]
    fn test_missing_pose_keeps_stale_history() {
        let mut m = MotionExtractor::new();
        m.update_from_pose(Some(&knees(100.0, 100.0)));
        assert_eq!(m.update_from_pose(None), 0.0);
        assert_eq!(m.previous(), Some((100.0, 100.0)));
        // 欠損前の値との差分になる
        assert_eq!(m.update_from_pose(Some(&knees(104.0, 97.0))), 7.0);
    }

    #[test]
    fn test_single_knee_is_not_detection() {
        let mut m = MotionExtractor::new();
        m.update_from_pose(Some(&knees(100.0, 100.0)));
        let one_knee = Pose::new(vec![Keypoint::new(KeypointIndex::LeftKnee, 0.0, 50.0, 0.9)]);
        assert_eq!(m.update_from_pose(Some(&one_knee)), 0.0);
        assert_eq!(m.previous(), Some((100.0, 100.0)));
    }

    #[test]
    fn test_reset_clears_history() {
        let mut m = MotionExtractor::new();
        m.update(100.0, 100.0);
        m.reset();
        assert_eq!(m.previous(), None);
        assert_eq!(m.update(10.0, 10.0), 0.0);
    }
}
