use anyhow::Result;

use super::keypoint::Pose;

/// 姿勢推定の入力元
///
/// `estimate` はブロッキングしてよい（推論・フレーム待ち）。
/// 呼び出し側が blocking プールで実行する。
pub trait PoseSource: Send + 'static {
    /// 1回分の推定結果。人物が検出されなければ `Ok(None)`。
    fn estimate(&mut self) -> Result<Option<Pose>>;
}

impl<F> PoseSource for F
where
    F: FnMut() -> Result<Option<Pose>> + Send + 'static,
{
    fn estimate(&mut self) -> Result<Option<Pose>> {
        self()
    }
}

/// 事前に用意した結果を順番に返すソース。使い切ったら `None` を返し続ける。
pub struct ScriptedSource {
    samples: std::vec::IntoIter<Option<Pose>>,
}

impl ScriptedSource {
    pub fn new(samples: Vec<Option<Pose>>) -> Self {
        Self {
            samples: samples.into_iter(),
        }
    }
}

impl PoseSource for ScriptedSource {
    fn estimate(&mut self) -> Result<Option<Pose>> {
        Ok(self.samples.next().flatten())
    }
}
