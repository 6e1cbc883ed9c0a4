use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::keypoint::Pose;
use super::source::PoseSource;

/// 姿勢推定を繰り返し実行し、結果をチャネルへ流すタスク
///
/// 推定は blocking プールで実行する。停止条件:
/// トークンのキャンセル / 受信側のドロップ / ソースのエラー（タスクの戻り値になる）
pub struct PosePoller {
    token: CancellationToken,
    handle: JoinHandle<Result<()>>,
}

impl PosePoller {
    pub fn spawn<S: PoseSource>(
        source: S,
        tx: mpsc::Sender<Option<Pose>>,
        token: CancellationToken,
    ) -> Self {
        let handle = tokio::spawn(poll_loop(source, tx, token.clone()));
        Self { token, handle }
    }

    pub fn stop(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// タスク終了を待ち、ソースのエラーがあれば返す
    pub async fn join(self) -> Result<()> {
        self.handle.await.context("pose poller task failed")?
    }

    pub async fn shutdown(self) -> Result<()> {
        self.stop();
        self.join().await
    }
}

async fn poll_loop<S: PoseSource>(
    mut source: S,
    tx: mpsc::Sender<Option<Pose>>,
    token: CancellationToken,
) -> Result<()> {
    loop {
        let job = tokio::task::spawn_blocking(move || {
            let result = source.estimate();
            (source, result)
        });

        let (returned, result) = tokio::select! {
            _ = token.cancelled() => return Ok(()),
            joined = job => joined.context("pose source panicked")?,
        };
        source = returned;
        let pose = result.context("pose estimation failed")?;

        tokio::select! {
            _ = token.cancelled() => return Ok(()),
            sent = tx.send(pose) => {
                if sent.is_err() {
                    return Ok(());
                }
            }
        }
    }
}
