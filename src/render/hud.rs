/// キャンバス以外に表示するテキスト
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hud {
    /// カウントダウン表示。None なら非表示。
    pub countdown: Option<String>,
    pub timer: String,
    /// ゴール時のメッセージ
    pub alert: Option<String>,
}

impl Hud {
    /// 1行にまとめた表示 (ウィンドウタイトル用)
    pub fn title(&self, app_name: &str) -> String {
        let mut title = format!("{} | {}", app_name, self.timer);
        if let Some(countdown) = &self.countdown {
            title.push_str(&format!(" | {}", countdown));
        }
        if let Some(alert) = &self.alert {
            title.push_str(&format!(" | {} [R] retry", alert));
        }
        title
    }
}
