use anyhow::Result;

use super::canvas::Canvas;
use super::hud::Hud;

/// プレイヤーからの入力
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Reset,
    Quit,
}

/// 描画先（ウィンドウなど）
pub trait Display {
    /// 閉じられたら false
    fn is_open(&self) -> bool;

    /// キャンバスとHUDを表示
    fn present(&mut self, canvas: &Canvas, hud: &Hud) -> Result<()>;

    /// ゴール時のメッセージを表示
    fn alert(&mut self, message: &str);

    /// 前回呼び出し以降の入力
    fn poll_input(&mut self) -> Vec<Input>;
}
