use anyhow::Result;
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use super::canvas::Canvas;
use super::display::{Display, Input};
use super::hud::Hud;

/// minifb ウィンドウ。HUD はタイトルバーに表示する。
pub struct MinifbRenderer {
    window: Window,
    app_name: String,
    last_title: String,
}

impl MinifbRenderer {
    /// ウィンドウを作成
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let window = Window::new(
            title,
            width,
            height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;

        Ok(Self {
            window,
            app_name: title.to_string(),
            last_title: title.to_string(),
        })
    }

    fn set_title(&mut self, title: String) {
        if title != self.last_title {
            self.window.set_title(&title);
            self.last_title = title;
        }
    }
}

impl Display for MinifbRenderer {
    fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    fn present(&mut self, canvas: &Canvas, hud: &Hud) -> Result<()> {
        let title = hud.title(&self.app_name);
        self.set_title(title);
        self.window
            .update_with_buffer(canvas.buffer(), canvas.width(), canvas.height())?;
        Ok(())
    }

    fn alert(&mut self, message: &str) {
        let title = format!("{} | {} [R] retry", self.app_name, message);
        self.set_title(title);
    }

    fn poll_input(&mut self) -> Vec<Input> {
        // キー状態は直前の present (update_with_buffer) 時点のもの
        let mut inputs = Vec::new();
        if self.window.is_key_pressed(Key::R, KeyRepeat::No)
            || self.window.is_key_pressed(Key::Enter, KeyRepeat::No)
        {
            inputs.push(Input::Reset);
        }
        if !self.is_open() {
            inputs.push(Input::Quit);
        }
        inputs
    }
}
