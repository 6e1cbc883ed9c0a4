/// スタート前のカウントダウン (3, 2, 1, 0)
///
/// 1ティックごとに次の数字を表示し、0 を表示したティックで完了する。
/// 最初のティックまでは何も表示しない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    next: u32,
    shown: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    /// 数字を表示した（まだ続く）
    Show(u32),
    /// 0 を表示した。ここでスタート。
    Done,
}

impl Countdown {
    pub fn new(from: u32) -> Self {
        Self { next: from, shown: None }
    }

    pub fn tick(&mut self) -> CountdownTick {
        let value = self.next;
        self.shown = Some(value);
        if value == 0 {
            CountdownTick::Done
        } else {
            self.next = value - 1;
            CountdownTick::Show(value)
        }
    }

    /// 現在表示中の数字
    pub fn shown(&self) -> Option<u32> {
        self.shown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_three_to_zero() {
        let mut c = Countdown::new(3);
        assert_eq!(c.shown(), None);
        assert_eq!(c.tick(), CountdownTick::Show(3));
        assert_eq!(c.tick(), CountdownTick::Show(2));
        assert_eq!(c.tick(), CountdownTick::Show(1));
        assert_eq!(c.tick(), CountdownTick::Done);
        assert_eq!(c.shown(), Some(0));
    }

    #[test]
    fn test_zero_start_finishes_on_first_tick() {
        let mut c = Countdown::new(0);
        assert_eq!(c.tick(), CountdownTick::Done);
    }
}
