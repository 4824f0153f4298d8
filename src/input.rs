use macroquad::prelude::{KeyCode, get_keys_pressed, get_keys_released};

/// Logical keys the game reacts to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Secondary,
    Cancel,
    /// Any physical key without a mapping. Only counts as "some key".
    Other,
}

const KEY_COUNT: usize = 8;

impl Key {
    fn index(self) -> usize {
        self as usize
    }

    fn from_keycode(code: KeyCode) -> Self {
        match code {
            KeyCode::Up | KeyCode::W => Key::Up,
            KeyCode::Down | KeyCode::S => Key::Down,
            KeyCode::Left | KeyCode::A => Key::Left,
            KeyCode::Right | KeyCode::D => Key::Right,
            KeyCode::Enter | KeyCode::KpEnter => Key::Confirm,
            KeyCode::Space => Key::Secondary,
            KeyCode::Escape => Key::Cancel,
            _ => Key::Other,
        }
    }
}

/// Held and one-shot views over raw key edges.
///
/// `held` follows key-down/key-up. `pressed` is set on key-down and cleared
/// by the first read, so a press fires exactly once.
#[derive(Default, Debug)]
pub struct InputLatch {
    held: [bool; KEY_COUNT],
    pressed: [bool; KEY_COUNT],
    held_count: usize,
    any_pressed: bool,
}

impl InputLatch {
    pub fn key_down(&mut self, key: Key) {
        let i = key.index();
        if !self.held[i] {
            self.held[i] = true;
            self.held_count += 1;
        }
        self.pressed[i] = true;
        self.any_pressed = true;
    }

    pub fn key_up(&mut self, key: Key) {
        let i = key.index();
        if self.held[i] {
            self.held[i] = false;
            self.held_count -= 1;
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held[key.index()]
    }

    pub fn any_held(&self) -> bool {
        self.held_count > 0
    }

    /// Returns true once per key-down edge.
    pub fn consume_pressed(&mut self, key: Key) -> bool {
        std::mem::take(&mut self.pressed[key.index()])
    }

    /// Reads a press without consuming it.
    pub fn peek_pressed(&self, key: Key) -> bool {
        self.pressed[key.index()]
    }

    /// True once if any key at all went down since the last clear.
    pub fn consume_any_pressed(&mut self) -> bool {
        let fired = std::mem::take(&mut self.any_pressed);
        if fired {
            self.pressed = [false; KEY_COUNT];
        }
        fired
    }

    pub fn clear_pressed(&mut self) {
        self.pressed = [false; KEY_COUNT];
        self.any_pressed = false;
    }

    /// Feeds this frame's keyboard edges from macroquad.
    pub fn poll(&mut self) {
        for code in get_keys_pressed() {
            self.key_down(Key::from_keycode(code));
        }
        for code in get_keys_released() {
            self.key_up(Key::from_keycode(code));
        }
    }
}
