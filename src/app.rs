//! Screen controller. Owns every piece of mutable game state and is the only
//! place that changes which screen is active.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::input::{InputLatch, Key};
use crate::options::{OptionsStore, RESOLUTION_COUNT, Setting};
use crate::pacer::{FramePacer, MENU_INTERVAL_MS};
use crate::settings::Settings;
use crate::snake::{Direction, SnakeEngine, TickResult};

/// How long the game-over banner stays up before returning to the title.
pub const GAME_OVER_DELAY_MS: u64 = 4000;

// Banner coordinates are tenths of a canvas pixel.
const BANNER_START: f32 = -32.0;
const BANNER_FLOOR: f32 = 104.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MenuItem {
    Start,
    Scores,
    Options,
    Quit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 4] = [MenuItem::Start, MenuItem::Scores, MenuItem::Options, MenuItem::Quit];
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OptionsItem {
    Resolution,
    Fullscreen,
    SoftFilter,
    Speed,
    Apply,
}

impl OptionsItem {
    pub const ALL: [OptionsItem; 5] = [
        OptionsItem::Resolution,
        OptionsItem::Fullscreen,
        OptionsItem::SoftFilter,
        OptionsItem::Speed,
        OptionsItem::Apply,
    ];
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GamePhase {
    /// Resets the board on its single tick.
    Start,
    /// Board is ready; waits for the first key.
    Ready,
    Running,
    Over { since_ms: u64 },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    Title,
    Menu { selection: MenuItem },
    Options { selection: OptionsItem, resolution_open: bool },
    InGame { phase: GamePhase },
}

impl Screen {
    fn name(&self) -> &'static str {
        match self {
            Screen::Title => "title",
            Screen::Menu { .. } => "menu",
            Screen::Options { .. } => "options",
            Screen::InGame { .. } => "game",
        }
    }
}

/// Work for the collaborators outside the core.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Quit,
    /// Options were applied; the window should follow them.
    Reconfigure(Settings),
}

enum Transition {
    Stay,
    Switch(Screen),
    Applied(Settings),
    Quit,
}

/// Falling "GAME OVER" banner that bounces on the centre line.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GameOverBanner {
    position: f32,
    velocity: f32,
}

impl Default for GameOverBanner {
    fn default() -> Self {
        Self { position: BANNER_START, velocity: 0.0 }
    }
}

impl GameOverBanner {
    fn step(&mut self) {
        self.velocity += 1.0;
        self.position += self.velocity;
        if self.position / 10.0 > BANNER_FLOOR {
            self.position = BANNER_FLOOR * 10.0;
            self.velocity *= -0.5;
        }
    }

    /// Top edge in canvas pixels.
    pub fn y(&self) -> f32 {
        self.position / 10.0
    }
}

fn step_selection<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
    let i = all.iter().position(|item| *item == current).unwrap_or(0);
    let next = if forward { (i + 1).min(all.len() - 1) } else { i.saturating_sub(1) };
    all[next]
}

pub struct App {
    screen: Screen,
    options: OptionsStore,
    engine: SnakeEngine,
    pacer: FramePacer,
    seeds: StdRng,
    banner: GameOverBanner,
    /// Turn tapped on the key that left `Ready`, steered on the first run tick.
    queued_turn: Option<Direction>,
}

impl App {
    pub fn new(settings: Settings, seed: u64, now_ms: u64) -> Self {
        let mut seeds = StdRng::seed_from_u64(seed);
        let engine = SnakeEngine::new(seeds.next_u64());
        Self {
            screen: Screen::Title,
            options: OptionsStore::new(settings),
            engine,
            pacer: FramePacer::new(now_ms),
            seeds,
            banner: GameOverBanner::default(),
            queued_turn: None,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn engine(&self) -> &SnakeEngine {
        &self.engine
    }

    pub fn options(&self) -> &OptionsStore {
        &self.options
    }

    pub fn banner(&self) -> &GameOverBanner {
        &self.banner
    }

    /// Interval the pacer uses for the current screen.
    pub fn tick_interval_ms(&self) -> u64 {
        match self.screen {
            Screen::InGame { phase: GamePhase::Over { .. } } => MENU_INTERVAL_MS,
            Screen::InGame { .. } => self.options.committed().logic_interval_ms(),
            _ => MENU_INTERVAL_MS,
        }
    }

    /// Runs one tick if the pacer allows it.
    pub fn frame(&mut self, now_ms: u64, input: &mut InputLatch) -> Option<Command> {
        if !self.pacer.try_tick(now_ms, self.tick_interval_ms()) {
            return None;
        }
        let command = self.tick(now_ms, input);
        input.clear_pressed();
        command
    }

    fn tick(&mut self, now_ms: u64, input: &mut InputLatch) -> Option<Command> {
        let transition = match self.screen {
            Screen::Title => self.update_title(input),
            Screen::Menu { selection } => self.update_menu(selection, input),
            Screen::Options { selection, resolution_open } => {
                self.update_options(selection, resolution_open, input)
            }
            Screen::InGame { phase } => self.update_game(phase, now_ms, input),
        };

        match transition {
            Transition::Stay => None,
            Transition::Switch(next) => {
                self.switch(next);
                None
            }
            Transition::Applied(settings) => {
                self.switch(Screen::Menu { selection: MenuItem::Options });
                Some(Command::Reconfigure(settings))
            }
            Transition::Quit => {
                log::info!("Quit selected");
                Some(Command::Quit)
            }
        }
    }

    fn switch(&mut self, next: Screen) {
        if next.name() != self.screen.name() {
            log::debug!("Screen {} -> {}", self.screen.name(), next.name());
        }
        self.screen = next;
    }

    fn update_title(&mut self, input: &mut InputLatch) -> Transition {
        let cancel = input.is_held(Key::Cancel) || input.peek_pressed(Key::Cancel);
        if input.consume_any_pressed() && !cancel {
            return Transition::Switch(Screen::Menu { selection: MenuItem::Start });
        }
        Transition::Stay
    }

    fn update_menu(&mut self, selection: MenuItem, input: &mut InputLatch) -> Transition {
        if input.consume_pressed(Key::Cancel) {
            return Transition::Switch(Screen::Title);
        }
        if input.consume_pressed(Key::Down) {
            let selection = step_selection(&MenuItem::ALL, selection, true);
            return Transition::Switch(Screen::Menu { selection });
        }
        if input.consume_pressed(Key::Up) {
            let selection = step_selection(&MenuItem::ALL, selection, false);
            return Transition::Switch(Screen::Menu { selection });
        }
        if !input.consume_pressed(Key::Confirm) {
            return Transition::Stay;
        }

        match selection {
            MenuItem::Start => Transition::Switch(Screen::InGame { phase: GamePhase::Start }),
            MenuItem::Scores => {
                log::info!("High scores are not kept yet");
                Transition::Stay
            }
            MenuItem::Options => {
                self.options.enter();
                Transition::Switch(Screen::Options {
                    selection: OptionsItem::Resolution,
                    resolution_open: false,
                })
            }
            MenuItem::Quit => Transition::Quit,
        }
    }

    fn update_options(&mut self, selection: OptionsItem, resolution_open: bool, input: &mut InputLatch) -> Transition {
        if resolution_open {
            return self.update_resolution_list(input);
        }

        if input.consume_pressed(Key::Cancel) {
            self.options.discard();
            return Transition::Switch(Screen::Menu { selection: MenuItem::Options });
        }
        if input.consume_pressed(Key::Down) {
            let selection = step_selection(&OptionsItem::ALL, selection, true);
            return Transition::Switch(Screen::Options { selection, resolution_open });
        }
        if input.consume_pressed(Key::Up) {
            let selection = step_selection(&OptionsItem::ALL, selection, false);
            return Transition::Switch(Screen::Options { selection, resolution_open });
        }

        let pending = *self.options.pending();
        if input.consume_pressed(Key::Confirm) {
            match selection {
                OptionsItem::Resolution => {
                    return Transition::Switch(Screen::Options { selection, resolution_open: true });
                }
                OptionsItem::Fullscreen => self.options.stage(Setting::Fullscreen(!pending.fullscreen)),
                OptionsItem::SoftFilter => self.options.stage(Setting::SoftFilter(!pending.soft_filter)),
                OptionsItem::Speed => {}
                OptionsItem::Apply => return Transition::Applied(self.options.apply()),
            }
            return Transition::Stay;
        }

        match selection {
            OptionsItem::Resolution if input.consume_pressed(Key::Right) => {
                Transition::Switch(Screen::Options { selection, resolution_open: true })
            }
            // Held, so the meter keeps sliding while the key is down.
            OptionsItem::Speed => {
                if input.is_held(Key::Left) {
                    self.options.stage(Setting::Speed(pending.speed.saturating_sub(1)));
                }
                if input.is_held(Key::Right) {
                    self.options.stage(Setting::Speed(pending.speed.saturating_add(1)));
                }
                Transition::Stay
            }
            _ => Transition::Stay,
        }
    }

    fn update_resolution_list(&mut self, input: &mut InputLatch) -> Transition {
        let current = self.options.pending().resolution;
        if input.consume_pressed(Key::Down) {
            self.options.stage(Setting::Resolution((current + 1).min(RESOLUTION_COUNT - 1)));
        } else if input.consume_pressed(Key::Up) {
            self.options.stage(Setting::Resolution(current.saturating_sub(1)));
        } else if input.consume_pressed(Key::Confirm)
            || input.consume_pressed(Key::Cancel)
            || input.consume_pressed(Key::Left)
        {
            return Transition::Switch(Screen::Options {
                selection: OptionsItem::Resolution,
                resolution_open: false,
            });
        }
        Transition::Stay
    }

    fn update_game(&mut self, phase: GamePhase, now_ms: u64, input: &mut InputLatch) -> Transition {
        if phase == GamePhase::Start {
            self.engine.reset(self.seeds.next_u64());
            self.queued_turn = None;
            input.clear_pressed();
            log::debug!("New game, apple at {:?}", self.engine.apple());
            return Transition::Switch(Screen::InGame { phase: GamePhase::Ready });
        }

        if input.is_held(Key::Cancel) || input.consume_pressed(Key::Cancel) {
            return Transition::Switch(Screen::Title);
        }

        match phase {
            GamePhase::Start => Transition::Stay,
            GamePhase::Ready => {
                let turn = self.steering(input);
                if input.any_held() || input.consume_any_pressed() {
                    self.queued_turn = turn;
                    Transition::Switch(Screen::InGame { phase: GamePhase::Running })
                } else {
                    Transition::Stay
                }
            }
            GamePhase::Running => {
                let requested = self.steering(input).or(self.queued_turn.take());
                match self.engine.tick(requested) {
                    TickResult::SelfCollision => {
                        log::info!("Game over at length {}", self.engine.length());
                        self.banner = GameOverBanner::default();
                        Transition::Switch(Screen::InGame { phase: GamePhase::Over { since_ms: now_ms } })
                    }
                    TickResult::AppleEaten => {
                        log::debug!("Apple eaten, length {}", self.engine.length());
                        Transition::Stay
                    }
                    TickResult::Continuing => Transition::Stay,
                }
            }
            GamePhase::Over { since_ms } => {
                self.banner.step();
                if now_ms.saturating_sub(since_ms) > GAME_OVER_DELAY_MS {
                    Transition::Switch(Screen::Title)
                } else {
                    Transition::Stay
                }
            }
        }
    }

    /// First perpendicular direction that is held or was tapped since the
    /// last tick.
    fn steering(&self, input: &InputLatch) -> Option<Direction> {
        let heading = self.engine.direction();
        [
            (Key::Up, Direction::Up),
            (Key::Down, Direction::Down),
            (Key::Left, Direction::Left),
            (Key::Right, Direction::Right),
        ]
        .into_iter()
        .filter(|(_, dir)| dir.is_vertical() != heading.is_vertical())
        .find(|(key, _)| input.is_held(*key) || input.peek_pressed(*key))
        .map(|(_, dir)| dir)
    }

    #[cfg(test)]
    pub(crate) fn engine_mut(&mut self) -> &mut SnakeEngine {
        &mut self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::Position;

    fn app() -> App {
        App::new(Settings::default(), 5, 0)
    }

    /// Runs one tick the way `frame` does, without the pacer.
    fn tick(app: &mut App, input: &mut InputLatch, now_ms: u64) -> Option<Command> {
        let command = app.tick(now_ms, input);
        input.clear_pressed();
        command
    }

    fn tap(app: &mut App, key: Key) -> Option<Command> {
        let mut input = InputLatch::default();
        input.key_down(key);
        input.key_up(key);
        tick(app, &mut input, 0)
    }

    fn idle(app: &mut App) {
        tick(app, &mut InputLatch::default(), 0);
    }

    fn to_menu(app: &mut App) {
        tap(app, Key::Other);
        assert_eq!(app.screen(), Screen::Menu { selection: MenuItem::Start });
    }

    fn to_options(app: &mut App) {
        to_menu(app);
        tap(app, Key::Down);
        tap(app, Key::Down);
        tap(app, Key::Confirm);
        assert!(matches!(app.screen(), Screen::Options { .. }));
    }

    fn to_running(app: &mut App) {
        to_menu(app);
        tap(app, Key::Confirm);
        assert_eq!(app.screen(), Screen::InGame { phase: GamePhase::Start });
        idle(app);
        assert_eq!(app.screen(), Screen::InGame { phase: GamePhase::Ready });
        tap(app, Key::Other);
        assert_eq!(app.screen(), Screen::InGame { phase: GamePhase::Running });
    }

    #[test]
    fn starts_on_title() {
        assert_eq!(app().screen(), Screen::Title);
    }

    #[test]
    fn title_ignores_idle_and_cancel() {
        let mut app = app();
        idle(&mut app);
        tap(&mut app, Key::Cancel);
        assert_eq!(app.screen(), Screen::Title);
    }

    #[test]
    fn any_key_opens_menu() {
        let mut app = app();
        to_menu(&mut app);
    }

    #[test]
    fn menu_navigation_saturates() {
        let mut app = app();
        to_menu(&mut app);
        tap(&mut app, Key::Up);
        assert_eq!(app.screen(), Screen::Menu { selection: MenuItem::Start });
        for _ in 0..10 {
            tap(&mut app, Key::Down);
        }
        assert_eq!(app.screen(), Screen::Menu { selection: MenuItem::Quit });
    }

    #[test]
    fn menu_cancel_returns_to_title_and_resets_selection() {
        let mut app = app();
        to_menu(&mut app);
        tap(&mut app, Key::Down);
        tap(&mut app, Key::Cancel);
        assert_eq!(app.screen(), Screen::Title);
        to_menu(&mut app);
    }

    #[test]
    fn scores_is_a_stub() {
        let mut app = app();
        to_menu(&mut app);
        tap(&mut app, Key::Down);
        assert_eq!(tap(&mut app, Key::Confirm), None);
        assert_eq!(app.screen(), Screen::Menu { selection: MenuItem::Scores });
    }

    #[test]
    fn quit_emits_command() {
        let mut app = app();
        to_menu(&mut app);
        for _ in 0..3 {
            tap(&mut app, Key::Down);
        }
        assert_eq!(tap(&mut app, Key::Confirm), Some(Command::Quit));
    }

    #[test]
    fn options_cancel_discards() {
        let mut app = app();
        to_options(&mut app);
        tap(&mut app, Key::Down);
        tap(&mut app, Key::Confirm);
        assert!(app.options().pending().fullscreen);

        tap(&mut app, Key::Cancel);
        assert_eq!(app.screen(), Screen::Menu { selection: MenuItem::Options });
        assert!(!app.options().committed().fullscreen);
        assert!(!app.options().pending().fullscreen);
    }

    #[test]
    fn apply_commits_and_returns_to_menu() {
        let mut app = app();
        to_options(&mut app);
        tap(&mut app, Key::Down);
        tap(&mut app, Key::Down);
        tap(&mut app, Key::Confirm);
        for _ in 0..5 {
            tap(&mut app, Key::Down);
        }
        let command = tap(&mut app, Key::Confirm);

        let expected = Settings { soft_filter: true, ..Settings::default() };
        assert_eq!(command, Some(Command::Reconfigure(expected)));
        assert_eq!(*app.options().committed(), expected);
        assert_eq!(app.screen(), Screen::Menu { selection: MenuItem::Options });
    }

    #[test]
    fn speed_slides_while_held_and_sets_game_interval() {
        let mut app = app();
        to_options(&mut app);
        for _ in 0..3 {
            tap(&mut app, Key::Down);
        }
        assert!(matches!(app.screen(), Screen::Options { selection: OptionsItem::Speed, .. }));

        let mut input = InputLatch::default();
        input.key_down(Key::Right);
        for _ in 0..50 {
            tick(&mut app, &mut input, 0);
        }
        assert_eq!(app.options().pending().speed, 250);
        assert_eq!(app.options().committed().speed, 200);

        tap(&mut app, Key::Down);
        tap(&mut app, Key::Confirm);
        tap(&mut app, Key::Up);
        tap(&mut app, Key::Up);
        tap(&mut app, Key::Confirm);
        assert!(matches!(app.screen(), Screen::InGame { .. }));
        assert_eq!(app.tick_interval_ms(), 80);
    }

    #[test]
    fn resolution_list_is_a_nested_mode() {
        let mut app = app();
        to_options(&mut app);
        tap(&mut app, Key::Confirm);
        assert_eq!(
            app.screen(),
            Screen::Options { selection: OptionsItem::Resolution, resolution_open: true }
        );

        for _ in 0..10 {
            tap(&mut app, Key::Down);
        }
        assert_eq!(app.options().pending().resolution, RESOLUTION_COUNT - 1);
        tap(&mut app, Key::Up);
        assert_eq!(app.options().pending().resolution, RESOLUTION_COUNT - 2);

        // Cancel only closes the list
        tap(&mut app, Key::Cancel);
        assert_eq!(
            app.screen(),
            Screen::Options { selection: OptionsItem::Resolution, resolution_open: false }
        );
        assert_eq!(app.options().committed().resolution, 1);

        tap(&mut app, Key::Right);
        assert!(matches!(app.screen(), Screen::Options { resolution_open: true, .. }));
        tap(&mut app, Key::Left);
        assert!(matches!(app.screen(), Screen::Options { resolution_open: false, .. }));
    }

    #[test]
    fn game_waits_for_first_key() {
        let mut app = app();
        to_menu(&mut app);
        tap(&mut app, Key::Confirm);
        idle(&mut app);
        let head = app.engine().head();
        for _ in 0..5 {
            idle(&mut app);
        }
        assert_eq!(app.screen(), Screen::InGame { phase: GamePhase::Ready });
        assert_eq!(app.engine().head(), head);
    }

    #[test]
    fn turn_tapped_in_ready_steers_first_move() {
        let mut app = app();
        to_menu(&mut app);
        tap(&mut app, Key::Confirm);
        idle(&mut app);
        app.engine_mut().place_apple(Position::new(0, 0));
        assert_eq!(app.engine().head(), Position::new(10, 7));

        tap(&mut app, Key::Up);
        assert_eq!(app.screen(), Screen::InGame { phase: GamePhase::Running });
        assert_eq!(app.engine().head(), Position::new(10, 7));

        idle(&mut app);
        assert_eq!(app.engine().head(), Position::new(10, 6));
        assert_eq!(app.engine().direction(), Direction::Up);

        idle(&mut app);
        assert_eq!(app.engine().head(), Position::new(10, 5));
    }

    #[test]
    fn running_steers_with_held_keys() {
        let mut app = app();
        to_running(&mut app);
        app.engine_mut().place_apple(Position::new(0, 0));

        let mut input = InputLatch::default();
        input.key_down(Key::Down);
        tick(&mut app, &mut input, 0);
        assert_eq!(app.engine().head(), Position::new(10, 8));
        tick(&mut app, &mut input, 0);
        assert_eq!(app.engine().head(), Position::new(10, 9));
    }

    #[test]
    fn collision_ends_the_game_then_returns_to_title() {
        let mut app = app();
        to_running(&mut app);
        app.engine_mut().place_snake(
            Position::new(6, 5),
            Direction::Right,
            &[(Position::new(5, 5), 1), (Position::new(6, 5), 2), (Position::new(7, 5), 3)],
        );

        tick(&mut app, &mut InputLatch::default(), 1_000);
        assert_eq!(app.screen(), Screen::InGame { phase: GamePhase::Over { since_ms: 1_000 } });
        assert_eq!(app.tick_interval_ms(), MENU_INTERVAL_MS);

        let head = app.engine().head();
        tick(&mut app, &mut InputLatch::default(), 3_000);
        assert_eq!(app.engine().head(), head);
        assert!(matches!(app.screen(), Screen::InGame { phase: GamePhase::Over { .. } }));

        tick(&mut app, &mut InputLatch::default(), 5_001);
        assert_eq!(app.screen(), Screen::Title);
    }

    #[test]
    fn cancel_leaves_game_over_early() {
        let mut app = app();
        to_running(&mut app);
        app.engine_mut().place_snake(Position::new(2, 2), Direction::Right, &[(Position::new(2, 2), 2)]);
        idle(&mut app);
        assert!(matches!(app.screen(), Screen::InGame { phase: GamePhase::Over { .. } }));
        tap(&mut app, Key::Cancel);
        assert_eq!(app.screen(), Screen::Title);
    }

    #[test]
    fn cancel_abandons_running_game() {
        let mut app = app();
        to_running(&mut app);
        tap(&mut app, Key::Cancel);
        assert_eq!(app.screen(), Screen::Title);
    }

    #[test]
    fn new_game_resets_board() {
        let mut app = app();
        to_running(&mut app);
        app.engine_mut().place_apple(Position::new(0, 0));
        idle(&mut app);
        idle(&mut app);
        tap(&mut app, Key::Cancel);

        to_menu(&mut app);
        tap(&mut app, Key::Confirm);
        idle(&mut app);
        assert_eq!(app.engine().head(), app.engine().start_position());
        assert_eq!(app.engine().live_cells().count(), 0);
    }

    #[test]
    fn frame_is_paced_per_screen() {
        let mut app = App::new(Settings::default(), 5, 0);
        let mut input = InputLatch::default();
        input.key_down(Key::Other);
        assert_eq!(app.frame(5, &mut input), None);
        assert_eq!(app.screen(), Screen::Title);
        app.frame(11, &mut input);
        assert!(matches!(app.screen(), Screen::Menu { .. }));

        // the press was spent on that tick
        input.key_up(Key::Other);
        app.frame(30, &mut input);
        assert!(matches!(app.screen(), Screen::Menu { .. }));

        input.key_down(Key::Confirm);
        app.frame(50, &mut input);
        assert_eq!(app.screen(), Screen::InGame { phase: GamePhase::Start });
        assert_eq!(app.tick_interval_ms(), 100);
        app.frame(100, &mut input);
        assert_eq!(app.screen(), Screen::InGame { phase: GamePhase::Start });
        app.frame(151, &mut input);
        assert_eq!(app.screen(), Screen::InGame { phase: GamePhase::Ready });
    }

    #[test]
    fn banner_falls_then_bounces() {
        let mut banner = GameOverBanner::default();
        assert!(banner.y() < 0.0);
        let mut bounced = false;
        for _ in 0..200 {
            banner.step();
            assert!(banner.y() <= BANNER_FLOOR);
            if banner.velocity < 0.0 {
                bounced = true;
            }
        }
        assert!(bounced);
    }

    #[test]
    fn selection_steps_saturate() {
        assert_eq!(step_selection(&MenuItem::ALL, MenuItem::Start, false), MenuItem::Start);
        assert_eq!(step_selection(&MenuItem::ALL, MenuItem::Quit, true), MenuItem::Quit);
        assert_eq!(step_selection(&OptionsItem::ALL, OptionsItem::Speed, true), OptionsItem::Apply);
    }
}
