//! Window modes and the fixed-size canvas everything is drawn into.

use macroquad::prelude::*;

use crate::options::RESOLUTION_COUNT;
use crate::settings::Settings;

pub const CANVAS_WIDTH: f32 = 320.0;
pub const CANVAS_HEIGHT: f32 = 240.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Windowed { width: u32, height: u32 },
    /// Desktop mode, always fullscreen.
    Native,
}

pub const RESOLUTIONS: [Resolution; RESOLUTION_COUNT] = [
    Resolution::Windowed { width: 320, height: 240 },
    Resolution::Windowed { width: 640, height: 480 },
    Resolution::Windowed { width: 960, height: 720 },
    Resolution::Windowed { width: 1280, height: 960 },
    Resolution::Native,
];

impl Resolution {
    pub fn at(index: usize) -> Self {
        RESOLUTIONS[index.min(RESOLUTION_COUNT - 1)]
    }

    pub fn label(&self) -> String {
        match self {
            Resolution::Windowed { width, height } => format!("{}x{}", width, height),
            Resolution::Native => "Native".to_owned(),
        }
    }

    fn uses_fullscreen(&self, settings: &Settings) -> bool {
        settings.fullscreen || *self == Resolution::Native
    }
}

pub fn window_conf(settings: &Settings) -> Conf {
    let resolution = Resolution::at(settings.resolution);
    let (width, height) = match resolution {
        Resolution::Windowed { width, height } => (width as i32, height as i32),
        Resolution::Native => (CANVAS_WIDTH as i32 * 2, CANVAS_HEIGHT as i32 * 2),
    };
    Conf {
        window_title: "Snek".to_owned(),
        window_width: width,
        window_height: height,
        fullscreen: resolution.uses_fullscreen(settings),
        high_dpi: true,
        ..Default::default()
    }
}

/// Offscreen canvas scaled to the window each frame.
pub struct Display {
    canvas: RenderTarget,
    camera: Camera2D,
}

impl Display {
    pub fn new(settings: &Settings) -> Self {
        let canvas = render_target(CANVAS_WIDTH as u32, CANVAS_HEIGHT as u32);
        let mut camera = Camera2D::from_display_rect(Rect::new(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT));
        camera.render_target = Some(canvas.clone());
        let display = Self { canvas, camera };
        display.set_filter(settings.soft_filter);
        display
    }

    /// Follows newly applied settings.
    pub fn apply(&mut self, settings: &Settings) {
        let resolution = Resolution::at(settings.resolution);
        let fullscreen = resolution.uses_fullscreen(settings);
        set_fullscreen(fullscreen);
        if let Resolution::Windowed { width, height } = resolution {
            if !fullscreen {
                request_new_screen_size(width as f32, height as f32);
            }
        }
        self.set_filter(settings.soft_filter);
        log::info!(
            "Display set to {} (fullscreen: {}, soft filter: {})",
            resolution.label(),
            fullscreen,
            settings.soft_filter
        );
    }

    fn set_filter(&self, soft: bool) {
        let mode = if soft { FilterMode::Linear } else { FilterMode::Nearest };
        self.canvas.texture.set_filter(mode);
    }

    /// Routes drawing into the canvas.
    pub fn begin(&self) {
        set_camera(&self.camera);
    }

    /// Scales the canvas into the window, letterboxed.
    pub fn present(&self) {
        set_default_camera();
        clear_background(BLACK);
        let scale = (screen_width() / CANVAS_WIDTH).min(screen_height() / CANVAS_HEIGHT);
        let (w, h) = (CANVAS_WIDTH * scale, CANVAS_HEIGHT * scale);
        draw_texture_ex(
            &self.canvas.texture,
            (screen_width() - w) * 0.5,
            (screen_height() - h) * 0.5,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(w, h)),
                flip_y: true,
                ..Default::default()
            },
        );
    }
}
