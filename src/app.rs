//! egui shell: control panel on the right, canvas filling the rest.

use std::time::Instant;

use eframe::egui;
use log::debug;

use crate::driver::{Driver, SPEED_RANGE};
use crate::engine::{AnchorSet, Point, UniformSelector};
use crate::surface::{PixelSurface, DEFAULT_PIXEL_SIZE, PIXEL_SIZE_RANGE};

/// Canvas size used until the first frame reports the real widget size.
const INITIAL_CANVAS_SIZE: u32 = 350;

pub struct TriangleApp {
    driver: Driver<UniformSelector>,
    surface: PixelSurface,
    texture: Option<egui::TextureHandle>,
    speed: u32,
    pixel_size: u32,
    draw_lines: bool,
    /// Start point picked by clicking the canvas; cleared when a resize
    /// pushes it out of bounds. `None` means the canvas center.
    chosen_start: Option<Point>,
}

impl TriangleApp {
    pub fn new() -> Self {
        let surface = PixelSurface::new(INITIAL_CANVAS_SIZE, INITIAL_CANVAS_SIZE);
        let anchors = AnchorSet::for_surface(surface.width() as f64, surface.height() as f64);
        let start = start_point(None, surface.width(), surface.height());
        let mut app = Self {
            driver: Driver::new(anchors, start, UniformSelector::from_entropy()),
            surface,
            texture: None,
            speed: *SPEED_RANGE.start(),
            pixel_size: DEFAULT_PIXEL_SIZE,
            draw_lines: false,
            chosen_start: None,
        };
        app.driver
            .restart(anchors, start, &mut app.surface, Instant::now());
        app
    }

    fn restart_run(&mut self, now: Instant) {
        let width = self.surface.width();
        let height = self.surface.height();
        let anchors = AnchorSet::for_surface(width as f64, height as f64);
        let start = start_point(self.chosen_start, width, height);
        self.driver.restart(anchors, start, &mut self.surface, now);
    }

    fn resize_canvas(&mut self, width: u32, height: u32, now: Instant) {
        self.surface = PixelSurface::new(width, height);
        self.surface.set_pixel_size(self.pixel_size);
        self.chosen_start = retained_start(self.chosen_start, width, height);
        self.restart_run(now);
        debug!("canvas resized to {}x{}", width, height);
    }

    fn controls(&mut self, ui: &mut egui::Ui, now: Instant) {
        ui.heading("Sierpinski's Triangle");
        ui.label(format!("Iteration Count: {}", self.driver.iterations()));
        ui.separator();

        ui.label("Iteration Speed");
        ui.add(egui::Slider::new(&mut self.speed, SPEED_RANGE));
        ui.label("Pixel Size");
        ui.add(egui::Slider::new(&mut self.pixel_size, PIXEL_SIZE_RANGE));
        ui.checkbox(&mut self.draw_lines, "Draw lines between dots");
        ui.separator();

        let playing = self.driver.is_playing();
        ui.horizontal(|ui| {
            if ui
                .button(if playing { "Stop" } else { "Start" })
                .clicked()
            {
                if playing {
                    self.driver.stop();
                } else {
                    self.driver.start(now);
                }
            }
            if ui
                .add_enabled(!playing, egui::Button::new("Step Once"))
                .clicked()
            {
                self.driver.step_once(&mut self.surface);
            }
            if ui
                .add_enabled(!playing, egui::Button::new("Restart"))
                .clicked()
            {
                self.restart_run(now);
            }
        });

        ui.separator();
        ui.label("Fractal rules:");
        ui.label("- Three anchor points form a triangle");
        ui.label("- Click the canvas while stopped to choose a starting point");
        ui.label("- Each step picks one anchor at random and places a dot halfway between it and the previous dot");
        ui.label("- Repeat forever and the triangle pattern emerges");
        ui.weak("Stepping with lines on makes the rule easy to follow, though the fractal only shows with lines off.");
    }

    fn canvas(&mut self, ui: &mut egui::Ui, ctx: &egui::Context, now: Instant) {
        let (canvas_rect, response) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::click());

        let width = canvas_rect.width().floor().max(1.0) as u32;
        let height = canvas_rect.height().floor().max(1.0) as u32;
        if (width, height) != (self.surface.width(), self.surface.height()) {
            self.resize_canvas(width, height, now);
        }

        // Start-point picks only land while stopped.
        if response.clicked() && !self.driver.is_playing() {
            if let Some(pos) = response.interact_pointer_pos() {
                let local = pos - canvas_rect.min;
                self.chosen_start = Some(Point::new(local.x as f64, local.y as f64));
                self.restart_run(now);
            }
        }

        let image = egui::ColorImage::from_rgba_unmultiplied(
            [self.surface.width() as usize, self.surface.height() as usize],
            self.surface.rgba(),
        );
        match &mut self.texture {
            Some(texture) => texture.set(image, egui::TextureOptions::NEAREST),
            None => {
                self.texture = Some(ctx.load_texture("canvas", image, egui::TextureOptions::NEAREST))
            }
        }
        if let Some(texture) = &self.texture {
            let image_rect = egui::Rect::from_min_size(
                canvas_rect.min,
                egui::vec2(self.surface.width() as f32, self.surface.height() as f32),
            );
            ui.put(
                image_rect,
                egui::Image::from_texture(texture).fit_to_exact_size(image_rect.size()),
            );
        }
    }
}

impl eframe::App for TriangleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        self.driver.set_speed(self.speed);
        self.driver.set_draw_lines(self.draw_lines);
        self.surface.set_pixel_size(self.pixel_size);
        self.driver.poll(now, &mut self.surface);
        if self.driver.is_playing() {
            ctx.request_repaint();
        }

        egui::SidePanel::right("controls")
            .default_width(300.0)
            .show(ctx, |ui| self.controls(ui, now));

        egui::CentralPanel::default().show(ctx, |ui| self.canvas(ui, ctx, now));
    }
}

/// The user's pick, or the canvas center when there is none.
fn start_point(chosen: Option<Point>, width: u32, height: u32) -> Point {
    chosen.unwrap_or_else(|| Point::new(width as f64 / 2.0, height as f64 / 2.0))
}

/// A picked start survives a resize only while it stays on the surface.
fn retained_start(chosen: Option<Point>, width: u32, height: u32) -> Option<Point> {
    chosen.filter(|p| p.x < width as f64 && p.y < height as f64)
}
