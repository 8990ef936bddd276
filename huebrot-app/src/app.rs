use std::time::Instant;

use eframe::egui;
use tracing::{error, info, warn};

use huebrot_core::{Complex, PixelPos, Viewport};
use huebrot_render::{GridRenderer, RenderError, Rgb};

use crate::interaction::DragState;
use crate::preferences::Preferences;
use crate::session::{Canvas, FieldEvent, ParameterSet, Session};

/// Width of the parameter side panel in points.
const SIDE_PANEL_WIDTH: f32 = 240.0;
/// Gap between the two canvases in points.
const CANVAS_SPACING: f32 = 8.0;

// ---------------------------------------------------------------------------
// Texture-backed renderer
// ---------------------------------------------------------------------------

/// Draws the point grid into an egui texture, one texel per vertex.
pub(crate) struct TextureRenderer {
    ctx: egui::Context,
    name: &'static str,
    width: u32,
    height: u32,
    texture: Option<egui::TextureHandle>,
}

impl TextureRenderer {
    fn new(ctx: &egui::Context, name: &'static str, width: u32, height: u32) -> Self {
        Self {
            ctx: ctx.clone(),
            name,
            width,
            height,
            texture: None,
        }
    }

    fn texture(&self) -> Option<&egui::TextureHandle> {
        self.texture.as_ref()
    }
}

fn to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Pack a point grid into top-to-bottom RGBA rows. Vertices have y up, so
/// grid row 0 becomes the last texture row. Vertices outside the canvas are
/// skipped.
fn pack_rgba(width: usize, height: usize, vertices: &[[f32; 2]], colors: &[Rgb]) -> Vec<u8> {
    let mut rgba = vec![0u8; width * height * 4];
    for ([vx, vy], color) in vertices.iter().zip(colors) {
        let (col, row_up) = (*vx as usize, *vy as usize);
        if col >= width || row_up >= height {
            continue;
        }
        let i = ((height - 1 - row_up) * width + col) * 4;
        rgba[i] = to_u8(color[0]);
        rgba[i + 1] = to_u8(color[1]);
        rgba[i + 2] = to_u8(color[2]);
        rgba[i + 3] = u8::MAX;
    }
    rgba
}

impl GridRenderer for TextureRenderer {
    fn draw_grid(&mut self, vertices: &[[f32; 2]], colors: &[Rgb]) -> huebrot_render::Result<()> {
        if vertices.len() != colors.len() {
            return Err(RenderError::ColorCountMismatch {
                vertices: vertices.len(),
                colors: colors.len(),
            });
        }
        let (w, h) = (self.width as usize, self.height as usize);
        let rgba = pack_rgba(w, h, vertices, colors);
        let image = egui::ColorImage::from_rgba_unmultiplied([w, h], &rgba);
        match self.texture.as_mut() {
            Some(texture) => texture.set(image, egui::TextureOptions::NEAREST),
            None => {
                let texture = self
                    .ctx
                    .load_texture(self.name, image, egui::TextureOptions::NEAREST);
                self.texture = Some(texture);
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Parameter form
// ---------------------------------------------------------------------------

/// Editable copy of a viewport. Validated only when applied.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ViewForm {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl From<Viewport> for ViewForm {
    fn from(vp: Viewport) -> Self {
        Self {
            x_min: vp.x_min(),
            x_max: vp.x_max(),
            y_min: vp.y_min(),
            y_max: vp.y_max(),
        }
    }
}

impl ViewForm {
    fn to_viewport(self) -> huebrot_core::Result<Viewport> {
        Viewport::new(self.x_min, self.x_max, self.y_min, self.y_max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ParameterForm {
    mandelbrot_iterations: u32,
    julia_iterations: u32,
    mandelbrot_view: ViewForm,
    julia_view: ViewForm,
    seed: Complex,
}

impl From<ParameterSet> for ParameterForm {
    fn from(p: ParameterSet) -> Self {
        Self {
            mandelbrot_iterations: p.mandelbrot_iterations,
            julia_iterations: p.julia_iterations,
            mandelbrot_view: p.mandelbrot_view.into(),
            julia_view: p.julia_view.into(),
            seed: p.julia_seed,
        }
    }
}

impl ParameterForm {
    fn to_parameters(self) -> huebrot_core::Result<ParameterSet> {
        let params = ParameterSet {
            mandelbrot_iterations: self.mandelbrot_iterations,
            julia_iterations: self.julia_iterations,
            mandelbrot_view: self.mandelbrot_view.to_viewport()?,
            julia_view: self.julia_view.to_viewport()?,
            julia_seed: self.seed,
        };
        params.validate()?;
        Ok(params)
    }
}

fn view_editor(ui: &mut egui::Ui, id: &str, view: &mut ViewForm) {
    egui::Grid::new(id).num_columns(2).show(ui, |ui| {
        for (label, value) in [
            ("x min", &mut view.x_min),
            ("x max", &mut view.x_max),
            ("y min", &mut view.y_min),
            ("y max", &mut view.y_max),
        ] {
            ui.label(label);
            ui.add(egui::DragValue::new(value).speed(0.01).max_decimals(12));
            ui.end_row();
        }
    });
}

// ---------------------------------------------------------------------------
// Application
// ---------------------------------------------------------------------------

pub(crate) struct HueBrotApp {
    session: Session<TextureRenderer>,
    preferences: Preferences,
    form: ParameterForm,
    status: Option<String>,
    canvas_rects: [egui::Rect; 2],
    /// Canvas that owns the pointer between press and release.
    captured: Option<Canvas>,
}

impl HueBrotApp {
    fn new(ctx: &egui::Context, preferences: Preferences) -> Result<Self, RenderError> {
        let config = preferences.session_config();
        let params = preferences.initial_parameters();
        let mut session = Session::new(
            TextureRenderer::new(ctx, "mandelbrot", config.width, config.height),
            TextureRenderer::new(ctx, "julia", config.width, config.height),
            config,
            preferences.animation_loop(),
            params,
        )?;
        session.generate_images()?;
        // The loop also redraws the selection overlay, so it always runs.
        session.animation_mut().start(Instant::now());

        Ok(Self {
            form: params.into(),
            session,
            preferences,
            status: None,
            canvas_rects: [egui::Rect::NOTHING; 2],
            captured: None,
        })
    }

    /// Log a failed operation and show it until the next successful edit.
    fn report(&mut self, context: &str, result: huebrot_render::Result<()>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                error!("{context}: {e}");
                self.status = Some(format!("{context}: {e}"));
                false
            }
        }
    }

    fn draw_side_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("parameters")
            .exact_width(SIDE_PANEL_WIDTH)
            .show(ctx, |ui| {
                ui.heading("Mandelbrot");
                ui.horizontal(|ui| {
                    ui.label("Iterations");
                    ui.add(
                        egui::DragValue::new(&mut self.form.mandelbrot_iterations)
                            .range(1..=100_000),
                    );
                });
                view_editor(ui, "mandelbrot_view", &mut self.form.mandelbrot_view);

                ui.separator();
                ui.heading("Julia");
                ui.horizontal(|ui| {
                    ui.label("Iterations");
                    ui.add(
                        egui::DragValue::new(&mut self.form.julia_iterations).range(1..=100_000),
                    );
                });
                view_editor(ui, "julia_view", &mut self.form.julia_view);
                egui::Grid::new("julia_seed").num_columns(2).show(ui, |ui| {
                    ui.label("seed re");
                    ui.add(
                        egui::DragValue::new(&mut self.form.seed.re)
                            .speed(0.001)
                            .max_decimals(12),
                    );
                    ui.end_row();
                    ui.label("seed im");
                    ui.add(
                        egui::DragValue::new(&mut self.form.seed.im)
                            .speed(0.001)
                            .max_decimals(12),
                    );
                    ui.end_row();
                });

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Update").clicked() {
                        self.apply_form();
                    }
                    if ui.button("Reset").clicked() {
                        let result = self.session.reset();
                        if self.report("Reset failed", result) {
                            self.status = None;
                        }
                    }
                });

                for canvas in Canvas::ALL {
                    let mut on = self.session.animation().is_enabled(canvas);
                    if ui
                        .checkbox(&mut on, format!("Animate {}", canvas.label()))
                        .changed()
                    {
                        self.session.toggle_animation(canvas);
                    }
                }

                ui.separator();
                for canvas in Canvas::ALL {
                    let field = self.session.field(canvas);
                    let stats = field.stats();
                    ui.small(format!(
                        "{}: {} escaped, {} bounded, {:.1?}",
                        field.kind().label(),
                        stats.escaped,
                        stats.bounded,
                        stats.last_compute
                    ));
                }
                ui.small(format!("Julia seed {}", self.session.julia_seed()));
                if let Some(status) = &self.status {
                    ui.colored_label(ui.visuals().error_fg_color, status);
                }
            });
    }

    fn apply_form(&mut self) {
        match self.form.to_parameters() {
            Ok(params) => {
                let result = self.session.bind_parameters(params);
                if self.report("Update failed", result) {
                    self.status = None;
                }
            }
            Err(e) => {
                warn!("Rejected parameters: {e}");
                self.status = Some(e.to_string());
            }
        }
    }

    fn draw_canvases(&mut self, ctx: &egui::Context) {
        let field = self.session.field(Canvas::Mandelbrot);
        let size = egui::vec2(field.width() as f32, field.height() as f32);
        let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal_top(|ui| {
                ui.spacing_mut().item_spacing.x = CANVAS_SPACING;
                for canvas in Canvas::ALL {
                    let (rect, _) = ui.allocate_exact_size(size, egui::Sense::click_and_drag());
                    self.canvas_rects[canvas.index()] = rect;
                    let painter = ui.painter_at(rect);
                    match self.session.surface(canvas).renderer().texture() {
                        Some(tex) => painter.image(tex.id(), rect, uv, egui::Color32::WHITE),
                        None => painter.rect_filled(rect, 0.0, egui::Color32::BLACK),
                    };
                }
            });
            if let Some(canvas) = self.captured {
                let controller = self.session.controller(canvas);
                let hint = match controller.state() {
                    DragState::Dragging { .. } if controller.is_dragged() => "Release to zoom",
                    DragState::Dragging { .. } if canvas == Canvas::Mandelbrot => {
                        "Release to pick the Julia seed"
                    }
                    _ => "",
                };
                if !hint.is_empty() {
                    ui.label(hint);
                }
            }
        });
    }

    /// Canvas pixel position of a screen point, clamped to the canvas.
    fn local_pos(&self, canvas: Canvas, pos: egui::Pos2) -> PixelPos {
        let rect = self.canvas_rects[canvas.index()];
        let field = self.session.field(canvas);
        let (w, h) = (field.width() as f32, field.height() as f32);
        let x = ((pos.x - rect.min.x) * w / rect.width().max(1.0)).clamp(0.0, w);
        let y = ((pos.y - rect.min.y) * h / rect.height().max(1.0)).clamp(0.0, h);
        PixelPos::new(x as f64, y as f64)
    }

    fn canvas_at(&self, pos: egui::Pos2) -> Option<Canvas> {
        Canvas::ALL
            .into_iter()
            .find(|c| self.canvas_rects[c.index()].contains(pos))
    }

    /// Route this frame's primary-button pointer events, in arrival order,
    /// to the canvas that was pressed.
    fn route_pointer_events(&mut self, ctx: &egui::Context) {
        let events = ctx.input(|i| i.events.clone());
        for event in events {
            let routed = match event {
                egui::Event::PointerButton {
                    pos,
                    button: egui::PointerButton::Primary,
                    pressed: true,
                    ..
                } => self.canvas_at(pos).map(|canvas| {
                    self.captured = Some(canvas);
                    (canvas, FieldEvent::PointerDown(self.local_pos(canvas, pos)))
                }),
                egui::Event::PointerMoved(pos) => self
                    .captured
                    .map(|canvas| (canvas, FieldEvent::PointerMove(self.local_pos(canvas, pos)))),
                egui::Event::PointerButton {
                    pos,
                    button: egui::PointerButton::Primary,
                    pressed: false,
                    ..
                } => self
                    .captured
                    .take()
                    .map(|canvas| (canvas, FieldEvent::PointerUp(self.local_pos(canvas, pos)))),
                _ => None,
            };
            if let Some((canvas, event)) = routed {
                let result = self.session.dispatch(canvas, event);
                self.report("Pointer event failed", result);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// eframe::App
// ---------------------------------------------------------------------------

impl eframe::App for HueBrotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::dark());

        self.draw_side_panel(ctx);
        self.draw_canvases(ctx);
        self.route_pointer_events(ctx);

        let result = self.session.advance(Instant::now).map(|_| ());
        self.report("Animation tick failed", result);

        if let Some(params) = self.session.take_parameter_update() {
            self.form = params.into();
        }

        if let Some(wait) = self.session.animation().time_until_next(Instant::now()) {
            ctx.request_repaint_after(wait);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.session.animation_mut().stop();
        self.preferences.last_parameters = Some(self.session.parameters());
        let animation = self.session.animation();
        self.preferences.animate_mandelbrot = animation.is_enabled(Canvas::Mandelbrot);
        self.preferences.animate_julia = animation.is_enabled(Canvas::Julia);
        let ticks = animation.ticks();
        self.preferences.save();
        info!(ticks, "Saved preferences on exit");
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub(crate) fn run() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting HueBrot");

    let prefs = Preferences::load();
    let side = prefs.canvas_size as f32;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("HueBrot")
            .with_inner_size([
                SIDE_PANEL_WIDTH + 2.0 * side + CANVAS_SPACING + 40.0,
                side + 40.0,
            ])
            .with_resizable(false),
        ..Default::default()
    };

    eframe::run_native(
        "HueBrot",
        options,
        Box::new(move |cc| {
            let app = HueBrotApp::new(&cc.egui_ctx, prefs)?;
            Ok(Box::new(app))
        }),
    )
}
