//! The two linked fractal canvases and everything that drives them.
//!
//! All work runs synchronously on the caller's thread: a recompute blocks
//! until it is done, and events for a canvas are handled strictly in the
//! order they are dispatched.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use huebrot_core::{check_max_iterations, Complex, CoreError, PixelPos, Viewport};
use huebrot_render::{FractalField, FractalKind, GridRenderer, GridSurface};

use crate::animation::AnimationLoop;
use crate::interaction::{Gesture, InteractionController, PointerEvent, DRAG_THRESHOLD_PX};

// ---------------------------------------------------------------------------
// Canvas identity and events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Canvas {
    Mandelbrot,
    Julia,
}

impl Canvas {
    pub const ALL: [Canvas; 2] = [Canvas::Mandelbrot, Canvas::Julia];

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Mandelbrot => 0,
            Self::Julia => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Mandelbrot => "Mandelbrot",
            Self::Julia => "Julia",
        }
    }
}

/// Everything that can happen to a canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldEvent {
    PointerDown(PixelPos),
    PointerMove(PixelPos),
    PointerUp(PixelPos),
    AnimationTick,
}

// ---------------------------------------------------------------------------
// Parameters exchanged with the UI
// ---------------------------------------------------------------------------

/// The user-editable state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    pub mandelbrot_iterations: u32,
    pub julia_iterations: u32,
    pub mandelbrot_view: Viewport,
    pub julia_view: Viewport,
    pub julia_seed: Complex,
}

impl ParameterSet {
    pub const DEFAULT_ITERATIONS: u32 = 100;

    /// Check the preconditions the fields rely on. Viewports are valid by
    /// construction.
    pub fn validate(&self) -> huebrot_core::Result<()> {
        check_max_iterations(self.mandelbrot_iterations)?;
        check_max_iterations(self.julia_iterations)?;
        if !self.julia_seed.is_finite() {
            return Err(CoreError::InvalidSeed {
                re: self.julia_seed.re,
                im: self.julia_seed.im,
            });
        }
        Ok(())
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            mandelbrot_iterations: Self::DEFAULT_ITERATIONS,
            julia_iterations: Self::DEFAULT_ITERATIONS,
            mandelbrot_view: Viewport::default(),
            julia_view: Viewport::default(),
            julia_seed: Complex::ZERO,
        }
    }
}

/// Canvas size and gesture tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub width: u32,
    pub height: u32,
    pub drag_threshold: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 400,
            drag_threshold: DRAG_THRESHOLD_PX,
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One canvas: its field, gesture tracker and drawing surface.
struct Pane<R> {
    field: FractalField,
    controller: InteractionController,
    surface: GridSurface<R>,
}

impl<R: GridRenderer> Pane<R> {
    /// Draw the current colors, shading the live selection if any.
    fn present(&mut self) -> huebrot_render::Result<()> {
        let selection = self.controller.selection();
        let frame = self.field.renderable(selection.as_ref());
        self.surface.present(&frame.data)
    }
}

/// The Mandelbrot and Julia canvases, the shared Julia seed, and the
/// animation loop.
pub struct Session<R> {
    mandelbrot: Pane<R>,
    julia: Pane<R>,
    julia_seed: Complex,
    animation: AnimationLoop,
    parameters_changed: bool,
}

impl<R: GridRenderer> Session<R> {
    /// Build both fields from `params`. Nothing is computed until
    /// [`generate_images`](Self::generate_images) runs.
    pub fn new(
        mandelbrot_renderer: R,
        julia_renderer: R,
        config: SessionConfig,
        animation: AnimationLoop,
        params: ParameterSet,
    ) -> huebrot_render::Result<Self> {
        params.validate()?;
        let (w, h) = (config.width, config.height);
        let pane = |kind, renderer, view, iterations| -> huebrot_render::Result<Pane<R>> {
            Ok(Pane {
                field: FractalField::new(kind, w, h, view, iterations)?,
                controller: InteractionController::new(config.drag_threshold),
                surface: GridSurface::new(renderer, w, h),
            })
        };
        Ok(Self {
            mandelbrot: pane(
                FractalKind::Mandelbrot,
                mandelbrot_renderer,
                params.mandelbrot_view,
                params.mandelbrot_iterations,
            )?,
            julia: pane(
                FractalKind::Julia,
                julia_renderer,
                params.julia_view,
                params.julia_iterations,
            )?,
            julia_seed: params.julia_seed,
            animation,
            parameters_changed: false,
        })
    }

    fn pane(&self, canvas: Canvas) -> &Pane<R> {
        match canvas {
            Canvas::Mandelbrot => &self.mandelbrot,
            Canvas::Julia => &self.julia,
        }
    }

    fn pane_mut(&mut self, canvas: Canvas) -> &mut Pane<R> {
        match canvas {
            Canvas::Mandelbrot => &mut self.mandelbrot,
            Canvas::Julia => &mut self.julia,
        }
    }

    pub fn field(&self, canvas: Canvas) -> &FractalField {
        &self.pane(canvas).field
    }

    pub fn surface(&self, canvas: Canvas) -> &GridSurface<R> {
        &self.pane(canvas).surface
    }

    pub fn controller(&self, canvas: Canvas) -> &InteractionController {
        &self.pane(canvas).controller
    }

    pub fn julia_seed(&self) -> Complex {
        self.julia_seed
    }

    pub fn animation(&self) -> &AnimationLoop {
        &self.animation
    }

    pub fn animation_mut(&mut self) -> &mut AnimationLoop {
        &mut self.animation
    }

    /// Flip a canvas's palette animation and return the new flag.
    pub fn toggle_animation(&mut self, canvas: Canvas) -> bool {
        let on = self.animation.toggle(canvas);
        info!(canvas = canvas.label(), on, "animation toggled");
        on
    }

    /// Current parameters, as the UI should display them.
    pub fn parameters(&self) -> ParameterSet {
        ParameterSet {
            mandelbrot_iterations: self.mandelbrot.field.max_iterations(),
            julia_iterations: self.julia.field.max_iterations(),
            mandelbrot_view: *self.mandelbrot.field.viewport(),
            julia_view: *self.julia.field.viewport(),
            julia_seed: self.julia_seed,
        }
    }

    /// Parameters changed by the session since the last call, if any.
    pub fn take_parameter_update(&mut self) -> Option<ParameterSet> {
        if std::mem::take(&mut self.parameters_changed) {
            Some(self.parameters())
        } else {
            None
        }
    }

    /// Recompute, recolor and draw both canvases.
    pub fn generate_images(&mut self) -> huebrot_render::Result<()> {
        for canvas in Canvas::ALL {
            self.rebuild(canvas, |_| Ok(()))?;
        }
        Ok(())
    }

    /// Replace every parameter and regenerate both images.
    ///
    /// Either everything is applied or, on error, nothing is.
    pub fn bind_parameters(&mut self, params: ParameterSet) -> huebrot_render::Result<()> {
        params.validate()?;

        let mut mandelbrot = self.mandelbrot.field.clone();
        mandelbrot.set_viewport(params.mandelbrot_view);
        mandelbrot.set_max_iterations(params.mandelbrot_iterations)?;
        mandelbrot.recompute(params.julia_seed)?;

        let mut julia = self.julia.field.clone();
        julia.set_viewport(params.julia_view);
        julia.set_max_iterations(params.julia_iterations)?;
        julia.recompute(params.julia_seed)?;

        self.mandelbrot.field = mandelbrot;
        self.julia.field = julia;
        self.julia_seed = params.julia_seed;
        self.parameters_changed = true;
        info!(
            seed = %params.julia_seed,
            mandelbrot_iterations = params.mandelbrot_iterations,
            julia_iterations = params.julia_iterations,
            "parameters bound"
        );

        self.mandelbrot.present()?;
        self.julia.present()
    }

    /// Restore the default parameters and regenerate both images.
    /// Palette offsets and animation flags are kept.
    pub fn reset(&mut self) -> huebrot_render::Result<()> {
        for canvas in Canvas::ALL {
            self.pane_mut(canvas).controller.cancel();
        }
        self.bind_parameters(ParameterSet::default())
    }

    /// Handle one event for one canvas.
    pub fn dispatch(&mut self, canvas: Canvas, event: FieldEvent) -> huebrot_render::Result<()> {
        let pointer = match event {
            FieldEvent::PointerDown(pos) => PointerEvent::Down(pos),
            FieldEvent::PointerMove(pos) => PointerEvent::Move(pos),
            FieldEvent::PointerUp(pos) => PointerEvent::Up(pos),
            FieldEvent::AnimationTick => return self.animation_tick(canvas),
        };
        match self.pane_mut(canvas).controller.handle(pointer) {
            Some(gesture) => self.apply_gesture(canvas, gesture),
            None => Ok(()),
        }
    }

    /// Run the animation tick for both canvases if one is due.
    ///
    /// `clock` is read once to decide whether a tick is due and once more
    /// after the tick, to schedule the next one. Returns whether a tick ran.
    pub fn advance<C>(&mut self, mut clock: C) -> huebrot_render::Result<bool>
    where
        C: FnMut() -> Instant,
    {
        if !self.animation.is_due(clock()) {
            return Ok(false);
        }
        let result = Canvas::ALL
            .into_iter()
            .try_for_each(|canvas| self.dispatch(canvas, FieldEvent::AnimationTick));
        self.animation.rearm(clock());
        result.map(|()| true)
    }

    fn animation_tick(&mut self, canvas: Canvas) -> huebrot_render::Result<()> {
        let step = self.animation.hue_step();
        let animate = self.animation.is_enabled(canvas);
        let pane = self.pane_mut(canvas);
        if animate {
            pane.field.advance_offset(step);
            pane.field.recolor()?;
        }
        pane.present()
    }

    fn apply_gesture(&mut self, canvas: Canvas, gesture: Gesture) -> huebrot_render::Result<()> {
        match (gesture, canvas) {
            (Gesture::Pick(pos), Canvas::Mandelbrot) => {
                let seed = self.mandelbrot.field.point_at(pos);
                info!(%seed, "picked Julia seed");
                self.julia_seed = seed;
                self.parameters_changed = true;
                self.rebuild(Canvas::Julia, |_| Ok(()))
            }
            (Gesture::Pick(_), Canvas::Julia) => {
                debug!("click on Julia canvas ignored");
                Ok(())
            }
            (
                Gesture::Zoom {
                    origin,
                    destination,
                },
                _,
            ) => {
                self.rebuild(canvas, |field| field.zoom_to(origin, destination))?;
                let vp = *self.field(canvas).viewport();
                info!(
                    canvas = canvas.label(),
                    "zoomed to [{}, {}]×[{}, {}]",
                    vp.x_min(),
                    vp.x_max(),
                    vp.y_min(),
                    vp.y_max()
                );
                self.parameters_changed = true;
                Ok(())
            }
        }
    }

    /// Apply `change` to a copy of the field, recompute it, and only then
    /// swap it in and draw.
    fn rebuild<F>(&mut self, canvas: Canvas, change: F) -> huebrot_render::Result<()>
    where
        F: FnOnce(&mut FractalField) -> huebrot_render::Result<()>,
    {
        let seed = self.julia_seed;
        let pane = self.pane_mut(canvas);
        let mut next = pane.field.clone();
        change(&mut next)?;
        next.recompute(seed)?;
        pane.field = next;
        pane.present()
    }
}
