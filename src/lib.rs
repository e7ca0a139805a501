//! Thermometer-style gauges for zero-dimensional Earth energy-balance
//! models.
//!
//! The crate has three layers:
//!
//! - [`model`]: closed-form radiation models mapping slider parameters to
//!   equilibrium temperatures.
//! - [`gauge`] + [`scene`]: the core rendering engine. A
//!   [`ThermometerGauge`] draws its outline once on a retained [`Scene`]
//!   and replaces only its own fill and label on each new reading.
//! - [`GaugePanel`]: one gauge per named temperature, side by side in a
//!   window, driven by parameter-change commands.

pub mod config;
pub mod gauge;
pub mod localize;
pub mod model;
pub mod raster;
pub mod scene;

use std::sync::mpsc::Receiver;
use std::time::Instant;

use pixels::{Pixels, SurfaceTexture};
use rusttype::Font;
use thiserror::Error;
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

pub use config::{Color, GaugeSpec, SpecError, WindowConfig};
pub use gauge::{GaugeError, ThermometerGauge};
pub use localize::{Language, LocalizationError, LocalizationMode, Localizer};
pub use model::{EnergyBalanceModel, ModelError, ModelOutput, ModelParams, Parameter};
pub use scene::{Scene, Shape, ShapeId};

use raster::{draw_label, rasterize_scene, Canvas, TextStyle, Viewport};

/// Command enum for driving a panel from another thread
#[derive(Debug, Clone)]
pub enum PanelCommand {
    SetSolar(f64),
    SetAlbedo(f64),
    SetEmissivity(f64),
    SetAbsorptivity(f64),
    SetParams(ModelParams),
}

#[derive(Debug, Error)]
pub enum PanelError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Gauge(#[from] GaugeError),
    #[error(transparent)]
    Localization(#[from] LocalizationError),
}

struct GaugeSlot {
    name: &'static str,
    gauge: ThermometerGauge,
    scene: Scene,
}

/// A row of thermometer gauges fed by one energy-balance model.
pub struct GaugePanel {
    model: EnergyBalanceModel,
    localizer: Localizer,
    gauge_spec: GaugeSpec,
    params: ModelParams,
    slots: Vec<GaugeSlot>,
    title: String,
}

impl GaugePanel {
    /// Fill colors cycled over the gauges, as in a red/blue thermometer
    /// pair.
    const PALETTE: [Color; 2] = [Color::RED, Color::BLUE];

    pub fn new(model: EnergyBalanceModel, localizer: Localizer) -> Result<Self, PanelError> {
        let title = localizer.localize(model.title())?.into_owned();
        Ok(Self {
            model,
            localizer,
            gauge_spec: GaugeSpec::builder().build(),
            params: ModelParams::default(),
            slots: Vec::new(),
            title,
        })
    }

    /// Replace the gauge template used for new gauges. The fill color is
    /// still assigned per gauge from the palette.
    pub fn with_gauge_spec(mut self, spec: GaugeSpec) -> Result<Self, SpecError> {
        spec.validate()?;
        self.gauge_spec = spec;
        Ok(self)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn model(&self) -> EnergyBalanceModel {
        self.model
    }

    pub fn params(&self) -> &ModelParams {
        &self.params
    }

    pub fn gauge_count(&self) -> usize {
        self.slots.len()
    }

    /// Last displayed Celsius reading of a named gauge.
    pub fn reading(&self, name: &str) -> Option<f64> {
        self.slots
            .iter()
            .find(|slot| slot.name == name)
            .and_then(|slot| slot.gauge.current_reading())
    }

    fn apply_command(&mut self, command: PanelCommand) {
        match command {
            PanelCommand::SetSolar(v) => self.params.set(Parameter::Solar, v),
            PanelCommand::SetAlbedo(v) => self.params.set(Parameter::Albedo, v),
            PanelCommand::SetEmissivity(v) => self.params.set(Parameter::Emissivity, v),
            PanelCommand::SetAbsorptivity(v) => self.params.set(Parameter::Absorptivity, v),
            PanelCommand::SetParams(params) => self.params = params,
        }
    }

    /// Recompute the model for `params` and push each named temperature to
    /// its gauge, creating gauges on first sight and reusing them after.
    pub fn on_parameter_change(&mut self, params: ModelParams) -> Result<(), PanelError> {
        self.params = params;
        let output = self.model.compute(&params)?;
        for (index, (name, kelvin)) in output.readings().into_iter().enumerate() {
            if self.slots.len() <= index {
                let mut spec = self.gauge_spec.clone();
                spec.fill_color = Self::PALETTE[index % Self::PALETTE.len()];
                let gauge = ThermometerGauge::new(spec, self.localizer)
                    .expect("gauge template was validated before");
                self.slots.push(GaugeSlot {
                    name,
                    gauge,
                    scene: Scene::new(),
                });
            }
            let slot = &mut self.slots[index];
            let celsius = model::kelvin_to_celsius(kelvin);
            slot.gauge
                .update(&mut slot.scene, celsius, true, Some(name))?;
        }
        Ok(())
    }

    /// Re-evaluate the model with the current parameters.
    pub fn refresh(&mut self) -> Result<(), PanelError> {
        self.on_parameter_change(self.params)
    }

    /// Open a window and display the panel until it is closed.
    pub fn show(self, config: WindowConfig) -> Result<(), Box<dyn std::error::Error>> {
        self.run_window(config, None)
    }

    /// Like [`show`](Self::show), but parameter commands arrive over a
    /// channel from another thread and are drained between frames.
    pub fn show_with_commands(
        self,
        config: WindowConfig,
        receiver: Receiver<PanelCommand>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.run_window(config, Some(receiver))
    }

    fn run_window(
        mut self,
        config: WindowConfig,
        receiver: Option<Receiver<PanelCommand>>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        // First evaluation creates the gauges, which fixes the window
        // width.
        self.refresh()?;

        let font = match &config.font_data {
            Some(bytes) => {
                Some(Font::try_from_vec(bytes.clone()).ok_or("could not parse font data")?)
            }
            None => {
                log::warn!("no font configured; labels and titles will not be rendered");
                None
            }
        };

        let logical_width = config.gauge_width * self.slots.len().max(1);
        let logical_height = config.window_height;

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&self.title)
            .with_inner_size(LogicalSize::new(
                logical_width as f64,
                logical_height as f64,
            ))
            .with_resizable(false)
            .build(&event_loop)?;
        let window = std::sync::Arc::new(window);

        let size = window.inner_size();
        let mut fb_width = size.width as usize;
        let mut fb_height = size.height as usize;
        let surface_texture = SurfaceTexture::new(size.width, size.height, window.clone());
        let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;

        let frame_duration = std::time::Duration::from_secs_f64(1.0 / config.max_framerate);
        let mut last_frame = Instant::now();

        event_loop.run(move |event, window_target| {
            window_target.set_control_flow(ControlFlow::Poll);
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        fb_width = new_size.width as usize;
                        fb_height = new_size.height as usize;
                        let _ = pixels.resize_buffer(new_size.width, new_size.height);
                        let _ = pixels.resize_surface(new_size.width, new_size.height);
                    }
                    WindowEvent::RedrawRequested => {
                        if let Some(ref receiver) = receiver {
                            let mut changed = false;
                            while let Ok(command) = receiver.try_recv() {
                                self.apply_command(command);
                                changed = true;
                            }
                            if changed {
                                if let Err(err) = self.refresh() {
                                    log::error!("parameter update failed: {err}");
                                }
                            }
                        }

                        let frame = pixels.frame_mut();
                        let mut canvas = Canvas::new(frame, fb_width, fb_height);
                        self.render(&mut canvas, &config, font.as_ref());
                        let _ = pixels.render();
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    if last_frame.elapsed() >= frame_duration {
                        window.request_redraw();
                        last_frame = Instant::now();
                    }
                }
                _ => {}
            }
        })?;

        Ok(())
    }

    fn render(&self, canvas: &mut Canvas, config: &WindowConfig, font: Option<&Font<'_>>) {
        canvas.clear(config.background_color);

        if let Some(font) = font {
            draw_label(
                canvas,
                (canvas.width / 2) as i32,
                (config.title_band / 2) as i32,
                &self.title,
                font,
                config.title_font_size,
                Color::BLACK,
            );
        }

        let style = TextStyle {
            caption_size: config.caption_font_size,
            ..TextStyle::default()
        };
        let slot_width = canvas.width / self.slots.len().max(1);
        let body_height = canvas.height.saturating_sub(config.title_band);
        for (index, slot) in self.slots.iter().enumerate() {
            let viewport = Viewport {
                x: index * slot_width,
                y: config.title_band,
                width: slot_width,
                height: body_height,
            };
            rasterize_scene(canvas, &slot.scene, viewport, font, &style);
        }
    }
}
