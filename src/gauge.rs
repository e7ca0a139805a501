//! The thermometer gauge itself.
//!
//! A [`ThermometerGauge`] owns a fixed outline (circular bulb plus vertical
//! bar) on one [`Scene`] and repeatedly replaces a clipped fill and a
//! numeric label as new readings arrive. The outline is drawn once per
//! instance; updates only ever touch the shapes this gauge created.

use thiserror::Error;

use crate::config::{Color, GaugeSpec, SpecError};
use crate::localize::{LocalizationError, Localizer};
use crate::scene::{Anchor, AxisLimits, Clip, Scene, Shape, ShapeId, Tick};

#[derive(Debug, Error)]
pub enum GaugeError {
    /// The bound scene is closed, or the call targets a different scene
    /// than the one the outline was drawn on.
    #[error("render target unavailable: {0}")]
    RenderTargetUnavailable(&'static str),
    #[error(transparent)]
    Localization(#[from] LocalizationError),
}

#[derive(Debug)]
pub struct ThermometerGauge {
    spec: GaugeSpec,
    localizer: Localizer,
    /// Color of the hollow interior, normally the panel background.
    background: Color,
    bound_scene: Option<u64>,
    outline_drawn: bool,
    current_reading: Option<f64>,
    fill_bulb: Option<ShapeId>,
    fill_bar: Option<ShapeId>,
    label: Option<ShapeId>,
}

impl ThermometerGauge {
    /// Validate `spec` and create a gauge that has not drawn anything yet.
    pub fn new(spec: GaugeSpec, localizer: Localizer) -> Result<Self, SpecError> {
        spec.validate()?;
        Ok(Self {
            spec,
            localizer,
            background: Color::WHITE,
            bound_scene: None,
            outline_drawn: false,
            current_reading: None,
            fill_bulb: None,
            fill_bar: None,
            label: None,
        })
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn spec(&self) -> &GaugeSpec {
        &self.spec
    }

    pub fn current_reading(&self) -> Option<f64> {
        self.current_reading
    }

    pub fn outline_drawn(&self) -> bool {
        self.outline_drawn
    }

    // --- derived geometry, all in data units ---

    /// y-coordinate of the bottom of the bar and the center of the bulb.
    pub fn origin_y(&self) -> f64 {
        self.spec.min_value + self.spec.bulb_diameter() / 2.0
    }

    pub fn bar_height(&self) -> f64 {
        self.spec.max_value - self.origin_y()
    }

    pub fn x_min(&self) -> f64 {
        -self.spec.bar_width / 2.0 - self.spec.padding_x
    }

    pub fn x_max(&self) -> f64 {
        self.spec.bar_width / 2.0 + self.spec.padding_x
    }

    pub fn y_min(&self) -> f64 {
        self.spec.min_value - self.spec.padding_y
    }

    pub fn y_max(&self) -> f64 {
        self.spec.max_value + self.spec.padding_y
    }

    /// Height of the fill column for a reading. Deliberately unclamped:
    /// out-of-range readings overflow the outline instead of being hidden.
    pub fn fill_height(&self, temperature: f64) -> f64 {
        temperature - self.spec.min_value
    }

    fn inner_bulb(&self) -> Clip {
        Clip::Circle {
            cx: 0.0,
            cy: self.origin_y(),
            radius: self.spec.bulb_diameter() / 2.0 - self.spec.outline_thickness,
        }
    }

    fn inner_bar(&self) -> Clip {
        let t = self.spec.outline_thickness;
        Clip::Rect {
            x: -self.spec.bar_width / 2.0 + t,
            y: self.origin_y(),
            width: self.spec.bar_width - 2.0 * t,
            height: self.bar_height() - t,
        }
    }

    fn format_label(&self, temperature: f64) -> String {
        format!("{:.1}{}", temperature, self.spec.units)
    }

    /// Ticks at round values inside `[min_value, max_value]`, labels
    /// suffixed with the units.
    fn axis_ticks(&self) -> Vec<Tick> {
        let step = nice_step(self.spec.max_value - self.spec.min_value);
        let first = (self.spec.min_value / step).ceil() as i64;
        let last = (self.spec.max_value / step).floor() as i64;
        (first..=last)
            .map(|i| {
                let value = i as f64 * step;
                Tick {
                    value,
                    label: format!("{:.0}{}", value, self.spec.units),
                }
            })
            .collect()
    }

    /// Draw the thermometer outline and bind `scene` as the permanent
    /// render surface.
    ///
    /// The hollow interior comes from layering: an outer bulb and bar in
    /// the outline color, then an inner bulb and bar in the background
    /// color on top. No boolean shape subtraction needed.
    ///
    /// Calling this a second time on the bound scene is a no-op; calling
    /// it on any other scene fails.
    pub fn draw_outline(&mut self, scene: &mut Scene) -> Result<(), GaugeError> {
        if self.outline_drawn {
            return if self.bound_scene == Some(scene.id()) {
                Ok(())
            } else {
                Err(GaugeError::RenderTargetUnavailable(
                    "outline already bound to a different scene",
                ))
            };
        }
        if !scene.is_open() {
            return Err(GaugeError::RenderTargetUnavailable("scene is closed"));
        }

        let origin_y = self.origin_y();
        scene.add(Shape::Circle {
            cx: 0.0,
            cy: origin_y,
            radius: self.spec.bulb_diameter() / 2.0,
            color: self.spec.outline_color,
        });
        scene.add(Shape::Rect {
            x: -self.spec.bar_width / 2.0,
            y: origin_y,
            width: self.spec.bar_width,
            height: self.bar_height(),
            color: self.spec.outline_color,
        });
        let t = self.spec.outline_thickness;
        scene.add(Shape::Circle {
            cx: 0.0,
            cy: origin_y,
            radius: self.spec.bulb_diameter() / 2.0 - t,
            color: self.background,
        });
        scene.add(Shape::Rect {
            x: -self.spec.bar_width / 2.0 + t,
            y: origin_y,
            width: self.spec.bar_width - 2.0 * t,
            height: self.bar_height() - t,
            color: self.background,
        });

        scene.set_limits(AxisLimits {
            x_min: self.x_min(),
            x_max: self.x_max(),
            y_min: self.y_min(),
            y_max: self.y_max(),
        });
        scene.set_ticks(self.axis_ticks());

        self.bound_scene = Some(scene.id());
        self.outline_drawn = true;
        Ok(())
    }

    /// Show a new reading.
    ///
    /// The fill spans `[min_value, temperature]` unclamped and is clipped
    /// to the inner bulb and inner bar, so out-of-range readings visibly
    /// overflow the outline. The previous fill and label are removed only
    /// after the new shapes exist; a failed update leaves the old reading
    /// on screen.
    ///
    /// If the outline has not been drawn yet it is drawn here first
    /// (auto-heal; see `draw_outline`).
    pub fn update(
        &mut self,
        scene: &mut Scene,
        temperature: f64,
        show_label: bool,
        description: Option<&str>,
    ) -> Result<(), GaugeError> {
        if !self.outline_drawn {
            self.draw_outline(scene)?;
        }
        if self.bound_scene != Some(scene.id()) {
            return Err(GaugeError::RenderTargetUnavailable(
                "update targets a different scene than the outline",
            ));
        }
        if !scene.is_open() {
            return Err(GaugeError::RenderTargetUnavailable("scene is closed"));
        }

        // Everything fallible happens before any shape is touched.
        let caption = match description {
            Some(text) => Some(self.localizer.localize(text)?.into_owned()),
            None => None,
        };

        let x = self.x_min();
        let width = self.x_max() - self.x_min();
        let height = self.fill_height(temperature);
        let new_bulb = scene.add(Shape::ClippedRect {
            x,
            y: self.spec.min_value,
            width,
            height,
            clip: self.inner_bulb(),
            color: self.spec.fill_color,
        });
        let new_bar = scene.add(Shape::ClippedRect {
            x,
            y: self.spec.min_value,
            width,
            height,
            clip: self.inner_bar(),
            color: self.spec.fill_color,
        });
        let new_label = show_label.then(|| {
            scene.add(Shape::Text {
                x: self.x_max(),
                y: temperature,
                text: self.format_label(temperature),
                size: self.spec.label_font_size,
                color: self.spec.fill_color,
                anchor: Anchor::LeftCenter,
            })
        });

        for old in [self.fill_bulb.take(), self.fill_bar.take(), self.label.take()]
            .into_iter()
            .flatten()
        {
            scene.remove(old);
        }
        self.fill_bulb = Some(new_bulb);
        self.fill_bar = Some(new_bar);
        self.label = new_label;

        if let Some(caption) = caption {
            scene.set_caption(caption);
        }
        self.current_reading = Some(temperature);
        Ok(())
    }
}

/// Tick spacing of 1, 2 or 5 times a power of ten, targeting about six
/// intervals across the span.
fn nice_step(span: f64) -> f64 {
    let raw = span / 6.0;
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let factor = if normalized < 1.5 {
        1.0
    } else if normalized < 3.5 {
        2.0
    } else if normalized < 7.5 {
        5.0
    } else {
        10.0
    };
    factor * magnitude
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::localize::{Language, LocalizationMode};
    use approx::assert_abs_diff_eq;

    fn test_spec() -> GaugeSpec {
        GaugeSpec::builder()
            .min_value(-20.0)
            .max_value(50.0)
            .bar_width(10.0)
            .outline_thickness(1.0)
            .padding_x(2.0)
            .padding_y(3.0)
            .build()
    }

    fn test_gauge() -> ThermometerGauge {
        ThermometerGauge::new(test_spec(), Localizer::default()).unwrap()
    }

    #[test]
    fn derived_geometry_matches_the_spec() {
        let gauge = test_gauge();
        // bulb diameter defaults to 2 x bar width = 20
        assert_abs_diff_eq!(gauge.origin_y(), -10.0);
        assert_abs_diff_eq!(gauge.bar_height(), 60.0);
        assert_abs_diff_eq!(gauge.x_min(), -7.0);
        assert_abs_diff_eq!(gauge.x_max(), 7.0);
        assert_abs_diff_eq!(gauge.y_min(), -23.0);
        assert_abs_diff_eq!(gauge.y_max(), 53.0);
    }

    #[test]
    fn invalid_spec_is_rejected_at_construction() {
        let spec = GaugeSpec::builder().min_value(5.0).max_value(5.0).build();
        assert!(ThermometerGauge::new(spec, Localizer::default()).is_err());
    }

    #[test]
    fn outline_is_four_layered_shapes_plus_axis_state() {
        let mut gauge = test_gauge();
        let mut scene = Scene::new();
        gauge.draw_outline(&mut scene).unwrap();
        assert_eq!(scene.shape_count(), 4);
        assert!(gauge.outline_drawn());
        let limits = scene.limits().unwrap();
        assert_abs_diff_eq!(limits.x_min, -7.0);
        assert_abs_diff_eq!(limits.y_max, 53.0);
        assert!(!scene.ticks().is_empty());
    }

    #[test]
    fn ticks_stay_in_range_and_carry_units() {
        let mut gauge = test_gauge();
        let mut scene = Scene::new();
        gauge.draw_outline(&mut scene).unwrap();
        for tick in scene.ticks() {
            assert!(tick.value >= -20.0 && tick.value <= 50.0);
            assert!(tick.label.ends_with("°C"), "label {:?}", tick.label);
        }
        assert!(scene.ticks().iter().any(|t| t.label == "0°C"));
    }

    #[test]
    fn second_outline_draw_is_a_no_op() {
        let mut gauge = test_gauge();
        let mut scene = Scene::new();
        gauge.draw_outline(&mut scene).unwrap();
        gauge.draw_outline(&mut scene).unwrap();
        assert_eq!(scene.shape_count(), 4);
    }

    #[test]
    fn outline_refuses_a_different_scene() {
        let mut gauge = test_gauge();
        let mut scene = Scene::new();
        let mut other = Scene::new();
        gauge.draw_outline(&mut scene).unwrap();
        assert!(matches!(
            gauge.draw_outline(&mut other),
            Err(GaugeError::RenderTargetUnavailable(_))
        ));
    }

    #[test]
    fn update_auto_draws_the_outline() {
        let mut gauge = test_gauge();
        let mut scene = Scene::new();
        gauge.update(&mut scene, 20.0, true, None).unwrap();
        assert!(gauge.outline_drawn());
        // 4 outline shapes + 2 fills + 1 label
        assert_eq!(scene.shape_count(), 7);
        assert_eq!(gauge.current_reading(), Some(20.0));
    }

    #[test]
    fn update_replaces_fill_and_label_without_accumulation() {
        let mut gauge = test_gauge();
        let mut scene = Scene::new();
        gauge.update(&mut scene, 10.0, true, None).unwrap();
        let first_ids: Vec<_> = [gauge.fill_bulb, gauge.fill_bar, gauge.label]
            .into_iter()
            .flatten()
            .collect();
        gauge.update(&mut scene, 30.0, true, None).unwrap();
        assert_eq!(scene.shape_count(), 7);
        for id in first_ids {
            assert!(!scene.contains(id), "stale shape survived the update");
        }
        for id in [gauge.fill_bulb, gauge.fill_bar, gauge.label]
            .into_iter()
            .flatten()
        {
            assert!(scene.contains(id));
        }
    }

    #[test]
    fn update_without_label_adds_only_the_fills() {
        let mut gauge = test_gauge();
        let mut scene = Scene::new();
        gauge.update(&mut scene, 10.0, false, None).unwrap();
        assert_eq!(scene.shape_count(), 6);
        assert!(gauge.label.is_none());
    }

    #[test]
    fn fill_height_is_strictly_monotonic() {
        let gauge = test_gauge();
        assert!(gauge.fill_height(30.0) > gauge.fill_height(10.0));
        assert_abs_diff_eq!(gauge.fill_height(-20.0), 0.0);
    }

    #[test]
    fn out_of_range_reading_is_not_clamped() {
        let mut gauge = test_gauge();
        let mut scene = Scene::new();
        let above_max = 60.0;
        gauge.update(&mut scene, above_max, true, None).unwrap();
        assert!(gauge.fill_height(above_max) > gauge.bar_height());
        let fill = scene.shape(gauge.fill_bar.unwrap()).unwrap();
        match fill {
            Shape::ClippedRect { y, height, .. } => {
                assert_abs_diff_eq!(y + height, above_max);
            }
            other => panic!("unexpected fill shape {:?}", other),
        }
    }

    #[test]
    fn label_shows_one_decimal_and_units() {
        let spec = GaugeSpec::builder()
            .min_value(-273.15)
            .max_value(300.0)
            .build();
        let mut gauge = ThermometerGauge::new(spec, Localizer::default()).unwrap();
        let mut scene = Scene::new();
        gauge.update(&mut scene, 254.8, true, None).unwrap();
        match scene.shape(gauge.label.unwrap()).unwrap() {
            Shape::Text { text, anchor, .. } => {
                assert_eq!(text, "254.8°C");
                assert_eq!(*anchor, Anchor::LeftCenter);
            }
            other => panic!("unexpected label shape {:?}", other),
        }
    }

    #[test]
    fn description_is_localized_into_the_caption() {
        let localizer = Localizer::new(Language::Swedish, LocalizationMode::Lenient);
        let mut gauge = ThermometerGauge::new(test_spec(), localizer).unwrap();
        let mut scene = Scene::new();
        gauge
            .update(&mut scene, 10.0, true, Some("Surface temperature"))
            .unwrap();
        assert_eq!(scene.caption(), Some("Markens temperatur"));
    }

    #[test]
    fn closed_scene_fails_without_disturbing_state() {
        let mut gauge = test_gauge();
        let mut scene = Scene::new();
        gauge.update(&mut scene, 10.0, true, None).unwrap();
        scene.close();
        let err = gauge.update(&mut scene, 30.0, true, None);
        assert!(matches!(err, Err(GaugeError::RenderTargetUnavailable(_))));
        assert_eq!(gauge.current_reading(), Some(10.0));
    }

    #[test]
    fn failed_localization_keeps_the_previous_reading() {
        let localizer = Localizer::new(Language::Swedish, LocalizationMode::Strict);
        let mut gauge = ThermometerGauge::new(test_spec(), localizer).unwrap();
        let mut scene = Scene::new();
        gauge
            .update(&mut scene, 10.0, true, Some("Surface temperature"))
            .unwrap();
        let count = scene.shape_count();
        let err = gauge.update(&mut scene, 30.0, true, Some("Not a key"));
        assert!(matches!(err, Err(GaugeError::Localization(_))));
        assert_eq!(scene.shape_count(), count);
        assert_eq!(gauge.current_reading(), Some(10.0));
        assert!(scene.contains(gauge.fill_bar.unwrap()));
    }

    #[test]
    fn many_updates_never_grow_the_scene() {
        let mut gauge = test_gauge();
        let mut scene = Scene::new();
        for i in 0..100 {
            gauge.update(&mut scene, i as f64, true, None).unwrap();
        }
        assert_eq!(scene.shape_count(), 7);
    }

    #[test]
    fn nice_step_picks_round_intervals() {
        assert_abs_diff_eq!(nice_step(70.0), 10.0);
        assert_abs_diff_eq!(nice_step(373.15), 50.0);
        assert_abs_diff_eq!(nice_step(1.0), 0.2);
    }
}
