//! Zero-dimensional energy-balance radiation models of the Earth.
//!
//! Three closed-form variants share one parameter set: the simplest
//! absorbed-vs-emitted balance, one with an infrared-absorbing atmosphere,
//! and one that additionally absorbs solar radiation in the atmosphere.
//! All of them are pure: parameters in, equilibrium temperatures (Kelvin)
//! out.

use thiserror::Error;

/// Offset between Kelvin and degree Celsius.
pub const ABSOLUTE_ZERO_DEG_C: f64 = -273.15;
/// Present-day solar constant, W m^-2.
pub const SOLAR_INTENSITY: f64 = 1361.0;
/// Stefan-Boltzmann constant, W m^-2 K^-4.
pub const STEFAN_BOLTZMANN_CONSTANT: f64 = 5.67e-8;

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin + ABSOLUTE_ZERO_DEG_C
}

#[derive(Debug, Error)]
pub enum ModelError {
    /// The fourth root of a negative radicand has no real solution. Only
    /// reachable with parameters outside their physical range (e.g. an
    /// albedo above 1).
    #[error("negative radicand {0:.3e} in equilibrium temperature")]
    DomainError(f64),
}

fn fourth_root(radicand: f64) -> Result<f64, ModelError> {
    if radicand < 0.0 {
        return Err(ModelError::DomainError(radicand));
    }
    Ok(radicand.powf(0.25))
}

/// Full parameter set; each model variant reads the subset it needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelParams {
    /// Solar intensity as a percentage of the present value.
    pub solar_intensity_percent: f64,
    /// Fraction of incoming solar radiation reflected at the surface.
    pub planet_albedo: f64,
    /// Fraction of infrared radiation absorbed by the atmosphere.
    pub infrared_emissivity: f64,
    /// Fraction of solar radiation absorbed by the atmosphere.
    pub optical_absorptivity: f64,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            solar_intensity_percent: Parameter::Solar.slider().default,
            planet_albedo: Parameter::Albedo.slider().default,
            infrared_emissivity: Parameter::Emissivity.slider().default,
            optical_absorptivity: Parameter::Absorptivity.slider().default,
        }
    }
}

impl ModelParams {
    /// Set one parameter, clamped to its slider range.
    pub fn set(&mut self, parameter: Parameter, value: f64) {
        let slider = parameter.slider();
        let value = value.clamp(slider.min, slider.max);
        match parameter {
            Parameter::Solar => self.solar_intensity_percent = value,
            Parameter::Albedo => self.planet_albedo = value,
            Parameter::Emissivity => self.infrared_emissivity = value,
            Parameter::Absorptivity => self.optical_absorptivity = value,
        }
    }

    fn solar_intensity(&self) -> f64 {
        self.solar_intensity_percent / 100.0 * SOLAR_INTENSITY
    }
}

/// Range, step and description of one input slider.
#[derive(Debug, Clone, Copy)]
pub struct SliderSpec {
    pub default: f64,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    /// Localization key for the slider caption.
    pub description: &'static str,
    /// Decimal places for the readout.
    pub decimals: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    Solar,
    Albedo,
    Emissivity,
    Absorptivity,
}

impl Parameter {
    pub fn slider(&self) -> SliderSpec {
        match self {
            Parameter::Solar => SliderSpec {
                default: 100.0,
                min: 50.0,
                max: 150.0,
                step: 1.0,
                description: "Solar intensity (% of present value)",
                decimals: 0,
            },
            Parameter::Albedo => SliderSpec {
                default: 0.30,
                min: 0.0,
                max: 1.0,
                step: 0.01,
                description: "Planet albedo (fraction)",
                decimals: 2,
            },
            Parameter::Emissivity => SliderSpec {
                default: 0.9,
                min: 0.7,
                max: 1.0,
                step: 0.001,
                description: "Infrared emissivity (fraction)",
                decimals: 3,
            },
            Parameter::Absorptivity => SliderSpec {
                default: 0.105,
                min: 0.0,
                max: 0.5,
                step: 0.001,
                description: "Optical absorptivity (fraction)",
                decimals: 3,
            },
        }
    }
}

/// Equilibrium temperatures in Kelvin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelOutput {
    pub surface_temp: f64,
    pub atmospheric_temp: Option<f64>,
}

impl ModelOutput {
    /// Named readings in display order. The names double as localization
    /// keys for the gauge captions.
    pub fn readings(&self) -> Vec<(&'static str, f64)> {
        let mut out = vec![("Surface temperature", self.surface_temp)];
        if let Some(atm) = self.atmospheric_temp {
            out.push(("Atmospheric temperature", atm));
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnergyBalanceModel {
    /// Solar intensity and surface albedo only.
    Simplest,
    /// Adds an atmosphere that absorbs a fraction of infrared radiation.
    GreenhouseEffect,
    /// Adds absorption of solar radiation in the atmosphere.
    GreenhouseAndSolarAbsorption,
}

impl EnergyBalanceModel {
    /// Localization key for the panel title.
    pub fn title(&self) -> &'static str {
        match self {
            EnergyBalanceModel::Simplest => "Simplest model",
            EnergyBalanceModel::GreenhouseEffect => "With greenhouse effect",
            EnergyBalanceModel::GreenhouseAndSolarAbsorption => {
                "With greenhouse effect and solar absorption"
            }
        }
    }

    /// Sliders this variant exposes.
    pub fn parameters(&self) -> &'static [Parameter] {
        match self {
            EnergyBalanceModel::Simplest => &[Parameter::Solar, Parameter::Albedo],
            EnergyBalanceModel::GreenhouseEffect => {
                &[Parameter::Solar, Parameter::Albedo, Parameter::Emissivity]
            }
            EnergyBalanceModel::GreenhouseAndSolarAbsorption => &[
                Parameter::Solar,
                Parameter::Albedo,
                Parameter::Emissivity,
                Parameter::Absorptivity,
            ],
        }
    }

    /// Evaluate the equilibrium temperatures for `params`.
    pub fn compute(&self, params: &ModelParams) -> Result<ModelOutput, ModelError> {
        let solar = params.solar_intensity();
        let sigma = STEFAN_BOLTZMANN_CONSTANT;
        let albedo = params.planet_albedo;

        match self {
            EnergyBalanceModel::Simplest => {
                let sfc = fourth_root((solar * (1.0 - albedo)) / (4.0 * sigma))?;
                Ok(ModelOutput {
                    surface_temp: sfc,
                    atmospheric_temp: None,
                })
            }
            EnergyBalanceModel::GreenhouseEffect => {
                let emissivity = params.infrared_emissivity;
                let sfc = fourth_root(
                    (solar * (1.0 - albedo)) / (sigma * (4.0 - 2.0 * emissivity)),
                )?;
                let atm = fourth_root(
                    (solar * (1.0 - albedo)) / (sigma * (8.0 - 4.0 * emissivity)),
                )?;
                Ok(ModelOutput {
                    surface_temp: sfc,
                    atmospheric_temp: Some(atm),
                })
            }
            EnergyBalanceModel::GreenhouseAndSolarAbsorption => {
                let emissivity = params.infrared_emissivity;
                let absorptivity = params.optical_absorptivity;

                // Fraction of solar radiation absorbed at the surface.
                let a_prime = (1.0 - absorptivity) * (1.0 - albedo);
                // Fraction reflected back to space at the top of the
                // atmosphere.
                let a_e = (1.0 - absorptivity).powi(2) * albedo;

                let sfc = fourth_root(
                    (solar * (1.0 - a_e + a_prime)) / (4.0 * sigma * (2.0 - emissivity)),
                )?;
                let atm = fourth_root(
                    (4.0 * sigma * sfc.powi(4) - solar * a_prime)
                        / (4.0 * emissivity * sigma),
                )?;
                Ok(ModelOutput {
                    surface_temp: sfc,
                    atmospheric_temp: Some(atm),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn simplest_model_present_day_earth() {
        let params = ModelParams::default();
        let out = EnergyBalanceModel::Simplest.compute(&params).unwrap();
        // S = 1361 W/m^2, albedo = 0.3: T = (S(1-a)/4σ)^(1/4)
        assert_abs_diff_eq!(out.surface_temp, 254.58, epsilon = 0.05);
        assert_abs_diff_eq!(kelvin_to_celsius(out.surface_temp), -18.57, epsilon = 0.05);
        assert!(out.atmospheric_temp.is_none());
    }

    #[test]
    fn greenhouse_effect_warms_the_surface() {
        let params = ModelParams::default();
        let simplest = EnergyBalanceModel::Simplest.compute(&params).unwrap();
        let greenhouse = EnergyBalanceModel::GreenhouseEffect.compute(&params).unwrap();
        assert!(greenhouse.surface_temp > simplest.surface_temp);
    }

    #[test]
    fn greenhouse_atmosphere_is_colder_than_surface() {
        let params = ModelParams::default();
        let out = EnergyBalanceModel::GreenhouseEffect.compute(&params).unwrap();
        assert!(out.atmospheric_temp.unwrap() < out.surface_temp);
    }

    #[test]
    fn solar_absorption_model_yields_two_finite_readings() {
        let params = ModelParams::default();
        let out = EnergyBalanceModel::GreenhouseAndSolarAbsorption
            .compute(&params)
            .unwrap();
        assert!(out.surface_temp.is_finite() && out.surface_temp > 0.0);
        let atm = out.atmospheric_temp.unwrap();
        assert!(atm.is_finite() && atm > 0.0);
        assert!(atm < out.surface_temp);
    }

    #[test]
    fn albedo_above_one_is_a_domain_error() {
        let mut params = ModelParams::default();
        // Bypass the clamping setter on purpose.
        params.planet_albedo = 1.5;
        assert!(matches!(
            EnergyBalanceModel::Simplest.compute(&params),
            Err(ModelError::DomainError(_))
        ));
    }

    #[test]
    fn readings_are_named_in_display_order() {
        let params = ModelParams::default();
        let out = EnergyBalanceModel::GreenhouseEffect.compute(&params).unwrap();
        let names: Vec<_> = out.readings().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, ["Surface temperature", "Atmospheric temperature"]);
    }

    #[test]
    fn set_clamps_to_slider_range() {
        let mut params = ModelParams::default();
        params.set(Parameter::Solar, 400.0);
        assert_eq!(params.solar_intensity_percent, 150.0);
        params.set(Parameter::Albedo, -0.2);
        assert_eq!(params.planet_albedo, 0.0);
    }

    #[test]
    fn model_parameter_lists_grow_with_complexity() {
        assert_eq!(EnergyBalanceModel::Simplest.parameters().len(), 2);
        assert_eq!(EnergyBalanceModel::GreenhouseEffect.parameters().len(), 3);
        assert_eq!(
            EnergyBalanceModel::GreenhouseAndSolarAbsorption.parameters().len(),
            4
        );
    }
}
