use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use rand::Rng;
use thermometer::{
    EnergyBalanceModel, GaugePanel, GaugeSpec, Localizer, PanelCommand, Parameter, WindowConfig,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Two gauges: surface and atmospheric temperature.
    let panel = GaugePanel::new(
        EnergyBalanceModel::GreenhouseAndSolarAbsorption,
        Localizer::default(),
    )?
    .with_gauge_spec(GaugeSpec::builder().min_value(-100.0).max_value(60.0).build())?;

    let (sender, receiver) = mpsc::channel();

    // Wander through parameter space so the fills keep moving.
    thread::spawn(move || {
        let mut rng = rand::rng();
        loop {
            let solar = Parameter::Solar.slider();
            let albedo = Parameter::Albedo.slider();
            let commands = [
                PanelCommand::SetSolar(rng.random_range(solar.min..solar.max)),
                PanelCommand::SetAlbedo(rng.random_range(albedo.min..albedo.max)),
                PanelCommand::SetEmissivity(rng.random_range(0.7..1.0)),
                PanelCommand::SetAbsorptivity(rng.random_range(0.0..0.5)),
            ];
            if commands.iter().any(|cmd| sender.send(cmd.clone()).is_err()) {
                break;
            }
            thread::sleep(Duration::from_millis(100));
        }
    });

    println!("Displaying thermometers for randomly wandering parameters:");
    println!("- Surface temperature (red)");
    println!("- Atmospheric temperature (blue)");
    println!("Press Ctrl+C to exit");

    panel.show_with_commands(WindowConfig::builder().build(), receiver)
}
