use std::env;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use thermometer::{
    EnergyBalanceModel, GaugePanel, Language, LocalizationMode, Localizer, PanelCommand,
    WindowConfig,
};

/// Parse one stdin line of the form `parameter=value`.
fn parse_command(line: &str) -> Option<PanelCommand> {
    let (key, value) = line.split_once('=')?;
    let value: f64 = value.trim().parse().ok()?;
    match key.trim() {
        "solar" => Some(PanelCommand::SetSolar(value)),
        "albedo" => Some(PanelCommand::SetAlbedo(value)),
        "emissivity" => Some(PanelCommand::SetEmissivity(value)),
        "absorptivity" => Some(PanelCommand::SetAbsorptivity(value)),
        _ => None,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut model = EnergyBalanceModel::GreenhouseEffect;
    let mut title: Option<String> = None;
    let mut font_path: Option<PathBuf> = None;
    let mut language = Language::English;
    let mut mode = LocalizationMode::Lenient;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--model" => {
                let name = args.next().unwrap_or_default();
                model = match name.as_str() {
                    "simplest" => EnergyBalanceModel::Simplest,
                    "greenhouse" => EnergyBalanceModel::GreenhouseEffect,
                    "absorption" => EnergyBalanceModel::GreenhouseAndSolarAbsorption,
                    other => {
                        return Err(format!(
                            "unknown model {other:?}; expected simplest, greenhouse or absorption"
                        )
                        .into())
                    }
                };
            }
            "--title" => {
                title = args.next();
            }
            "--font" => {
                font_path = args.next().map(PathBuf::from);
            }
            "--lang" => {
                let name = args.next().unwrap_or_default();
                language = match name.as_str() {
                    "en" => Language::English,
                    "sv" => Language::Swedish,
                    other => return Err(format!("unknown language {other:?}").into()),
                };
            }
            "--strict" => {
                mode = LocalizationMode::Strict;
            }
            other => return Err(format!("unknown argument {other:?}").into()),
        }
    }

    let localizer = Localizer::new(language, mode);
    let mut panel = GaugePanel::new(model, localizer)?;
    if let Some(title) = title {
        panel = panel.with_title(title);
    }

    let font_data = font_path.map(std::fs::read).transpose()?;
    let config = WindowConfig::builder().maybe_font_data(font_data).build();

    // Read parameter updates from stdin, one `parameter=value` per line,
    // and feed them into the panel's command channel.
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match parse_command(line) {
                Some(command) => {
                    if sender.send(command).is_err() {
                        break;
                    }
                }
                None => log::warn!("ignoring unparseable input line {line:?}"),
            }
        }
    });

    panel.show_with_commands(config, receiver)
}
