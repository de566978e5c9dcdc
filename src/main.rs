mod build;
mod error;
mod ini;
mod keymode;
mod resolve;
mod sources;

use crate::build::{BuildOptions, SPLITTER_DIR, build_skin};
use crate::error::SplitError;
use clap::Parser;
use log::error;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "skinsplit", about = "Split them skins", version)]
struct Cli {
    /// The name of your skin's folder
    #[arg(long, short)]
    skin: Option<String>,

    /// Directory containing skin folders (defaults to the working directory)
    #[arg(long, short)]
    input: Option<PathBuf>,

    /// Directory the generated .osk archives are written to
    #[arg(long, short, default_value = "output")]
    output: PathBuf,

    /// Automatically execute the generated .osks to import them into osu!
    #[arg(long, short)]
    auto_execute: bool,
}

fn watermark() -> Vec<String> {
    vec![
        "This skin.ini was automatically generated using skinsplit (made by Konomi).".to_string(),
        "https://github.com/K0nomi/skinsplit".to_string(),
        "The contents of this skin.ini are not designed to be readable.".to_string(),
        format!("Check the `{SPLITTER_DIR}` folder in this skin's directory for the original configs."),
    ]
}

fn main() {
    let cli = Cli::parse();
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init();

    let options = BuildOptions {
        skin: cli.skin,
        input: cli.input,
        output: cli.output,
        watermark: watermark(),
        auto_execute: cli.auto_execute,
        ..BuildOptions::default()
    };

    if let Err(e) = build_skin(&options) {
        match e {
            SplitError::UnsetSkin => {
                error!("skin argument not set; pass your skin's folder name with `skinsplit -s <skin_name>`");
            }
            other => error!("{other}"),
        }
        process::exit(1);
    }
}
