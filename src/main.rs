/*
 *  main.rs
 *
 *  wxpaper - ink it in
 *  (c) 2020-26 Stuart Hunter
 *
 *  Render the weather dashboard and push it to the panel
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use std::fs::{self, File};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{error, info, warn};
use thiserror::Error;

use wxpaper::config::{self, Cli, Command, Config, InputArgs, OutputFormat, UpdateArgs};
use wxpaper::constants::ICON_IDS;
use wxpaper::display::{
    dispatch, OutputPaths, PanelDriverFactory, Planes, RenderContext, Renderer, Typeface,
};
use wxpaper::iconprep::{prepare_from_dir, prepare_from_web, PrepareReport};
use wxpaper::iconstore::DirIconStore;
use wxpaper::weather::{resolve_api_key, OpenWeatherClient, WeatherError, WeatherSummary};

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Failures that map to a dedicated exit status
#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("cannot read weather input: {0}")]
    Input(String),
}

fn exit_code_for(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<CliError>() {
        Some(CliError::Usage(_)) => 2,
        Some(CliError::Input(_)) => 3,
        None => 1,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let cfg = match config::load(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(2);
        }
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(cfg.log_level())).init();
    info!("wxpaper v.{} built {}", env!("CARGO_PKG_VERSION"), BUILD_DATE);

    if cli.dump_config {
        return match config::dump(&cfg) {
            Ok(yaml) => {
                println!("{yaml}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("{e}");
                ExitCode::FAILURE
            }
        };
    }

    let command = cli.command.clone().unwrap_or(Command::Render(InputArgs::default()));

    tokio::select! {
        res = run(command, &cfg) => match res {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("{:#}", e);
                ExitCode::from(exit_code_for(&e))
            }
        },
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted.");
            ExitCode::from(130)
        }
    }
}

async fn run(command: Command, cfg: &Config) -> Result<()> {
    match command {
        Command::Render(input) => {
            let summary = read_summary(&input, cfg).await?;
            let paths = render_to_disk(&summary, cfg)?;
            println!("Wrote:");
            for p in [&paths.black, &paths.red, &paths.preview] {
                println!("  {}", p.display());
            }
            Ok(())
        }
        Command::Update(args) => update(args, cfg).await,
        Command::Weather(args) => {
            let summary = fetch_summary(cfg).await?;
            match args.format {
                OutputFormat::Json => println!("{}", summary.to_json_pretty()?),
                OutputFormat::Text => println!("{}", summary.format_text()),
            }
            Ok(())
        }
        Command::PrepareIcons(_) => {
            let store = DirIconStore::new(cfg.icon_dir());
            let opts = cfg.normalize_options();
            let report = match cfg.icon_source_dir() {
                Some(src) => {
                    info!("Normalising icons from {}", src.display());
                    prepare_from_dir(&src, &store, &ICON_IDS, &opts)?
                }
                None => {
                    let client = OpenWeatherClient::for_downloads()?;
                    prepare_from_web(&client, &store, &ICON_IDS, &opts).await?
                }
            };
            summarize_report(&report, &store)
        }
    }
}

async fn update(args: UpdateArgs, cfg: &Config) -> Result<()> {
    let paths = if args.no_render {
        OutputPaths::new(&cfg.output_dir(), &cfg.output_prefix())
    } else {
        // update fetches unless a file is named
        let input = InputArgs {
            fetch: args.input.fetch || args.input.json_file.is_none(),
            ..args.input.clone()
        };
        let summary = read_summary(&input, cfg).await?;
        render_to_disk(&summary, cfg)?
    };

    if !paths.black.is_file() || !paths.red.is_file() {
        bail!(
            "Missing {} or {}. Did rendering succeed?",
            paths.black.display(),
            paths.red.display()
        );
    }
    let planes = Planes::load_pngs(&paths.black, &paths.red)
        .with_context(|| format!("loading {}", paths.black.display()))?;

    let mut driver = PanelDriverFactory::create_from_config(cfg);
    let opts = cfg.dispatch_options();
    let frame = tokio::task::spawn_blocking(move || dispatch(driver.as_mut(), &planes, &opts))
        .await
        .context("panel task")??;
    info!("Done. {}x{} frame sent", frame.width, frame.height);
    Ok(())
}

fn render_to_disk(summary: &WeatherSummary, cfg: &Config) -> Result<OutputPaths> {
    let renderer = Renderer::new(cfg.layout(), Typeface::load_first(&cfg.font_paths()));
    let weather = cfg.weather();
    let ctx = RenderContext { country: weather.country.as_deref(), ..RenderContext::local_now() };
    let icons = DirIconStore::new(cfg.icon_dir());

    let dashboard = renderer.render(summary, &ctx, &icons);
    let out_dir = cfg.output_dir();
    fs::create_dir_all(&out_dir).with_context(|| format!("creating {}", out_dir.display()))?;
    let paths = dashboard
        .save(&out_dir, &cfg.output_prefix())
        .context("saving dashboard images")?;
    Ok(paths)
}

async fn read_summary(input: &InputArgs, cfg: &Config) -> Result<WeatherSummary> {
    if input.fetch {
        return fetch_summary(cfg).await;
    }

    let path = input.json_file.clone();
    let read = tokio::task::spawn_blocking(move || match path {
        Some(path) => File::open(&path)
            .map_err(WeatherError::from)
            .and_then(WeatherSummary::from_reader)
            .map_err(|e| format!("{}: {}", path.display(), e)),
        None => WeatherSummary::from_reader(std::io::stdin().lock()).map_err(|e| match e {
            WeatherError::EmptyInput => format!("{e} (use --json-file, stdin or --fetch)"),
            e => format!("stdin: {e}"),
        }),
    })
    .await
    .context("input task")?;

    read.map_err(|e| CliError::Input(e).into())
}

async fn fetch_summary(cfg: &Config) -> Result<WeatherSummary> {
    let weather = cfg.weather();
    let Some(city) = weather.city.as_deref().filter(|c| !c.trim().is_empty()) else {
        return Err(CliError::Usage("--city is required to fetch weather".into()).into());
    };
    let key = resolve_api_key(weather.api_key.as_deref())
        .map_err(|e| CliError::Usage(e.to_string()))?;
    let client = OpenWeatherClient::new(key, cfg.units())?;
    client
        .summary(city, weather.country.as_deref())
        .await
        .map_err(|e| CliError::Input(e.to_string()).into())
}

fn summarize_report(report: &PrepareReport, store: &DirIconStore) -> Result<()> {
    info!(
        "Prepared {} icons into {}",
        report.written.len(),
        store.dir().display()
    );
    if !report.is_complete() {
        let ids: Vec<&str> = report.failed.iter().map(|(id, _)| id.as_str()).collect();
        bail!("{} icons failed: {}", ids.len(), ids.join(", "));
    }
    Ok(())
}
