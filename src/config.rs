use serde::{Deserialize, Serialize};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};
use dirs_next::home_dir;
use std::{fs, path::{Path, PathBuf}, time::Duration};
use thiserror::Error;

use crate::constants::{
    CANVAS_HEIGHT, CANVAS_WIDTH, DEFAULT_ICON_DIR, DEFAULT_OUTPUT_PREFIX, ICON_PADDING,
    ICON_WHITE_CUTOFF, SVG_RASTER_SIZE,
};
use crate::display::layout::LayoutConfig;
use crate::display::DispatchOptions;
use crate::iconprep::NormalizeOptions;

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level app configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub log_level: Option<String>,     // e.g., "info" | "debug"
    pub display: Option<DisplayConfig>,
    pub fonts: Option<FontsConfig>,
    pub icons: Option<IconsConfig>,
    pub weather: Option<WeatherConfig>,
    pub output: Option<OutputConfig>,
    /// template tuning; canvas size comes from `display`
    pub layout: Option<LayoutConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DisplayConfig {
    pub width: Option<u32>,          // canvas the dashboard is drawn at
    pub height: Option<u32>,
    pub native_width: Option<u32>,   // panel buffer, landscape
    pub native_height: Option<u32>,
    pub rotate_180: Option<bool>,
    pub sleep_after: Option<bool>,
    pub settle_ms: Option<u64>,
    pub driver: Option<DriverKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FontsConfig {
    /// TrueType candidates, first usable wins
    pub paths: Option<Vec<PathBuf>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct IconsConfig {
    pub dir: Option<PathBuf>,
    /// local glyphs for prepare-icons; download when unset
    pub source_dir: Option<PathBuf>,
    pub cutoff: Option<u8>,
    pub padding: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct WeatherConfig {
    pub api_key: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub units: Option<String>,       // OpenWeather "metric"
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct OutputConfig {
    pub dir: Option<PathBuf>,
    pub prefix: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    /// packed plane buffers written to `<prefix>_{black,red}.bin`
    #[value(name = "rawfile")]
    RawFile,
    /// records frames in memory, for dry runs
    Mock,
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone)]
#[command(name = "wxpaper", about = "Weather dashboard for tri-color e-paper", version)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long, global = true)]
    pub log_level: Option<String>,
    /// shorthand for --log-level debug
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    pub debug: bool,
    #[arg(long, global = true)]
    pub city: Option<String>,
    /// country code or banner label, e.g. UK
    #[arg(long, global = true)]
    pub country: Option<String>,
    #[arg(long, global = true)]
    pub api_key: Option<String>,
    #[arg(long, global = true, value_hint = ValueHint::DirPath)]
    pub icons_dir: Option<PathBuf>,
    #[arg(long = "font", global = true, value_hint = ValueHint::FilePath)]
    pub fonts: Vec<PathBuf>,
    #[arg(long, global = true, value_hint = ValueHint::DirPath)]
    pub out_dir: Option<PathBuf>,
    #[arg(long, global = true)]
    pub prefix: Option<String>,
    #[arg(long, global = true)]
    pub display_width: Option<u32>,
    #[arg(long, global = true)]
    pub display_height: Option<u32>,
    #[arg(long, global = true, value_enum)]
    pub driver: Option<DriverKind>,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    pub dump_config: bool,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Render the dashboard PNGs from JSON or a live fetch
    Render(InputArgs),
    /// Render and push the frame to the panel
    Update(UpdateArgs),
    /// Fetch and print current conditions
    Weather(WeatherArgs),
    /// Build the 1-bit icon set
    PrepareIcons(PrepareIconsArgs),
}

#[derive(Debug, Args, Clone, Default)]
pub struct InputArgs {
    /// read the weather record from a file (otherwise stdin)
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "fetch")]
    pub json_file: Option<PathBuf>,
    /// fetch the record from OpenWeather
    #[arg(long, action = ArgAction::SetTrue)]
    pub fetch: bool,
}

#[derive(Debug, Args, Clone, Default)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// skip rendering, display the existing PNGs
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_render: bool,
    #[arg(long = "rotate-180", action = ArgAction::SetTrue)]
    pub rotate_180: bool,
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_sleep: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Args, Clone, Default)]
pub struct WeatherArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Args, Clone, Default)]
pub struct PrepareIconsArgs {
    /// directory of <id>.png / <id>.svg glyphs; download when omitted
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub source_dir: Option<PathBuf>,
    #[arg(long)]
    pub cutoff: Option<u8>,
    #[arg(long)]
    pub padding: Option<u32>,
}

/// Public entry point: read YAML, merge CLI overrides, validate.
pub fn load(cli: &Cli) -> Result<Config, ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, cli);

    // 4) Validate
    validate(&cfg)?;

    Ok(cfg)
}

/// Pretty YAML of effective config (nice for debugging)
pub fn dump(cfg: &Config) -> Result<String, ConfigError> {
    Ok(serde_yaml::to_string(cfg)?)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/wxpaper/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/wxpaper/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/wxpaper.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["wxpaper.yaml", "config/wxpaper.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

pub fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    parse_yaml(&s)
}

pub fn parse_yaml(s: &str) -> Result<Config, ConfigError> {
    let cfg: Config = serde_yaml::from_str(s)?;
    Ok(cfg)
}

macro_rules! take {
    ($dst:expr, $src:expr, $($field:ident),+) => {
        $( if $src.$field.is_some() { $dst.$field = $src.$field; } )+
    };
}

/// Shallow merge `src` into `dst`, Option-by-Option.
pub fn merge(dst: &mut Config, src: Config) {
    // top-level
    if src.log_level.is_some()      { dst.log_level = src.log_level; }
    if src.layout.is_some()         { dst.layout = src.layout; }
    match (&mut dst.display, src.display) {
        (None, Some(c)) => dst.display = Some(c),
        (Some(d), Some(s)) => { take!(d, s, width, height, native_width, native_height, rotate_180, sleep_after, settle_ms, driver); }
        _ => {}
    }
    match (&mut dst.fonts, src.fonts) {
        (None, Some(c)) => dst.fonts = Some(c),
        (Some(d), Some(s)) => { take!(d, s, paths); }
        _ => {}
    }
    match (&mut dst.icons, src.icons) {
        (None, Some(c)) => dst.icons = Some(c),
        (Some(d), Some(s)) => { take!(d, s, dir, source_dir, cutoff, padding); }
        _ => {}
    }
    match (&mut dst.weather, src.weather) {
        (None, Some(c)) => dst.weather = Some(c),
        (Some(d), Some(s)) => { take!(d, s, api_key, city, country, units); }
        _ => {}
    }
    match (&mut dst.output, src.output) {
        (None, Some(c)) => dst.output = Some(c),
        (Some(d), Some(s)) => { take!(d, s, dir, prefix); }
        _ => {}
    }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.debug {
        cfg.log_level = Some("debug".to_string());
    } else if cli.log_level.is_some() {
        cfg.log_level = cli.log_level.clone();
    }

    let weather = cfg.weather.get_or_insert_with(Default::default);
    if cli.city.is_some()    { weather.city = cli.city.clone(); }
    if cli.country.is_some() { weather.country = cli.country.clone(); }
    if cli.api_key.is_some() { weather.api_key = cli.api_key.clone(); }

    let icons = cfg.icons.get_or_insert_with(Default::default);
    if cli.icons_dir.is_some() { icons.dir = cli.icons_dir.clone(); }
    if let Some(Command::PrepareIcons(args)) = &cli.command {
        if args.source_dir.is_some() { icons.source_dir = args.source_dir.clone(); }
        if args.cutoff.is_some()     { icons.cutoff = args.cutoff; }
        if args.padding.is_some()    { icons.padding = args.padding; }
    }

    if !cli.fonts.is_empty() {
        cfg.fonts.get_or_insert_with(Default::default).paths = Some(cli.fonts.clone());
    }

    let output = cfg.output.get_or_insert_with(Default::default);
    if cli.out_dir.is_some() { output.dir = cli.out_dir.clone(); }
    if cli.prefix.is_some()  { output.prefix = cli.prefix.clone(); }

    let display = cfg.display.get_or_insert_with(Default::default);
    if cli.display_width.is_some()  { display.width = cli.display_width; }
    if cli.display_height.is_some() { display.height = cli.display_height; }
    if cli.driver.is_some()         { display.driver = cli.driver; }
    if let Some(Command::Update(args)) = &cli.command {
        if args.rotate_180 { display.rotate_180 = Some(true); }
        if args.no_sleep   { display.sleep_after = Some(false); }
    }
}

/// Put any invariants here (required fields, ranges, etc.)
pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if let Some(display) = cfg.display.as_ref() {
        for (name, v) in [
            ("width", display.width),
            ("height", display.height),
            ("native_width", display.native_width),
            ("native_height", display.native_height),
        ] {
            if v == Some(0) {
                return Err(ConfigError::Validation(format!("display {name} must be > 0")));
            }
        }
    }
    if let Some(icons) = cfg.icons.as_ref() {
        if icons.cutoff == Some(0) {
            return Err(ConfigError::Validation("icons cutoff must be 1..=255".into()));
        }
    }
    cfg.layout().validate().map_err(ConfigError::Validation)?;
    Ok(())
}

// Resolved settings with defaults applied
impl Config {
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }

    pub fn layout(&self) -> LayoutConfig {
        let mut layout = self.layout.clone().unwrap_or_default();
        let display = self.display.clone().unwrap_or_default();
        layout.width = display.width.unwrap_or(CANVAS_WIDTH);
        layout.height = display.height.unwrap_or(CANVAS_HEIGHT);
        layout
    }

    /// Panel buffer size, the canvas size unless set
    pub fn native_size(&self) -> (u32, u32) {
        let layout = self.layout();
        let display = self.display.clone().unwrap_or_default();
        (
            display.native_width.unwrap_or(layout.width),
            display.native_height.unwrap_or(layout.height),
        )
    }

    pub fn driver(&self) -> DriverKind {
        self.display.as_ref().and_then(|d| d.driver).unwrap_or(DriverKind::RawFile)
    }

    pub fn dispatch_options(&self) -> DispatchOptions {
        let display = self.display.clone().unwrap_or_default();
        let defaults = DispatchOptions::default();
        DispatchOptions {
            rotate_180: display.rotate_180.unwrap_or(defaults.rotate_180),
            sleep_after: display.sleep_after.unwrap_or(defaults.sleep_after),
            settle: display.settle_ms.map(Duration::from_millis).unwrap_or(defaults.settle),
        }
    }

    /// Font candidates, the stock system paths unless configured
    pub fn font_paths(&self) -> Vec<PathBuf> {
        self.fonts
            .as_ref()
            .and_then(|f| f.paths.clone())
            .unwrap_or_else(crate::display::fonts::default_candidates)
    }

    pub fn icon_dir(&self) -> PathBuf {
        self.icons
            .as_ref()
            .and_then(|i| i.dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ICON_DIR))
    }

    pub fn icon_source_dir(&self) -> Option<PathBuf> {
        self.icons.as_ref().and_then(|i| i.source_dir.clone())
    }

    pub fn normalize_options(&self) -> NormalizeOptions {
        let icons = self.icons.clone().unwrap_or_default();
        NormalizeOptions {
            cutoff: icons.cutoff.unwrap_or(ICON_WHITE_CUTOFF),
            padding: icons.padding.unwrap_or(ICON_PADDING),
            svg_size: SVG_RASTER_SIZE,
        }
    }

    pub fn weather(&self) -> WeatherConfig {
        self.weather.clone().unwrap_or_default()
    }

    pub fn units(&self) -> String {
        self.weather().units.unwrap_or_else(|| "metric".to_string())
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output
            .as_ref()
            .and_then(|o| o.dir.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn output_prefix(&self) -> String {
        self.output
            .as_ref()
            .and_then(|o| o.prefix.clone())
            .unwrap_or_else(|| DEFAULT_OUTPUT_PREFIX.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("wxpaper").chain(args.iter().copied())).unwrap()
    }

    const YAML: &str = r#"
log_level: warn
display:
  width: 250
  height: 122
  native_width: 250
  native_height: 122
  driver: mock
icons:
  dir: /opt/wx/icons
  cutoff: 240
weather:
  city: Cambridge
  country: UK
output:
  prefix: panel
"#;

    #[test]
    fn test_parse_yaml_sections() {
        let cfg = parse_yaml(YAML).unwrap();
        assert_eq!(cfg.log_level(), "warn");
        assert_eq!(cfg.driver(), DriverKind::Mock);
        assert_eq!(cfg.icon_dir(), PathBuf::from("/opt/wx/icons"));
        assert_eq!(cfg.normalize_options().cutoff, 240);
        assert_eq!(cfg.normalize_options().padding, 3);
        assert_eq!(cfg.output_prefix(), "panel");
        assert_eq!(cfg.weather().city.as_deref(), Some("Cambridge"));
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.log_level(), "info");
        assert_eq!(cfg.layout(), LayoutConfig::default());
        assert_eq!(cfg.native_size(), (250, 122));
        assert_eq!(cfg.driver(), DriverKind::RawFile);
        assert_eq!(cfg.output_prefix(), "dash");
        assert_eq!(cfg.units(), "metric");
        assert_eq!(cfg.font_paths().len(), 2);
        assert!(cfg.dispatch_options().sleep_after);
    }

    #[test]
    fn test_merge_is_option_by_option() {
        let mut cfg = parse_yaml(YAML).unwrap();
        merge(&mut cfg, parse_yaml("weather:\n  city: Leeds\n").unwrap());
        let w = cfg.weather();
        assert_eq!(w.city.as_deref(), Some("Leeds"));
        assert_eq!(w.country.as_deref(), Some("UK"));
    }

    #[test]
    fn test_cli_overrides_yaml() {
        let mut cfg = parse_yaml(YAML).unwrap();
        let c = cli(&["--debug", "--city", "Oslo", "--prefix", "x", "update", "--rotate-180", "--no-sleep"]);
        apply_cli_overrides(&mut cfg, &c);
        assert_eq!(cfg.log_level(), "debug");
        assert_eq!(cfg.weather().city.as_deref(), Some("Oslo"));
        assert_eq!(cfg.weather().country.as_deref(), Some("UK"));
        assert_eq!(cfg.output_prefix(), "x");
        let opts = cfg.dispatch_options();
        assert!(opts.rotate_180);
        assert!(!opts.sleep_after);
    }

    #[test]
    fn test_prepare_icons_args_override() {
        let mut cfg = Config::default();
        apply_cli_overrides(&mut cfg, &cli(&["prepare-icons", "--cutoff", "200", "--source-dir", "src"]));
        assert_eq!(cfg.normalize_options().cutoff, 200);
        assert_eq!(cfg.icon_source_dir(), Some(PathBuf::from("src")));
    }

    #[test]
    fn test_validation() {
        let mut cfg = parse_yaml("display:\n  width: 0\n").unwrap();
        assert!(matches!(validate(&cfg), Err(ConfigError::Validation(_))));
        cfg = parse_yaml("icons:\n  cutoff: 0\n").unwrap();
        assert!(validate(&cfg).is_err());
        cfg = parse_yaml("layout:\n  banner:\n    min_height: 50\n    max_height: 40\n").unwrap();
        assert!(validate(&cfg).is_err());
        assert!(validate(&parse_yaml(YAML).unwrap()).is_ok());
    }

    #[test]
    fn test_layout_section_keeps_display_canvas() {
        let cfg = parse_yaml("display:\n  width: 296\n  height: 128\nlayout:\n  padding: 6\n").unwrap();
        let layout = cfg.layout();
        assert_eq!((layout.width, layout.height, layout.padding), (296, 128, 6));
        assert_eq!(layout.banner.min_height, 34);
    }

    #[test]
    fn test_dump_round_trips() {
        let cfg = parse_yaml(YAML).unwrap();
        assert_eq!(parse_yaml(&dump(&cfg).unwrap()).unwrap(), cfg);
    }

    #[test]
    fn test_json_file_conflicts_with_fetch() {
        assert!(Cli::try_parse_from(["wxpaper", "render", "--fetch", "--json-file", "a.json"]).is_err());
    }
}
