#![windows_subsystem = "windows"]

use std::{error::Error, io::Write, path::PathBuf, process, str::FromStr};

#[cfg(target_os = "linux")]
use iced::window::settings::PlatformSpecific;
use iced::{Settings, Size};
use tracing::error;

use hwtest::{miniscript::bitcoin, suite::SuiteFile};
use hwtest_ui::{component::text, font, theme};

use hwtest_gui::{
    app::{App, Config},
    dir::HwTestDirectory,
    logger::parse_log_level,
    settings::{GlobalSettings, WindowConfig},
    VERSION,
};

#[derive(Debug, PartialEq)]
enum Arg {
    DatadirPath(HwTestDirectory),
    Network(bitcoin::Network),
    Suite(PathBuf),
}

fn parse_args(args: Vec<String>) -> Result<Vec<Arg>, Box<dyn Error>> {
    let mut res = Vec::new();

    if args.len() > 1 && (args[1] == "--version" || args[1] == "-v") {
        eprintln!("{}", VERSION);
        process::exit(1);
    }

    if args.len() > 1 && (args[1] == "--help" || args[1] == "-h") {
        eprintln!(
            r#"
Usage: hwtest-gui [OPTIONS]

Options:
    --datadir <PATH>    Path of the data directory
    --suite <PATH>      Path of a TOML file listing additional tests
    -v, --version       Display hwtest-gui version
    -h, --help          Print help
    --bitcoin           Use bitcoin network
    --testnet           Use testnet network (default)
    --signet            Use signet network
    --regtest           Use regtest network
        "#
        );
        process::exit(1);
    }

    for (i, arg) in args.iter().enumerate() {
        if arg == "--datadir" {
            if let Some(a) = args.get(i + 1) {
                res.push(Arg::DatadirPath(HwTestDirectory::new(PathBuf::from(a))));
            } else {
                return Err("missing arg to --datadir".into());
            }
        } else if arg == "--suite" {
            if let Some(a) = args.get(i + 1) {
                res.push(Arg::Suite(PathBuf::from(a)));
            } else {
                return Err("missing arg to --suite".into());
            }
        } else if arg.contains("--") {
            let network = bitcoin::Network::from_str(args[i].trim_start_matches("--"))?;
            res.push(Arg::Network(network));
        }
    }

    Ok(res)
}

fn config(args: Vec<Arg>) -> Result<Config, Box<dyn Error>> {
    let mut datadir = None;
    let mut network = None;
    let mut suite = None;
    for arg in args {
        match arg {
            Arg::DatadirPath(path) if datadir.is_none() => datadir = Some(path),
            Arg::Network(n) if network.is_none() => network = Some(n),
            Arg::Suite(path) if suite.is_none() => suite = Some(path),
            _ => return Err("Unknown args combination".into()),
        }
    }
    let datadir = match datadir {
        Some(datadir) => datadir,
        None => HwTestDirectory::new_default()?,
    };
    let suite = match suite {
        Some(path) => SuiteFile::from_path(&path)?,
        None => SuiteFile::default(),
    };
    Ok(Config::new(datadir, network, suite))
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = parse_args(std::env::args().collect())?;
    let config = config(args)?;
    if !config.datadir.exists() {
        config.datadir.init()?;
    }

    let log_level = parse_log_level()?;

    setup_panic_hook();

    let settings = Settings {
        id: Some("hwtest".to_string()),
        antialiasing: false,

        default_text_size: text::P1_SIZE.into(),
        default_font: font::REGULAR,
        fonts: Vec::new(),
    };

    let global_config_path = GlobalSettings::path(&config.datadir);
    let initial_size = if let Some(WindowConfig { width, height }) =
        GlobalSettings::load_window_config(&global_config_path)
    {
        Size { width, height }
    } else {
        Size {
            width: 1200.0,
            height: 950.0,
        }
    };

    #[allow(unused_mut)]
    let mut window_settings = iced::window::Settings {
        size: initial_size,
        position: iced::window::Position::Default,
        min_size: Some(Size {
            width: 1000.0,
            height: 650.0,
        }),
        exit_on_close_request: false,
        ..Default::default()
    };

    #[cfg(target_os = "linux")]
    {
        window_settings.platform_specific = PlatformSpecific {
            application_id: "hwtest".to_string(),
            ..Default::default()
        };
    }

    if let Err(e) = iced::application(App::title, App::update, App::view)
        .theme(|_| theme::Theme::default())
        .subscription(App::subscription)
        .settings(settings)
        .window(window_settings)
        .run_with(move || App::new((config, log_level)))
    {
        log::error!("{}", e);
        Err(format!("Failed to launch UI: {}", e).into())
    } else {
        Ok(())
    }
}

// A panic in any thread should stop the main thread, and print the panic.
fn setup_panic_hook() {
    std::panic::set_hook(Box::new(move |panic_info| {
        error!("Panic occurred");
        let file = panic_info
            .location()
            .map(|l| l.file())
            .unwrap_or_else(|| "'unknown'");
        let line = panic_info
            .location()
            .map(|l| l.line().to_string())
            .unwrap_or_else(|| "'unknown'".to_string());

        let bt = backtrace::Backtrace::new();
        let info = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned());
        error!(
            "panic occurred at line {} of file {}: {:?}\n{:?}",
            line, file, info, bt
        );

        if let Err(e) = std::io::stdout().flush() {
            error!("Failed to flush stdout: {}", e);
        }
        std::process::exit(1);
    }));
}
