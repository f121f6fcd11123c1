use anyhow::Context;
use clap::{Arg, ArgGroup, Command};
use log::LevelFilter;
use spam_detector::classifier::BinaryClassifier;
use spam_detector::session::{self, Session};
use spam_detector::views::{self, Page};
use spam_detector::{classify, Config, ModelArtifacts, SharedArtifacts};
use std::io;
use std::path::Path;
use std::process;

fn cli() -> Command {
    Command::new("spam-detector")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Classify text messages as spam or ham with a pre-trained TF-IDF model")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path (defaults next to the executable)")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Generate a default configuration file")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("test-config")
                .long("test-config")
                .help("Load the configuration and model artifacts, then exit")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("message")
                .short('m')
                .long("message")
                .value_name("TEXT")
                .help("Classify a single message and exit")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("message-file")
                .long("message-file")
                .value_name("FILE")
                .help("Classify the contents of a file as one message and exit")
                .conflicts_with("message")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("page")
                .long("page")
                .value_name("NAME")
                .help("Open one view (home, predict, insights, about); static views print and exit")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print predictions as JSON (with --message or --message-file)")
                .requires("input")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .group(ArgGroup::new("input").args(["message", "message-file"]))
}

fn main() {
    let matches = cli().get_matches();

    if let Some(generate_path) = matches.get_one::<String>("generate-config") {
        generate_default_config(Path::new(generate_path));
        return;
    }

    let config_path = matches.get_one::<String>("config");
    let config = match load_config(config_path.map(Path::new)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e:#}");
            process::exit(1);
        }
    };

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        config.log_level()
    };
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    let start_page = match matches.get_one::<String>("page").map(|name| name.parse::<Page>()) {
        Some(Ok(Page::TryModel)) => Some(Page::TryModel),
        Some(Ok(page)) => {
            render_static(page, &config);
            return;
        }
        Some(Err(e)) => {
            eprintln!("❌ {e}. Use home, predict, insights or about");
            process::exit(1);
        }
        None => None,
    };

    // Every remaining mode needs the model, so a load failure is fatal here.
    let artifacts = match load_artifacts(&config) {
        Ok(artifacts) => artifacts,
        Err(e) => {
            eprintln!("❌ Failed to load model artifacts: {e:#}");
            process::exit(1);
        }
    };

    if matches.get_flag("test-config") {
        println!("🔍 Testing configuration...");
        println!();
        println!("Model: {}", config.model_path().display());
        println!("Vectorizer: {}", config.vectorizer_path().display());
        println!("Vocabulary size: {}", artifacts.vectorizer.vocabulary_size());
        println!("Classifier: {}", artifacts.classifier.kind());
        println!("✅ Model artifacts loaded successfully");
        return;
    }

    let message = if let Some(text) = matches.get_one::<String>("message") {
        Some(text.clone())
    } else if let Some(path) = matches.get_one::<String>("message-file") {
        match std::fs::read_to_string(path) {
            Ok(content) => Some(content),
            Err(e) => {
                eprintln!("❌ Error reading message file {path}: {e}");
                process::exit(1);
            }
        }
    } else {
        None
    };

    if let Some(text) = message {
        predict_once(&artifacts, &text, matches.get_flag("json"));
        return;
    }

    run_interactive(artifacts, &config, start_page);
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) if path.exists() => Config::from_file(path)
            .with_context(|| format!("invalid configuration file {}", path.display())),
        Some(path) => {
            // logger is not up yet at this point
            eprintln!(
                "Configuration file '{}' not found, using default configuration",
                path.display()
            );
            Ok(Config::default())
        }
        None => Ok(Config::default()),
    }
}

fn generate_default_config(path: &Path) {
    let config = Config::default();
    match config.to_file(path) {
        Ok(()) => {
            println!("Default configuration written to: {}", path.display());
            println!("Relative paths in it are resolved against the file's directory.");
        }
        Err(e) => {
            eprintln!("Error writing configuration file: {e}");
            process::exit(1);
        }
    }
}

fn load_artifacts(config: &Config) -> anyhow::Result<SharedArtifacts> {
    let model_path = config.model_path();
    let vectorizer_path = config.vectorizer_path();
    let artifacts = ModelArtifacts::load(&model_path, &vectorizer_path)
        .context("the classifier cannot serve predictions")?;
    Ok(artifacts.into_shared())
}

fn render_static(page: Page, config: &Config) {
    let stdout = io::stdout();
    if let Err(e) = views::render_page(&mut stdout.lock(), page, config) {
        log::error!("Failed to render {page}: {e}");
        process::exit(1);
    }
}

fn predict_once(artifacts: &ModelArtifacts, text: &str, json: bool) {
    let prediction = match classify(text, artifacts) {
        Ok(prediction) => prediction,
        Err(e) => {
            eprintln!("⚠️  {e}");
            process::exit(2);
        }
    };

    if json {
        match serde_json::to_string_pretty(&prediction) {
            Ok(body) => println!("{body}"),
            Err(e) => {
                log::error!("Failed to serialize prediction: {e}");
                process::exit(1);
            }
        }
    } else {
        println!("{prediction}");
    }
}

fn run_interactive(artifacts: SharedArtifacts, config: &Config, start_page: Option<Page>) {
    if let Err(e) = ctrlc::set_handler(|| {
        log::info!("Received interrupt, ending session");
        let _ = session::write_interrupt_goodbye(&mut io::stdout());
        process::exit(0);
    }) {
        log::warn!("Failed to install interrupt handler: {e}");
    }

    log::info!("Starting interactive session");
    let stdin = io::stdin();
    // stdout stays unlocked so the interrupt handler thread can still write
    let mut interactive = Session::new(artifacts, config, stdin.lock(), io::stdout());
    if let Some(page) = start_page {
        interactive = interactive.starting_at(page);
    }
    if let Err(e) = interactive.run() {
        log::error!("Session error: {e}");
        process::exit(1);
    }
}
