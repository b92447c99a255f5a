//! filtergen: CLI tool for compiling block-list filters from templates.

use clap::{Parser, Subcommand};
use filtergen::{convert, split_lines, BatchDriver, BuildConfig, FilterBuilder};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "filtergen")]
#[command(author = "Kaitu.io")]
#[command(version = "0.1.0")]
#[command(about = "Compile block-list filters from templates and rule fragments", long_about = None)]
struct Cli {
    /// Write log output to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a single filter directory
    Build {
        /// Filter directory containing template.txt and metadata.json
        #[arg(short, long)]
        dir: PathBuf,

        /// Domain blacklist file
        #[arg(short, long)]
        blacklist: Option<PathBuf>,

        /// JSON build configuration
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Build every filter directory under a root directory
    BuildAll {
        /// Directory with one subdirectory per filter
        #[arg(short, long)]
        root: PathBuf,

        /// Domain blacklist file
        #[arg(short, long)]
        blacklist: Option<PathBuf>,

        /// JSON build configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Build filter directories in parallel
        #[arg(short, long)]
        parallel: bool,
    },

    /// Convert legacy rule syntax in a rule file
    Convert {
        /// Input rule file
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.log_file.as_deref(), cli.verbose) {
        eprintln!("Error: cannot open log file: {}", e);
        std::process::exit(1);
    }

    let result = match cli.command {
        Commands::Build {
            dir,
            blacklist,
            config,
        } => build_one(&dir, blacklist, config.as_deref()),
        Commands::BuildAll {
            root,
            blacklist,
            config,
            parallel,
        } => build_all(&root, blacklist, config.as_deref(), parallel),
        Commands::Convert { input, output } => convert_file(&input, output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(log_file: Option<&Path>, verbose: bool) -> std::io::Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));
    if let Some(path) = log_file {
        let file = fs::OpenOptions::new().create(true).append(true).open(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn load_config(
    config: Option<&Path>,
    blacklist: Option<PathBuf>,
) -> Result<BuildConfig, Box<dyn std::error::Error>> {
    let mut build_config = match config {
        Some(path) => BuildConfig::load(path)?,
        None => BuildConfig::default(),
    };
    if let Some(path) = blacklist {
        build_config = build_config.with_blacklist(path);
    }
    Ok(build_config)
}

fn build_one(
    dir: &Path,
    blacklist: Option<PathBuf>,
    config: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let builder = FilterBuilder::from_config(load_config(config, blacklist)?)?;
    let report = builder.build(dir)?;

    println!(
        "Built {:?}: version {}, {} rules",
        report.dir, report.revision.version, report.rule_count
    );
    Ok(())
}

fn build_all(
    root: &Path,
    blacklist: Option<PathBuf>,
    config: Option<&Path>,
    parallel: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut build_config = load_config(config, blacklist)?;
    if parallel {
        build_config = build_config.with_parallel(true);
    }

    let driver = BatchDriver::new(FilterBuilder::from_config(build_config)?);
    let report = driver.run(root)?;

    for build in &report.built {
        println!(
            "  {:?}: version {}, {} rules",
            build.dir, build.revision.version, build.rule_count
        );
    }
    for (dir, e) in &report.failed {
        eprintln!("  {:?}: {}", dir, e);
    }
    println!(
        "Built {} filters, {} failed",
        report.built.len(),
        report.failed.len()
    );

    if !report.is_success() {
        return Err(format!("{} filter(s) failed to build", report.failed.len()).into());
    }
    Ok(())
}

fn convert_file(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let content = fs::read_to_string(input)?;
    let lines = split_lines(&content);
    let conversion = convert(lines.as_slice());

    log::info!(
        "Converted {} rules, {} rewritten from :style() syntax",
        conversion.rules.len(),
        conversion.annotations.len()
    );

    let text = conversion.rules.join("\r\n");
    match output {
        Some(path) => fs::write(path, text)?,
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(text.as_bytes())?;
            handle.write_all(b"\n")?;
        }
    }
    Ok(())
}
