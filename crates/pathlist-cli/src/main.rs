//! Classify a path list and print the result as JSON.
//!
//! Options default to `PATHLIST_SYMLINKS` / `PATHLIST_TRACE` from the
//! environment (a `.env` file in the working directory is loaded first);
//! flags override them. Verbosity is controlled with `RUST_LOG`.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use pathlist::{parse_path_list, ParseOptions, SymlinkPolicy};

#[derive(Debug, Parser)]
#[command(name = "pathlist")]
#[command(about = "Classify a list of filesystem paths by entry type", long_about = None)]
#[command(version)]
struct Cli {
    /// Report symbolic links as links instead of resolving them
    #[arg(long, conflicts_with = "follow")]
    no_follow: bool,

    /// Resolve symbolic links (overrides PATHLIST_SYMLINKS)
    #[arg(long)]
    follow: bool,

    /// Log every lexed and classified line at trace level
    #[arg(long)]
    trace: bool,

    /// Path list file, one path per line
    file: PathBuf,
}

impl Cli {
    /// Layers the command-line flags over `base`.
    fn options(&self, base: ParseOptions) -> ParseOptions {
        let mut options = base;
        if self.no_follow {
            options.symlinks = SymlinkPolicy::NoFollow;
        } else if self.follow {
            options.symlinks = SymlinkPolicy::Follow;
        }
        if self.trace {
            options.trace = true;
        }
        options
    }
}

fn main() {
    let _ = dotenvy::dotenv();
    env_logger::init();

    let cli = Cli::parse();
    let options = cli.options(ParseOptions::from_env());
    log::debug!("parsing {} with {:?}", cli.file.display(), options);

    let lists = match parse_path_list(&cli.file, options) {
        Ok(lists) => lists,
        Err(e) => {
            eprintln!("Failed to parse {}: {}", cli.file.display(), e);
            process::exit(1);
        }
    };

    match serde_json::to_string_pretty(&lists) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to encode result: {}", e);
            process::exit(1);
        }
    }
}
