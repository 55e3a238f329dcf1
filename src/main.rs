use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use progtest::bind::PackageCache;
use progtest::fixtures::FixtureStore;
use progtest::{CaseMode, HarnessConfig, Registry, pipeline, profile};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let args = std::env::args().collect::<Vec<String>>();

    let code = match args.get(1).map(String::as_str) {
        Some("--version" | "-v") => {
            println!("progtest {}", VERSION);
            0
        }
        Some("--help" | "-h") => {
            print_usage(&args[0]);
            0
        }
        Some("list") if args.len() <= 3 => list(args.get(2).map(String::as_str)),
        Some("check") if args.len() <= 3 => check(args.get(2).map(PathBuf::from)),
        _ => {
            print_usage(&args[0]);
            1
        }
    };
    std::process::exit(code);
}

/// Print the case x language matrix
fn list(language: Option<&str>) -> i32 {
    let languages: Vec<&str> = match language {
        Some(language) => match profile::resolve(language) {
            Ok(p) => vec![p.language],
            Err(e) => {
                eprintln!("error: {}", e);
                return 1;
            }
        },
        None => profile::languages().collect(),
    };

    let registry = Registry::builtin();
    print!("{:<22}", "program");
    for language in &languages {
        print!(" {:<8}", language);
    }
    println!();

    for case in &registry {
        print!("{:<22}", case.program_id);
        for language in &languages {
            let cell = match case.mode_for(language) {
                CaseMode::Run => "run",
                CaseMode::Skip => "skip",
                CaseMode::TolerateNyi => "nyi-ok",
            };
            print!(" {:<8}", cell);
        }
        println!();
    }
    0
}

/// Parse and bind every registered source fixture without generating code
fn check(root: Option<PathBuf>) -> i32 {
    let config = match std::env::current_dir()
        .map_err(|e| e.to_string())
        .and_then(|dir| HarnessConfig::load_or_default(&dir).map_err(|e| e.to_string()))
    {
        Ok(config) => match root {
            Some(root) => config.with_fixture_root(root),
            None => config,
        },
        Err(e) => {
            eprintln!("error: {}", e);
            return 1;
        }
    };

    let host = match PackageCache::load(&config.fixture_root) {
        Ok(host) => host,
        Err(e) => {
            eprintln!("error: {}", e);
            return 1;
        }
    };
    let fixtures = FixtureStore::from_config(&config);

    let mut failed = 0;
    for case in &Registry::builtin() {
        let checked = fixtures
            .load_source(&case.program_id)
            .map_err(|e| e.to_string())
            .and_then(|source| {
                pipeline::bind_source(&source, &case.program_id, &host).map_err(|e| e.to_string())
            });

        match checked {
            Ok((program, warnings)) => {
                for warning in &warnings {
                    eprintln!("{}: {}", case.program_id, warning);
                }
                println!("ok       {} ({} nodes)", case.program_id, program.nodes.len());
            }
            Err(e) => {
                eprintln!("error: {}", e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        eprintln!("{} fixture(s) failed to check", failed);
        1
    } else {
        0
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <command> [args]", program);
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  list [language]       Print which cases run for each language");
    eprintln!("  check [fixture-root]  Parse and bind every registered source fixture");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -h, --help       Print this help message");
    eprintln!("  -v, --version    Print version information");
}
