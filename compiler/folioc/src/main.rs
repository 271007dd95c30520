//! Folio CLI
//!
//! Compiles Folio documents to realized content.

use folioc::commands::{check_file, compile_file, inspect_file, CliOptions, OutputFormat};

fn main() {
    folioc::init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = args[1].as_str();
    match command {
        "compile" | "check" | "inspect" => {
            let mut options = CliOptions::default();
            let mut format = OutputFormat::Tree;
            let mut positional = Vec::new();
            for arg in &args[2..] {
                match options.apply(arg) {
                    Ok(true) => {}
                    Ok(false) if arg == "--plain" => format = OutputFormat::Plain,
                    Ok(false) if !arg.starts_with('-') => positional.push(arg.as_str()),
                    Ok(false) => {
                        eprintln!("error: unknown option '{arg}'");
                        std::process::exit(1);
                    }
                    Err(message) => {
                        eprintln!("error: {message}");
                        std::process::exit(1);
                    }
                }
            }

            match (command, positional.as_slice()) {
                ("compile", [path]) => compile_file(path, &options, format),
                ("check", [path]) => check_file(path, &options),
                ("inspect", [path, position]) => inspect_file(path, position, &options),
                ("inspect", _) => {
                    eprintln!("Usage: folio inspect <file.fol> <line>:<column> [options]");
                    std::process::exit(1);
                }
                _ => {
                    eprintln!("Usage: folio {command} <file.fol> [options]");
                    std::process::exit(1);
                }
            }
        }
        "help" | "--help" | "-h" => print_usage(),
        "version" | "--version" | "-V" => {
            println!("Folio {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            if std::path::Path::new(command)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("fol"))
            {
                compile_file(command, &CliOptions::default(), OutputFormat::Tree);
            } else {
                eprintln!("Unknown command: {command}");
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        }
    }
}

fn print_usage() {
    println!("Folio typesetting language");
    println!();
    println!("Usage: folio <command> [options]");
    println!();
    println!("Commands:");
    println!("  compile <file.fol>             Evaluate and realize a document, print its content");
    println!("  check <file.fol>               Report diagnostics only");
    println!("  inspect <file.fol> <line:col>  Show the values of the expression at a position");
    println!("  help                           Show this help message");
    println!("  version                        Show version information");
    println!();
    println!("Options:");
    println!("  --plain                   Print plain text instead of the element tree");
    println!("  --deny-warnings           Treat warnings as errors");
    println!("  --color=<mode>            Diagnostics coloring: auto, always, never");
    println!("  --root=<dir>              Project root (default: the file's directory)");
    println!("  --package-path=<dir>      Local package store (default: $FOLIO_PACKAGE_PATH)");
    println!("  --max-iterations=<n>      Loop iteration limit (default: 10000)");
    println!("  --max-show-depth=<n>      Nested show-rule limit (default: 64)");
    println!("  --max-call-depth=<n>      Nested function call limit (default: 256)");
    println!();
    println!("Logging:");
    println!("  FOLIO_LOG=folio_eval=debug folio compile main.fol");
}
