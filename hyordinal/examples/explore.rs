use std::io::Write;

use clap::Parser;
use hyordinal::maximize::maximize_with;
use hyordinal::prelude::*;
use termcolor::{ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Parse an ordinal expression, print its canonical form and explore it:
/// fundamental sequence terms for limits, neighbours for successors.
#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// File to read the expression from
    #[arg(short, long)]
    pub file: Option<String>,

    /// Whether to read stdin (if set, file is ignored)
    #[arg(short, long, default_value_t = false)]
    pub stdin: bool,

    /// Expression given on the command line (overrides file and stdin)
    #[arg(short, long)]
    pub code: Option<String>,

    /// Number of fundamental sequence terms to print
    #[arg(short, long, default_value_t = 4)]
    pub terms: u64,

    /// Maximize the expression below this bound
    #[arg(short, long)]
    pub bound: Option<String>,

    /// Index base used for maximization
    #[arg(short = 'n', long, default_value_t = 3)]
    pub base: u64,

    /// TOML file with engine limits
    #[arg(long)]
    pub config: Option<String>,
}

fn header(stdout: &mut impl WriteColor, color: &ColorSpec, text: &str) {
    stdout.set_color(color).unwrap();
    writeln!(stdout, "{text}").unwrap();
    stdout.reset().unwrap();
}

fn main() {
    let args = Args::parse();

    let src = if let Some(code) = args.code {
        code
    } else if args.stdin {
        use std::io::Read;
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .expect("Failed to read from stdin");
        buffer
    } else if let Some(file) = args.file {
        std::fs::read_to_string(file).expect("Failed to read file")
    } else {
        eprintln!("No input provided. Use --code <EXPR>, --file <FILE> or --stdin.");
        std::process::exit(1);
    };

    let config = match args.config {
        Some(path) => {
            let source = std::fs::read_to_string(path).expect("Failed to read config file");
            EngineConfig::from_toml_str(&source).expect("Invalid engine configuration")
        }
        None => EngineConfig::default(),
    };

    let mut error_color = ColorSpec::new();
    error_color.set_fg(Some(termcolor::Color::Red));
    error_color.set_intense(true);

    let mut ok_color = ColorSpec::new();
    ok_color.set_fg(Some(termcolor::Color::Green));
    ok_color.set_intense(true);

    let stdout = StandardStream::stdout(ColorChoice::Auto);
    let mut stdout = stdout.lock();

    let expr = match parse(src.trim()) {
        Ok(expr) => expr,
        Err(errors) => {
            header(&mut stdout, &error_color, "Some errors were found during parsing:");
            for err in errors {
                writeln!(stdout, "  - {err}").unwrap();
            }
            std::process::exit(1);
        }
    };

    let canonical = match evaluate(&expr) {
        Ok(canonical) => canonical,
        Err(err) => {
            header(&mut stdout, &error_color, &format!("Evaluation failed: {err}"));
            std::process::exit(1);
        }
    };
    header(&mut stdout, &ok_color, "Canonical form:");
    stdout.flush().unwrap();
    canonical.pretty_print().unwrap();

    if is_limit_ordinal(&canonical) {
        match fundamental_sequence(&canonical) {
            Ok(fs) => {
                header(&mut stdout, &ok_color, "Fundamental sequence:");
                writeln!(stdout, "  template  {} (index {})", fs.template(), fs.index()).unwrap();
                for n in 0..args.terms {
                    match fs.at_with(n, &config) {
                        Ok(term) => writeln!(stdout, "  [{n}]  {term}").unwrap(),
                        Err(err) => {
                            writeln!(stdout, "  [{n}]  {err}").unwrap();
                            break;
                        }
                    }
                }
            }
            Err(err) => header(&mut stdout, &error_color, &err.to_string()),
        }
    } else {
        header(&mut stdout, &ok_color, "Neighbours:");
        writeln!(stdout, "  successor    {}", successor(&canonical)).unwrap();
        match predecessor(&canonical) {
            Some(pred) => writeln!(stdout, "  predecessor  {pred}").unwrap(),
            None => writeln!(stdout, "  predecessor  none").unwrap(),
        }
    }

    if let Some(bound) = args.bound {
        let bound = match parse(bound.trim()).map(|b| evaluate(&b)) {
            Ok(Ok(bound)) => bound,
            Ok(Err(err)) => {
                header(&mut stdout, &error_color, &format!("Invalid bound: {err}"));
                std::process::exit(1);
            }
            Err(errors) => {
                header(&mut stdout, &error_color, "Invalid bound:");
                for err in errors {
                    writeln!(stdout, "  - {err}").unwrap();
                }
                std::process::exit(1);
            }
        };
        match maximize_with(&canonical, &bound, args.base, &config) {
            Ok(max) => {
                header(
                    &mut stdout,
                    &ok_color,
                    &format!("Maximized below {bound} at base {}:", args.base),
                );
                writeln!(stdout, "  {max}").unwrap();
            }
            Err(err) => header(&mut stdout, &error_color, &format!("Maximization failed: {err}")),
        }
    }
    stdout.flush().unwrap();
}
