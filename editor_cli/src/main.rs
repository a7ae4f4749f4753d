//! Tint - prints a source file with incremental-engine highlighting.
//!
//! Usage: tint [--light] [--plain] FILE

use std::env;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;
use tint_core::syntax::{to_rgb8, HighlightStateRegistry, SyntaxHighlighter, Theme};
use tint_core::{Editor, EditorError, TextBuffer, TokenStyle};

const USAGE: &str = "usage: tint [--light] [--plain] FILE";

/// Command line options.
#[derive(Debug, Default)]
struct Options {
    /// Use the light theme instead of the dark one.
    light: bool,
    /// List style runs instead of printing colored text.
    plain: bool,
    path: PathBuf,
}

impl Options {
    fn parse(args: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut options = Options::default();
        let mut path = None;
        for arg in args {
            match arg.as_str() {
                "--light" => options.light = true,
                "--plain" => options.plain = true,
                flag if flag.starts_with("--") => return Err(format!("unknown option {}", flag)),
                _ if path.is_some() => return Err("only one FILE may be given".to_string()),
                _ => path = Some(PathBuf::from(arg)),
            }
        }
        options.path = path.ok_or_else(|| "missing FILE".to_string())?;
        Ok(options)
    }
}

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting tint");

    let options = match Options::parse(env::args().skip(1)) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}\n{}", message, USAGE);
            process::exit(2);
        }
    };

    if let Err(e) = run(&options) {
        log::error!("Failed to highlight '{}': {}", options.path.display(), e);
        process::exit(1);
    }

    log::info!("tint exited");
}

fn run(options: &Options) -> Result<(), EditorError> {
    let mut highlighter = SyntaxHighlighter::new();
    let mut registry = HighlightStateRegistry::new();
    let mut editor = Editor::new();

    log::info!("Opening file: {}", options.path.display());
    editor.open_file(&options.path)?;
    editor.run_pending(&mut highlighter, &mut registry)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if options.plain {
        write_runs(&mut out, editor.buffer())?;
    } else {
        let theme = if options.light {
            Theme::light()
        } else {
            Theme::dark()
        };
        write_colored(&mut out, editor.buffer(), &theme)?;
    }
    out.flush()?;

    editor.close(&mut registry);
    Ok(())
}

/// Writes the text with 24-bit ANSI foreground colors.
fn write_colored(out: &mut impl Write, buffer: &TextBuffer, theme: &Theme) -> io::Result<()> {
    for (range, style) in buffer.style_runs() {
        let [r, g, b] = to_rgb8(theme.color(style));
        let text = buffer.rope().slice(range).to_string();
        write!(out, "\x1b[38;2;{};{};{}m{}", r, g, b, text)?;
    }
    write!(out, "\x1b[0m")
}

/// Writes one line per styled run: `start..end Style "text"`.
fn write_runs(out: &mut impl Write, buffer: &TextBuffer) -> io::Result<()> {
    for (range, style) in buffer.style_runs() {
        if style == TokenStyle::Default {
            continue;
        }
        let text = buffer.rope().slice(range.clone()).to_string();
        writeln!(out, "{}..{} {:?} {:?}", range.start, range.end, style, text)?;
    }
    Ok(())
}
