use clap::{ArgAction, ArgGroup, Parser};

#[derive(Parser, Debug, Clone)]
#[command(name = "codepad", about = "Run JavaScript and capture its console output", version)]
#[command(group(ArgGroup::new("mode").args(["file", "eval", "repl", "html"]).multiple(false)))]
pub struct Cli {
    /// JavaScript file to run. Reads stdin when omitted and stdin is piped.
    #[arg(value_name = "FILE")]
    pub file: Option<String>,

    /// Run the given code instead of a file.
    #[arg(short = 'e', long)]
    pub eval: Option<String>,

    /// Start an interactive session.
    ///
    /// Each entry is a separate run; globals persist until `.reset`.
    #[arg(long)]
    pub repl: bool,

    /// Compose an HTML preview document from this markup file.
    #[arg(long, value_name = "FILE")]
    pub html: Option<String>,

    /// Stylesheet embedded in the preview document.
    #[arg(long, value_name = "FILE", requires = "html")]
    pub css: Option<String>,

    /// Where to write the preview document (default: a new file in CODEPAD_PREVIEW_DIR).
    #[arg(short = 'o', long, value_name = "FILE", requires = "html")]
    pub out: Option<String>,

    /// Per-run timeout in seconds; 0 disables it. No timeout by default.
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(f64))]
    pub timeout: Option<f64>,

    /// Interpreter program (name on PATH or path).
    #[arg(long, value_name = "PROGRAM")]
    pub node: Option<String>,

    /// Print the execution result as JSON (not available in the REPL).
    #[arg(long, conflicts_with = "repl")]
    pub json: bool,

    /// Disable colored output.
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
