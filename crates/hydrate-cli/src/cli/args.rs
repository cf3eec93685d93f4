//! Command-line surface: two subcommands over the same input shape — a
//! template file/text and a state file/text, plus an optional policy file.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn should_colorize(self) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => std::io::IsTerminal::is_terminal(&std::io::stderr()),
        }
    }
}

#[derive(Parser)]
#[command(name = "hydrate", bin_name = "hydrate")]
#[command(about = "Data-driven template hydration engine")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Hydrate a template against a state mapping and print the result
    #[command(after_help = r#"EXAMPLES:
  hydrate run --template tpl.json --state state.json
  hydrate run --template-text '{"greeting":"{{name}}"}' --state-file state.json --pretty
  hydrate run -t tpl.json -s state.json --policy policy.json"#)]
    Run {
        #[command(flatten)]
        template: TemplateArgs,

        #[command(flatten)]
        state: StateArgs,

        #[command(flatten)]
        output: OutputArgs,

        /// Hydration-behavior policy file (JSON; "raw" leaves marked subtrees
        /// untouched)
        #[arg(long, value_name = "FILE")]
        policy: Option<PathBuf>,
    },

    /// List every placeholder's root identifier referenced by a template
    #[command(after_help = r#"EXAMPLES:
  hydrate keys --template tpl.json
  hydrate keys -t tpl.json --include-optional"#)]
    Keys {
        #[command(flatten)]
        template: TemplateArgs,

        /// Include identifiers referenced only by optional (`?`) placeholders
        #[arg(long)]
        include_optional: bool,

        /// Hydration-behavior policy file (JSON)
        #[arg(long, value_name = "FILE")]
        policy: Option<PathBuf>,
    },
}

#[derive(Args)]
#[group(id = "template_input", required = true, multiple = false)]
pub struct TemplateArgs {
    /// Template as inline JSON text
    #[arg(long = "template-text", value_name = "JSON")]
    pub template_text: Option<String>,

    /// Template from a JSON file (use "-" for stdin)
    #[arg(short = 't', long = "template", value_name = "FILE")]
    pub template_file: Option<PathBuf>,
}

#[derive(Args)]
#[group(id = "state_input", required = true, multiple = false)]
pub struct StateArgs {
    /// State as inline JSON text
    #[arg(long = "state-text", value_name = "JSON")]
    pub state_text: Option<String>,

    /// State from a JSON file (use "-" for stdin)
    #[arg(short = 's', long = "state-file", value_name = "FILE")]
    pub state_file: Option<PathBuf>,
}

#[derive(Args)]
pub struct OutputArgs {
    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Colorize diagnostics (auto-detected by default)
    #[arg(long, default_value = "auto", value_name = "WHEN")]
    pub color: ColorChoice,
}
