use hydrate_core::Value;

use crate::cli::{OutputArgs, StateArgs, TemplateArgs};
use crate::util;

pub struct RunArgs {
    pub template: TemplateArgs,
    pub state: StateArgs,
    pub output: OutputArgs,
    pub policy: Option<std::path::PathBuf>,
}

pub fn run(args: RunArgs) {
    let template = util::load_template(&args.template);
    let mut state = util::load_state(&args.state);
    let policy = util::load_policy(args.policy.as_deref());

    let result = hydrate_engine::hydrate(&template, &mut state, &policy);

    let rendered = to_json_string(&result.value, args.output.pretty);
    println!("{rendered}");

    if let Some(error) = result.error {
        let colorize = args.output.color.should_colorize();
        print_diagnostic(&error, colorize);
        std::process::exit(1);
    }
}

fn to_json_string(value: &Value, pretty: bool) -> String {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .unwrap_or_else(|e| {
        eprintln!("error: failed to serialize hydrated output: {e}");
        std::process::exit(1);
    })
}

fn print_diagnostic(error: &hydrate_core::HydrateError, colorize: bool) {
    if colorize {
        eprintln!("\x1b[33mwarning:\x1b[0m {error}");
    } else {
        eprintln!("warning: {error}");
    }
}
