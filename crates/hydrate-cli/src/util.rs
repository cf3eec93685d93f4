use std::fs;
use std::io::{self, Read};
use std::path::Path;

use hydrate_core::Value;

use crate::cli::{StateArgs, TemplateArgs};

pub fn load_template(args: &TemplateArgs) -> Value {
    let text = if let Some(text) = &args.template_text {
        text.clone()
    } else if let Some(path) = &args.template_file {
        read_text_or_stdin(path, "template file")
    } else {
        unreachable!("clap requires one of template-text/template-file")
    };
    parse_json(&text, "template")
}

pub fn load_state(args: &StateArgs) -> Value {
    let text = if let Some(text) = &args.state_text {
        text.clone()
    } else if let Some(path) = &args.state_file {
        read_text_or_stdin(path, "state file")
    } else {
        unreachable!("clap requires one of state-text/state-file")
    };
    parse_json(&text, "state")
}

pub fn load_policy(path: Option<&Path>) -> hydrate_core::Policy {
    match path {
        Some(path) => {
            let text = read_text_or_stdin(path, "policy file");
            hydrate_core::Policy::from_value(&parse_json(&text, "policy"))
        }
        None => hydrate_core::Policy::default(),
    }
}

fn read_text_or_stdin(path: &Path, what: &str) -> String {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).unwrap_or_else(|e| {
            eprintln!("error: failed to read {what} from stdin: {e}");
            std::process::exit(1);
        });
        return buf;
    }
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("error: failed to read {what} '{}': {e}", path.display());
        std::process::exit(1);
    })
}

fn parse_json(text: &str, what: &str) -> Value {
    let json: serde_json::Value = serde_json::from_str(text).unwrap_or_else(|e| {
        eprintln!("error: failed to parse {what} as JSON: {e}");
        std::process::exit(1);
    });
    Value::from(json)
}
