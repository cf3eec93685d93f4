mod args;

pub use args::{Cli, Command, ColorChoice, OutputArgs, StateArgs, TemplateArgs};
