use crate::cli::TemplateArgs;
use crate::util;

pub struct KeysArgs {
    pub template: TemplateArgs,
    pub include_optional: bool,
    pub policy: Option<std::path::PathBuf>,
}

pub fn run(args: KeysArgs) {
    let template = util::load_template(&args.template);
    let policy = util::load_policy(args.policy.as_deref());

    let keys = hydrate_engine::find_template_keys(&template, args.include_optional, &policy);
    for key in keys {
        println!("{key}");
    }
}
