use clap::Parser;

pub mod catalog;
pub mod dispatcher;
pub mod handlers;

/// Builds the color-aware help string at runtime.
fn build_help_string() -> &'static str {
    // A mini-renderer for the semantic help template: tags like `<title>`
    // become ANSI styles, or nothing when colors are off.
    let use_colors = colored::control::SHOULD_COLORIZE.should_colorize();

    let template = t!("cli.help.template");

    let title = if use_colors { "\x1b[1;33m" } else { "" }; // Bold Yellow
    let hl = if use_colors { "\x1b[1;36m" } else { "" }; // Bold Cyan
    let cmd = if use_colors { "\x1b[36m" } else { "" }; // Cyan
    let dim = if use_colors { "\x1b[2m" } else { "" };
    let reset = if use_colors { "\x1b[0m" } else { "" };

    let formatted_string = template
        .replace("<title>", title)
        .replace("</title>", reset)
        .replace("<hl>", hl)
        .replace("</hl>", reset)
        .replace("<cmd>", cmd)
        .replace("</cmd>", reset)
        .replace("<dim>", dim)
        .replace("</dim>", reset);

    Box::leak(formatted_string.into_boxed_str())
}

/// actionkit: run one authored action from a terminal or a CI job.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    help_template = { build_help_string() },
)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Everything after the binary name. Routing happens in the dispatcher,
    /// so action flags pass through untouched.
    #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
    pub args: Vec<String>,
}
