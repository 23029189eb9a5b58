// src/actions/greet.rs

use crate::core::context::ActionContext;
use crate::core::request::{ConfirmOptions, TextOptions};
use crate::models::{Action, ActionSource};

pub fn action() -> Action {
    Action::new("greet", "Greets someone by name", run)
        .with_category("demo")
        .with_tags(["example"])
        .with_namespace("actions.greet")
        .with_source(ActionSource::Embedded {
            path: "src/actions/greet.rs",
            text: include_str!("greet.rs"),
        })
}

fn run(ctx: &ActionContext) -> anyhow::Result<()> {
    let name = ctx.prompt.text(
        "Who should be greeted?",
        TextOptions::default()
            .default_value("World")
            .arg("name")
            .arg_short("n")
            .description("Name to greet"),
    )?;
    let shout = ctx.prompt.confirm(
        "Shout it?",
        ConfirmOptions::default()
            .default_value(false)
            .arg("shout")
            .arg_short("s"),
    )?;

    let greeting = ctx.tr("message", &[("name", name.as_str())]);
    if shout {
        ctx.output.success(greeting.to_uppercase());
    } else {
        ctx.output.success(greeting);
    }
    Ok(())
}
