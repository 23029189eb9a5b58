// src/actions/scaffold.rs

use crate::core::context::ActionContext;
use crate::core::request::{
    Field, MultiSelectOptions, SelectOptions, Step, TextOptions,
};
use crate::models::{Action, ActionSource, Description};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
struct Answers {
    name: String,
    template: String,
    features: Vec<String>,
    author: String,
}

pub fn action() -> Action {
    let action = Action::new("scaffold", "Plans a new plugin skeleton", run)
        .with_category("demo")
        .with_tags(["example", "forms"])
        .with_source(ActionSource::Embedded {
            path: "src/actions/scaffold.rs",
            text: include_str!("scaffold.rs"),
        });
    Action {
        description: Description::Translated(|t| t.t("actions.scaffold.description", &[])),
        ..action
    }
}

fn run(ctx: &ActionContext) -> anyhow::Result<()> {
    let answers: Answers = ctx.prompt.step_form(
        "New plugin",
        vec![
            Step::new(vec![
                Field::text(
                    "name",
                    "Plugin name:",
                    TextOptions::default()
                        .pattern("^[a-z][a-z0-9-]*$")
                        .arg("name")
                        .arg_short("n")
                        .description("Plugin name (kebab-case)"),
                ),
                Field::select(
                    "template",
                    "Template",
                    ["basic", "full"],
                    SelectOptions::default().default_value("basic").arg("template"),
                ),
            ])
            .title("Basics"),
            Step::new(vec![
                Field::multi_select(
                    "features",
                    "Features",
                    ["commands", "config", "tests"],
                    MultiSelectOptions::default().arg("features").arg_short("f"),
                ),
                Field::text("author", "Author", TextOptions::default().default_value("anonymous")),
            ])
            .title("Extras")
            .validate(|values| {
                let full = values.get("template").and_then(|v| v.as_str()) == Some("full");
                let picked = values
                    .get("features")
                    .and_then(|v| v.as_array())
                    .map_or(0, Vec::len);
                if full && picked == 0 {
                    Err(String::from("the full template needs at least one feature"))
                } else {
                    Ok(())
                }
            }),
        ],
    )?;

    ctx.output.header(format!("Plugin '{}'", answers.name));
    ctx.output.key_value([
        ("template", answers.template.as_str()),
        ("author", answers.author.as_str()),
    ]);

    let mut files = vec![
        format!("{}/Cargo.toml", answers.name),
        format!("{}/src/lib.rs", answers.name),
    ];
    files.extend(
        answers
            .features
            .iter()
            .map(|feature| format!("{}/src/{}.rs", answers.name, feature)),
    );

    let progress = ctx.control.progress(files.len() as f64);
    progress.start(Some("Planning files"));
    for file in &files {
        ctx.output.log(file.clone());
        progress.increment(1.0);
    }
    progress.succeed(Some("Plan ready"));
    ctx.output.list(files);
    Ok(())
}
