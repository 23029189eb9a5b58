// src/actions/deploy.rs

use crate::core::context::ActionContext;
use crate::core::request::{ConfirmOptions, NumberOptions, SelectOptions};
use crate::models::{Action, ActionSource};
use anyhow::Context;
use serde::Deserialize;

/// `[plugins.deployer]` in the config file.
#[derive(Deserialize, Debug, Default)]
struct DeployerSettings {
    #[serde(default)]
    region: Option<String>,
    /// Command run before anything else; a failure aborts the deploy.
    #[serde(default)]
    check_command: Option<String>,
}

pub fn action() -> Action {
    Action::new("deploy", "Deploys the app to an environment", run)
        .with_category("ops")
        .with_tags(["example", "shell"])
        .with_plugin("deployer")
        .with_source(ActionSource::Embedded {
            path: "src/actions/deploy.rs",
            text: include_str!("deploy.rs"),
        })
}

fn run(ctx: &ActionContext) -> anyhow::Result<()> {
    let settings = match ctx.plugin_config_as::<DeployerSettings>() {
        Some(parsed) => parsed.context("Invalid [plugins.deployer] settings")?,
        None => DeployerSettings::default(),
    };

    let env: String = ctx.prompt.select(
        "Environment",
        ["staging", "production"],
        SelectOptions::default().arg("env").arg_short("e"),
    )?;
    let replicas = ctx.prompt.number(
        "Replicas",
        NumberOptions::default()
            .default_value(1.0)
            .min(1.0)
            .max(20.0)
            .arg("replicas")
            .arg_short("r")
            .description("How many instances to start"),
    )?;
    if env == "production" {
        let sure = ctx.prompt.confirm(
            "Deploy to production?",
            ConfirmOptions::default().arg("yes").arg_short("y"),
        )?;
        if !sure {
            ctx.output.warn("Deploy cancelled.");
            return Ok(());
        }
    }

    let spinner = ctx.control.spinner();
    if let Some(command) = &settings.check_command {
        spinner.start(Some("Running pre-deploy check"));
        match ctx.shell.run_checked(command) {
            Ok(output) => ctx.output.code(output.stdout.trim_end(), Some("text")),
            Err(e) => {
                spinner.fail(Some("Pre-deploy check failed"));
                return Err(e).context("Pre-deploy check failed");
            }
        }
    }

    spinner.start(Some(format!("Deploying to {}", env).as_str()));
    let region = settings
        .region
        .or_else(|| ctx.config_value("region").and_then(|v| v.as_str()).map(str::to_string))
        .unwrap_or_else(|| String::from("default"));
    ctx.output.key_value([
        ("environment", env.clone()),
        ("replicas", replicas.to_string()),
        ("region", region),
    ]);
    spinner.succeed(Some(format!("Deployed to {}", env).as_str()));
    Ok(())
}
