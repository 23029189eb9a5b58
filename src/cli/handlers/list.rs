// src/cli/handlers/list.rs

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use serde::Serialize;

use crate::{
    cli::{catalog::Catalog, handlers::commons},
    core::translator::Translator,
};

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Lists the available actions.")]
struct ListArgs {
    /// Print the list as JSON.
    #[arg(long)]
    json: bool,

    /// Only show actions carrying this tag.
    #[arg(long, short)]
    tag: Option<String>,
}

#[derive(Serialize, Debug)]
struct ActionSummary<'a> {
    name: &'a str,
    description: String,
    category: Option<&'a str>,
    tags: &'a [String],
}

pub fn handle(args: Vec<String>, catalog: &Catalog) -> Result<i32> {
    let Some(list_args) = commons::parse_handler_args::<ListArgs>(&args)? else {
        return Ok(0);
    };
    let translator = Translator::new();
    let matches_tag = |tags: &[String]| {
        list_args
            .tag
            .as_ref()
            .is_none_or(|wanted| tags.iter().any(|tag| tag == wanted))
    };

    if list_args.json {
        let summaries: Vec<ActionSummary<'_>> = catalog
            .actions()
            .iter()
            .filter(|action| matches_tag(&action.tags))
            .map(|action| ActionSummary {
                name: &action.name,
                description: action.describe(&translator),
                category: action.category.as_deref(),
                tags: &action.tags,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(0);
    }

    let width = catalog
        .actions()
        .iter()
        .map(|a| a.name.chars().count())
        .max()
        .unwrap_or(0);

    println!("\n{}", t!("list.header").bold());
    for (category, actions) in catalog.by_category() {
        let visible: Vec<_> = actions.into_iter().filter(|a| matches_tag(&a.tags)).collect();
        if visible.is_empty() {
            continue;
        }
        let title = if category.is_empty() { t!("list.uncategorized") } else { category };
        println!("\n  {}", title.yellow());
        for action in visible {
            let padded = format!("{:<width$}", action.name, width = width);
            let tags = if action.tags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", action.tags.join(", "))
            };
            println!(
                "    {}  {}{}",
                padded.cyan(),
                action.describe(&translator),
                tags.dimmed()
            );
        }
    }
    println!();
    Ok(0)
}
