use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use gitgrove::cli::{CliArgs, Command};
use gitgrove::config::Config;
use gitgrove::{DirNode, Grove, RepoKind, RepoRecord};

fn main() -> Result<()> {
    // Initialize tracing with env filter
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = CliArgs::parse();
    let config = Config::from_cli_and_file(&args, args.config.clone())
        .context("Failed to load configuration")?;
    info!(roots = config.roots.len(), "configuration loaded");

    let grove = Grove::new(&config);

    match &args.command {
        Command::List => list(&grove)?,
        Command::Tree { filter } => tree(&grove, filter)?,
        Command::Show { key } => show(&grove, key)?,
        Command::Init { path, bare } => {
            let repo = grove.create(path, *bare)?;
            println!(
                "Initialized {} repository at {}",
                if *bare { "bare" } else { "non-bare" },
                repo.path().display()
            );
        }
    }

    Ok(())
}

fn list(grove: &Grove) -> Result<()> {
    let index = grove.repositories()?;
    info!(count = index.len(), "flat scan finished");
    for (key, record) in &index {
        print_record(key, record, 0);
    }
    Ok(())
}

fn tree(grove: &Grove, filter: &str) -> Result<()> {
    for (name, node) in &grove.repository_tree(filter)? {
        print_node(name, node, 0);
    }
    Ok(())
}

fn show(grove: &Grove, key: &str) -> Result<()> {
    let repo = grove.repository_from_key(key)?;
    println!("path:   {}", repo.path().display());
    println!("bare:   {}", repo.is_bare());
    println!("branch: {}", repo.head_branch());
    Ok(())
}

fn print_record(key: &str, record: &RepoRecord, indent: usize) {
    let marker = match record.kind {
        RepoKind::Bare => "bare",
        RepoKind::WorkTree => "work",
    };
    match record.description.as_deref().map(str::trim) {
        Some(description) if !description.is_empty() => {
            println!("{:indent$}{key}  [{marker}]  {description}", "");
        }
        _ => println!("{:indent$}{key}  [{marker}]", ""),
    }
}

fn print_node(name: &str, node: &DirNode, indent: usize) {
    println!("{:indent$}{name}/", "");
    for (key, record) in &node.repositories {
        print_record(key, record, indent + 2);
    }
    for (sub_name, sub) in &node.subdirs {
        print_node(sub_name, sub, indent + 2);
    }
}
