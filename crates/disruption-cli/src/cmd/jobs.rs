use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use disruption_core::{known_jobs::KnownJobs, paths};
use std::path::Path;

#[derive(Subcommand)]
pub enum JobsSubcommand {
    /// List the known job names
    List,

    /// Add job names to the known list (creates it when missing)
    Add {
        #[arg(required = true)]
        names: Vec<String>,
    },
}

pub fn run(workdir: &Path, subcmd: JobsSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        JobsSubcommand::List => list(workdir, json),
        JobsSubcommand::Add { names } => add(workdir, names, json),
    }
}

fn list(workdir: &Path, json: bool) -> anyhow::Result<()> {
    let known = KnownJobs::load(workdir).context("failed to read known job list")?;

    if json {
        return print_json(&known);
    }

    match known {
        None => println!("No known job list. Add jobs with: disruptions jobs add <name>..."),
        Some(k) if k.jobs.is_empty() => println!("Known job list is empty."),
        Some(k) => {
            for job in &k.jobs {
                println!("{job}");
            }
        }
    }
    Ok(())
}

fn add(workdir: &Path, names: Vec<String>, json: bool) -> anyhow::Result<()> {
    for name in &names {
        paths::validate_job_name(name)?;
    }

    let mut known = KnownJobs::load(workdir)
        .context("failed to read known job list")?
        .unwrap_or_else(|| KnownJobs::new(Vec::new()));
    let added = known.add(names);
    known.save(workdir).context("failed to write known job list")?;

    if json {
        print_json(&serde_json::json!({ "added": added, "total": known.jobs.len() }))?;
    } else {
        println!("Added {added} job(s); {} known.", known.jobs.len());
    }
    Ok(())
}
