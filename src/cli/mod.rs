//! NB-023: CLI subcommands — validate, map, reverse, plan.

use crate::core::message::ExecutionMessage;
use crate::core::{mapper, merge, parser, planner, validator};
use crate::error::{Error, Result};
use clap::Subcommand;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a definition without mapping it
    Validate {
        /// Payload or bare definition (YAML or JSON)
        file: PathBuf,

        /// Report every violation instead of stopping at the first
        #[arg(long)]
        all: bool,
    },

    /// Map a definition into an execution message
    Map {
        /// Payload or bare definition (YAML or JSON)
        file: PathBuf,

        /// Previously applied execution message to merge provider data from
        #[arg(short, long)]
        previous: Option<PathBuf>,

        /// Write the message here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Rebuild a payload from an execution message
    Reverse {
        /// Execution message (JSON)
        message: PathBuf,

        /// Write the payload here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show what an orchestrator would create, update or delete
    Plan {
        /// Payload or bare definition (YAML or JSON)
        file: PathBuf,

        /// Previously applied execution message
        #[arg(short, long)]
        previous: Option<PathBuf>,
    },
}

/// Dispatch a CLI command.
pub fn dispatch(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Validate { file, all } => cmd_validate(&file, all),
        Commands::Map {
            file,
            previous,
            output,
        } => cmd_map(&file, previous.as_deref(), output.as_deref()),
        Commands::Reverse { message, output } => cmd_reverse(&message, output.as_deref()),
        Commands::Plan { file, previous } => cmd_plan(&file, previous.as_deref()),
    }
}

fn cmd_validate(file: &Path, all: bool) -> Result<()> {
    let payload = parser::parse_payload_file(file)?;
    let def = &payload.service;

    if all {
        let errors = validator::validate_all(def);
        if !errors.is_empty() {
            for e in &errors {
                eprintln!("  ERROR: {}", e);
            }
            return Err(Error::ValidationFailed(errors.len()));
        }
    } else {
        def.validate()?;
    }

    println!(
        "OK: {} ({} networks, {} instances, {} security groups)",
        def.name,
        def.networks.len(),
        def.instances.len(),
        def.security_groups.len()
    );
    Ok(())
}

/// Parse, validate, map, and merge against the previous message if given.
fn build_message(
    file: &Path,
    previous: Option<&Path>,
) -> Result<(ExecutionMessage, Option<ExecutionMessage>)> {
    let payload = parser::parse_payload_file(file)?;
    payload.service.validate()?;

    let mut message = mapper::convert_payload(&payload);
    let previous = previous.map(parser::parse_message_file).transpose()?;
    if let Some(old) = &previous {
        merge::merge_provider_data(&mut message, old);
    }
    Ok((message, previous))
}

fn write_or_print(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content).map_err(|e| Error::io(path, e))?;
            info!(path = %path.display(), "written");
            Ok(())
        }
        None => {
            println!("{}", content);
            Ok(())
        }
    }
}

fn cmd_map(file: &Path, previous: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let (message, _) = build_message(file, previous)?;
    write_or_print(output, &parser::message_to_json(&message)?)
}

fn cmd_reverse(message: &Path, output: Option<&Path>) -> Result<()> {
    let message = parser::parse_message_file(message)?;
    let payload = mapper::convert_message(&message);
    write_or_print(output, &serde_yaml_ng::to_string(&payload)?)
}

fn cmd_plan(file: &Path, previous: Option<&Path>) -> Result<()> {
    let (message, previous) = build_message(file, previous)?;
    let plan = planner::plan(&message, previous.as_ref());
    print_plan(&plan);
    Ok(())
}

fn print_plan(plan: &planner::ExecutionPlan) {
    println!("Planning: {} ({} items)", plan.name, plan.changes.len());
    println!();

    for change in &plan.changes {
        let symbol = match change.action {
            planner::PlanAction::Create => "+",
            planner::PlanAction::Update => "~",
            planner::PlanAction::Delete => "-",
            planner::PlanAction::NoOp => " ",
        };
        println!("  {} {}", symbol, change.description);
    }

    println!();
    println!(
        "Plan: {} to add, {} to change, {} to delete, {} unchanged.",
        plan.to_create, plan.to_update, plan.to_delete, plan.unchanged
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFINITION: &str = r#"
name: svc
datacenter: fakeaws
networks:
  - name: web
    subnet: 10.1.0.0/24
    public: true
instances:
  - name: web
    type: e1.micro
    image: ami-6666f915
    network: web
    start_ip: 10.1.0.11
"#;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_nb023_validate_valid() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(dir.path(), "svc.yaml", DEFINITION);
        assert!(cmd_validate(&file, false).is_ok());
        assert!(cmd_validate(&file, true).is_ok());
    }

    #[test]
    fn test_nb023_validate_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(
            dir.path(),
            "svc.yaml",
            "name: svc\nservice_ip: bogus\ninstances:\n  - name: web\n    network: ghost\n",
        );
        assert!(matches!(
            cmd_validate(&file, false),
            Err(Error::Validation(validator::ValidationError::InvalidServiceIp(_)))
        ));
        assert!(matches!(
            cmd_validate(&file, true),
            Err(Error::ValidationFailed(3))
        ));
    }

    #[test]
    fn test_nb023_validate_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = cmd_validate(&dir.path().join("nope.yaml"), false);
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn test_nb023_map_writes_message() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(dir.path(), "svc.yaml", DEFINITION);
        let out = dir.path().join("message.json");
        cmd_map(&file, None, Some(&out)).unwrap();

        let message = parser::parse_message_file(&out).unwrap();
        assert_eq!(message.networks.items[0].name, "fakeaws-svc-web");
        assert_eq!(message.instances.items[0].name, "fakeaws-svc-web-1");
    }

    #[test]
    fn test_nb023_map_with_previous() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(dir.path(), "svc.yaml", DEFINITION);
        let first = dir.path().join("first.json");
        cmd_map(&file, None, Some(&first)).unwrap();

        let mut applied = parser::parse_message_file(&first).unwrap();
        applied.instances.items[0].instance_aws_id = "i-1".to_string();
        let applied_path = write(
            dir.path(),
            "applied.json",
            &parser::message_to_json(&applied).unwrap(),
        );

        let second = dir.path().join("second.json");
        cmd_map(&file, Some(&applied_path), Some(&second)).unwrap();
        let merged = parser::parse_message_file(&second).unwrap();
        assert_eq!(merged.instances.items[0].instance_aws_id, "i-1");
        assert!(merged.instances.items[0].exists);
    }

    #[test]
    fn test_nb023_map_rejects_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(dir.path(), "svc.yaml", "datacenter: fakeaws\n");
        let out = dir.path().join("message.json");
        assert!(cmd_map(&file, None, Some(&out)).is_err());
        assert!(!out.exists());
    }

    #[test]
    fn test_nb023_reverse() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(dir.path(), "svc.yaml", DEFINITION);
        let message = dir.path().join("message.json");
        cmd_map(&file, None, Some(&message)).unwrap();

        let out = dir.path().join("payload.yaml");
        cmd_reverse(&message, Some(&out)).unwrap();
        let payload = parser::parse_payload_file(&out).unwrap();
        assert_eq!(payload.service.name, "svc");
        assert_eq!(payload.service.instances[0].network, "web");
    }

    #[test]
    fn test_nb023_plan() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(dir.path(), "svc.yaml", DEFINITION);
        let empty = write(
            dir.path(),
            "empty.json",
            &parser::message_to_json(&ExecutionMessage::default()).unwrap(),
        );
        assert!(cmd_plan(&file, None).is_ok());
        assert!(cmd_plan(&file, Some(&empty)).is_ok());
    }
}
