// metrology/src/commands/triage.rs
//
// USE CASE: Move a violation through its lifecycle.

use chrono::Utc;
use std::path::PathBuf;

use metrology_core::application::{assign_violation, dismiss_violation, resolve_violation};

use super::{Workspace, print_json};

pub async fn assign(project_dir: PathBuf, violation_id: String, user: String) -> anyhow::Result<()> {
    let workspace = Workspace::open(&project_dir)?;
    let updated = assign_violation(workspace.store.as_ref(), &violation_id, &user).await?;
    print_json(&updated)
}

pub async fn resolve(
    project_dir: PathBuf,
    violation_id: String,
    notes: Option<String>,
) -> anyhow::Result<()> {
    let workspace = Workspace::open(&project_dir)?;
    let updated =
        resolve_violation(workspace.store.as_ref(), &violation_id, notes, Utc::now()).await?;
    print_json(&updated)
}

pub async fn dismiss(
    project_dir: PathBuf,
    violation_id: String,
    notes: Option<String>,
) -> anyhow::Result<()> {
    let workspace = Workspace::open(&project_dir)?;
    let updated = dismiss_violation(workspace.store.as_ref(), &violation_id, notes).await?;
    print_json(&updated)
}
