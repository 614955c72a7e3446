use std::io;

use anyhow::{bail, Context, Result};

use crate::api::TimeTracking;
use crate::config::Config;
use crate::select::{self, Picked};
use crate::store::Store;

fn workspace(config: &Config) -> Result<String> {
    config
        .workspace_id
        .clone()
        .context("No workspace configured; pass --workspace-id once to persist it")
}

pub async fn list(api: &impl TimeTracking, config: &Config) -> Result<()> {
    let workspace = workspace(config)?;
    let clients = api.clients(&workspace).await?;
    if clients.is_empty() {
        println!("No clients in this workspace.");
        return Ok(());
    }

    println!("Clients:");
    for client in &clients {
        let marker = if config.client_id.as_deref() == Some(client.id.as_str()) {
            " (current)"
        } else {
            ""
        };
        println!("  {}{}", client.name, marker);
    }
    Ok(())
}

pub async fn select(
    api: &impl TimeTracking,
    store: &Store,
    config: &mut Config,
) -> Result<()> {
    let workspace = workspace(config)?;
    let clients = api.clients(&workspace).await?;
    let names: Vec<String> = clients.iter().map(|c| c.name.clone()).collect();

    let current = config
        .client_id
        .as_deref()
        .and_then(|id| clients.iter().find(|c| c.id == id))
        .map(|c| c.name.clone());

    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout();
    let Some(Picked::Item(index)) = select::select_index(
        &mut stdin,
        &mut stdout,
        &names,
        "Available clients",
        current.as_deref(),
    )?
    else {
        return Ok(());
    };

    apply(store, config, &clients[index].id, &clients[index].name)
}

pub async fn set(
    api: &impl TimeTracking,
    store: &Store,
    config: &mut Config,
    name: &str,
) -> Result<()> {
    let workspace = workspace(config)?;
    let clients = api.clients(&workspace).await?;
    let Some(client) = clients.iter().find(|c| c.name.eq_ignore_ascii_case(name)) else {
        bail!("No client named '{}' in this workspace", name);
    };
    apply(store, config, &client.id, &client.name)
}

pub fn clear(store: &Store, config: &mut Config) -> Result<()> {
    if config.client_id.take().is_none() {
        println!("No client filter set.");
        return Ok(());
    }
    store.save_config(config)?;
    println!("Client filter cleared.");
    Ok(())
}

/// The client is a listing filter, not part of what gets tracked, so
/// changing it never restarts the running entry.
fn apply(store: &Store, config: &mut Config, client_id: &str, client_name: &str) -> Result<()> {
    config.client_id = Some(client_id.to_string());
    store.save_config(config)?;
    println!("Current client set to: {}", client_name);
    Ok(())
}
