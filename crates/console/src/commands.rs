//! Command implementations shared across entity screens.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;

use tetres_client::EntityClient;
use tetres_core::EntityInfo;

use crate::cli::EntityCommand;

/// Read and decode a JSON record file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("cannot parse {}", path.display()))
}

/// Run one generic entity subcommand against its client.
pub async fn run_entity<T>(
    client: Arc<EntityClient<T>>,
    command: EntityCommand,
) -> anyhow::Result<()>
where
    T: EntityInfo + Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    match command {
        EntityCommand::List { year } => {
            match year {
                Some(year) => client.refresh_by_year(Some(year)).await?,
                None => client.refresh().await?,
            };
            let items = client.cached().await;
            println!("{} {} record(s)", items.len(), T::ENTITY);
            for item in &items {
                println!("{:>8}  {}", format_id(item.id()), item.sort_key());
            }
        }
        EntityCommand::Show { id } => {
            let item = client.get(id).await?;
            println!("{}", serde_json::to_string_pretty(&item)?);
        }
        EntityCommand::Add { file } => {
            let item: T = read_json(&file)?;
            item.check()?;
            let id = client.insert(&item).await?;
            println!("inserted {} #{id}", T::ENTITY);
        }
        EntityCommand::Update { id, file } => {
            let item: T = read_json(&file)?;
            item.check()?;
            client.update(id, &item).await?;
            println!("updated {} #{id}", T::ENTITY);
        }
        EntityCommand::Delete { ids } => {
            let deleted = client.delete(&ids).await?;
            println!("deleted {} {} record(s): {:?}", deleted.len(), T::ENTITY, deleted);
        }
        EntityCommand::Years => {
            let years = client.years().await?;
            println!(
                "{}",
                years
                    .iter()
                    .map(|y| y.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }
    Ok(())
}

fn format_id(id: Option<i64>) -> String {
    match id {
        Some(id) => id.to_string(),
        None => "-".to_string(),
    }
}
