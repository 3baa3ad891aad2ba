use cellar_core::{Error, RecordSet, Result, StoredKey};
use cellar_store::{open_file_gateway, serialization, PrimaryStore, StoreConfig};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Print the value stored under a key as JSON
    Read {
        /// Stored key name
        key: String,
    },

    /// Replace the value stored under a key
    Write {
        /// Stored key name
        key: String,

        /// JSON text; `{"__type":"Date","iso":...}` objects become dates
        json: String,
    },

    /// Show which tier holds a key and how full the primary tier is
    Status {
        /// Stored key name
        key: String,
    },

    /// Remove a key from both tiers
    #[command(visible_alias = "rm")]
    Remove {
        /// Stored key name
        key: String,
    },

    /// Check the records of a well-known collection
    Validate {
        /// One of: tasks, logs, tags, presets, cache
        set: String,
    },
}

impl Commands {
    /// Run the command, returning what should be printed on stdout
    pub async fn execute(self, config: &StoreConfig) -> Result<String> {
        let gateway = open_file_gateway(config)?;

        match self {
            Commands::Read { key } => {
                let value = gateway.read(&StoredKey::new(key)?).await?;
                let json = serialization::to_stamped_json(&value)?;
                Ok(serde_json::to_string_pretty(&json)?)
            }
            Commands::Write { key, json } => {
                let key = StoredKey::new(key)?;
                let value = serialization::decode(&json)?;
                gateway.write(&key, &value).await?;
                Ok(format!("{key}: {}", gateway.residency(&key)?))
            }
            Commands::Status { key } => {
                let key = StoredKey::new(key)?;
                let residency = gateway.residency(&key)?;
                let usage = gateway.primary().usage().map_err(|e| {
                    Error::storage(cellar_core::Tier::Primary, key.as_str(), "usage", e.to_string())
                })?;
                Ok(format!(
                    "{key}: {residency}\nprimary tier: {} of {} bytes used",
                    usage.used_bytes, usage.quota_bytes
                ))
            }
            Commands::Remove { key } => {
                let key = StoredKey::new(key)?;
                let removed = gateway.remove(&key).await?;
                Ok(if removed {
                    format!("{key}: removed")
                } else {
                    format!("{key}: absent")
                })
            }
            Commands::Validate { set } => {
                let set = record_set(&set, config)?;
                let collection = gateway.read_collection(&set).await?;
                Ok(format!(
                    "{}: {} records kept, {} dropped",
                    set.name,
                    collection.len(),
                    collection.dropped
                ))
            }
        }
    }
}

fn record_set(name: &str, config: &StoreConfig) -> Result<RecordSet> {
    if name == RecordSet::LOGS.name {
        return Ok(config.logs_set());
    }
    RecordSet::by_name(name).ok_or_else(|| {
        let known: Vec<_> = RecordSet::ALL.iter().map(|set| set.name).collect();
        Error::configuration(format!(
            "unknown record set '{name}', expected one of: {}",
            known.join(", ")
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellar_store::StoreConfigBuilder;
    use tempfile::TempDir;

    fn config(temp_dir: &TempDir) -> StoreConfig {
        StoreConfigBuilder::new()
            .with_data_dir(temp_dir.path())
            .with_primary_quota(256)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(&temp_dir);

        let written = Commands::Write {
            key: "settings".into(),
            json: r#"{"theme":"dark","since":{"__type":"Date","iso":"2025-01-01T12:00:00.000Z"}}"#
                .into(),
        }
        .execute(&config)
        .await
        .unwrap();
        assert_eq!(written, "settings: tier1");

        let read = Commands::Read {
            key: "settings".into(),
        }
        .execute(&config)
        .await
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&read).unwrap();
        assert_eq!(json["since"]["__type"], "Date");
        assert_eq!(json["theme"], "dark");
    }

    #[tokio::test]
    async fn test_validate_reports_dropped_records() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(&temp_dir);
        Commands::Write {
            key: RecordSet::PRESETS.key.into(),
            json: r#"[{"id":"p1","name":"Work"},{"id":"p2"}]"#.into(),
        }
        .execute(&config)
        .await
        .unwrap();

        let report = Commands::Validate {
            set: "presets".into(),
        }
        .execute(&config)
        .await
        .unwrap();
        assert_eq!(report, "presets: 1 records kept, 1 dropped");
    }

    #[tokio::test]
    async fn test_unknown_set_and_bad_key() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(&temp_dir);
        assert!(Commands::Validate { set: "nope".into() }
            .execute(&config)
            .await
            .is_err());
        assert!(Commands::Read {
            key: "../etc".into()
        }
        .execute(&config)
        .await
        .is_err());
    }
}
