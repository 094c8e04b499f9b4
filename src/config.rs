use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{Catalog, default_catalog};
use crate::storage::{BudgetStore, ExpenseStore, RecordSchema};

pub const DEFAULT_CONFIG_FILE: &str = "spendlog.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the expenses and budget files
    pub data_dir: PathBuf,
    pub expenses_file: String,
    pub budget_file: String,
    /// Column layout used when writing the expenses file
    pub schema: RecordSchema,
    /// Accepted categories; an empty list accepts anything
    pub categories: Catalog,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            expenses_file: "expenses.csv".to_string(),
            budget_file: "budget.csv".to_string(),
            schema: RecordSchema::default(),
            categories: default_catalog(),
        }
    }
}

impl Config {
    pub fn expenses_path(&self) -> PathBuf {
        self.data_dir.join(&self.expenses_file)
    }

    pub fn budget_path(&self) -> PathBuf {
        self.data_dir.join(&self.budget_file)
    }

    pub fn expense_store(&self) -> ExpenseStore {
        ExpenseStore::new(self.expenses_path(), self.schema)
    }

    pub fn budget_store(&self) -> BudgetStore {
        BudgetStore::new(self.budget_path())
    }
}

/// Read the config file, falling back to defaults when it does not exist.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Write a default config file unless one is already there.
/// Returns false if the file existed.
pub fn init_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save_config(path, &Config::default())?;
    Ok(true)
}
