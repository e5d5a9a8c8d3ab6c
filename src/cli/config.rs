//! serverdesk config command implementation
//!
//! Shows the effective configuration and where it is read from, and
//! records the default server.

use std::path::PathBuf;

use serde::Serialize;

use crate::config::Config;
use crate::storage::StoragePort;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};

use super::Context;

#[derive(Serialize)]
struct ConfigShowReport<'a> {
    path: Option<&'a PathBuf>,
    exists: bool,
    data_dir: PathBuf,
    store_file: PathBuf,
    config: &'a Config,
}

#[derive(Serialize)]
struct ConfigPathReport<'a> {
    path: Option<&'a PathBuf>,
    exists: bool,
}

#[derive(Serialize)]
struct ConfigSetDefaultReport<'a> {
    path: &'a PathBuf,
    default_server: Option<&'a str>,
}

fn config_exists(ctx: &Context) -> bool {
    ctx.config_path.as_ref().is_some_and(|path| path.exists())
}

fn display_path(path: Option<&PathBuf>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "(no config directory)".to_string())
}

pub fn run_show(ctx: &Context) -> Result<()> {
    let storage = ctx.storage();
    let report = ConfigShowReport {
        path: ctx.config_path.as_ref(),
        exists: config_exists(ctx),
        data_dir: storage.data_dir().to_path_buf(),
        store_file: storage.store_file(),
        config: &ctx.config,
    };

    let mut human = HumanOutput::new("serverdesk config");
    human.push_summary("config file", display_path(report.path));
    human.push_summary("data dir", report.data_dir.display().to_string());
    human.push_summary("store file", report.store_file.display().to_string());
    human.push_summary("storage.key", ctx.config.storage.key.clone());
    human.push_summary(
        "storage.lock_timeout_ms",
        ctx.config.storage.lock_timeout_ms.to_string(),
    );
    human.push_summary(
        "desk.default_server",
        ctx.config
            .desk
            .default_server
            .clone()
            .unwrap_or_else(|| "(first server)".to_string()),
    );
    human.push_summary(
        "display.color",
        format!("{:?}", ctx.config.display.color).to_lowercase(),
    );
    if !report.exists {
        human.push_warning("config file not found; using defaults");
    }

    emit_success(ctx.output(), "config show", &report, Some(&human))
}

pub fn run_path(ctx: &Context) -> Result<()> {
    let report = ConfigPathReport {
        path: ctx.config_path.as_ref(),
        exists: config_exists(ctx),
    };

    let human = HumanOutput::new(display_path(report.path));
    emit_success(ctx.output(), "config path", &report, Some(&human))
}

/// Write `desk.default_server` to the config file, clearing it when `name`
/// is omitted. Other settings in the file are kept.
pub fn run_set_default(ctx: &Context, name: Option<&str>) -> Result<()> {
    let path = ctx.config_path.as_ref().ok_or_else(|| {
        Error::InvalidArgument("no config file location; pass --config <path>".to_string())
    })?;

    let mut config = ctx.config.clone();
    config.desk.default_server = name.map(str::trim).map(str::to_string);
    config.save(path)?;
    tracing::debug!(path = %path.display(), "config saved");

    let default_server = config.desk.default_server.as_deref();
    let mut human = match default_server {
        Some(server) => HumanOutput::new(format!("serverdesk config set-default: {server}")),
        None => HumanOutput::new("serverdesk config set-default: cleared"),
    };
    human.push_summary("config file", path.display().to_string());
    if let Some(server) = default_server {
        let known = ctx.storage().load_all().contains(server);
        if !known {
            human.push_warning(format!(
                "server \"{server}\" does not exist yet; \
                 the first server is used until it does"
            ));
        }
    }

    let report = ConfigSetDefaultReport {
        path,
        default_server,
    };
    emit_success(ctx.output(), "config set-default", &report, Some(&human))
}
