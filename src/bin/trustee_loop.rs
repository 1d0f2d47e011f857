// Copyright © 2025 Denis Morel
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free
// Software Foundation, either version 3 of the License, or (at your option) any
// later version.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License and
// a copy of the GNU General Public License along with this program. If not, see
// <https://www.gnu.org/licenses/>.

//! `trustee-loop <section-name>`: load this trustee's configuration and
//! key material, take the single-instance guard, resolve this trustee's identity
//! against the posted Config, then run the driver forever (or once, with `--once`).

use std::net::TcpListener;
use std::path::PathBuf;
use structopt::StructOpt;
use trustee_core::board::{Board, FileBoard};
use trustee_core::consts::{DEFAULT_RUST_LOG, ENV_RUST_LOG, ENV_TRUSTEE_CONFIG_PATH};
use trustee_core::driver::Driver;
use trustee_core::ids::TrusteeId;
use trustee_core::names::Name;
use trustee_core::{Keystore, Report, TrusteeConfig};

#[derive(StructOpt, Debug)]
#[structopt(name = "trustee-loop")]
struct Opt {
    /// Identifies which trustee instance this is, for logging; the actual
    /// configuration file location is read from `TRUSTEE_CONFIG_PATH` (or
    /// `--config`) ("location is given by an environment or
    /// process property").
    section: String,

    /// Override the configuration file path instead of reading it from the
    /// `TRUSTEE_CONFIG_PATH` environment variable.
    #[structopt(long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Run exactly one cycle, then exit.
    #[structopt(long)]
    once: bool,
}

fn main() {
    let opt = Opt::from_args();
    init_tracing();

    if let Err(e) = run(&opt) {
        eprintln!("{}", Report::new(e.as_ref()));
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = std::env::var(ENV_RUST_LOG).unwrap_or_else(|_| DEFAULT_RUST_LOG.to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .init();
}

fn run(opt: &Opt) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = match &opt.config {
        Some(p) => p.clone(),
        None => PathBuf::from(std::env::var(ENV_TRUSTEE_CONFIG_PATH).map_err(|_| {
            format!(
                "environment variable {ENV_TRUSTEE_CONFIG_PATH} is not set and --config was not given"
            )
        })?),
    };

    tracing::info!(section = %opt.section, config = %config_path.display(), "starting trustee-loop");

    let trustee_config = TrusteeConfig::from_path(&config_path)?;
    let keystore = Keystore::load(&trustee_config)?;

    let _singleton_guard = take_singleton_guard(&trustee_config)?;

    let board = FileBoard::new(trustee_config.data_store_path()?)?;
    board.sync()?;

    let config_bytes = board
        .get(&Name::Config)?
        .ok_or("Config is not yet posted on the board")?;
    let config: trustee_core::artifacts::Config = serde_json::from_slice(&config_bytes)
        .map_err(|e| format!("Config on the board is not parseable: {e}"))?;

    let own_public_key_pem = String::from_utf8(keystore.public_key.to_pem()?)?;
    let self_position = config
        .trustee_public_keys_pem
        .iter()
        .position(|pem| pem.trim() == own_public_key_pem.trim())
        .ok_or("this trustee's own public key is not listed in the posted Config")?;
    let self_id = TrusteeId::new(self_position + 1)?;

    tracing::info!(trustee = %self_id, "resolved trustee identity from posted Config");

    let offline_split = trustee_config.offline_split()?;
    let mut driver = Driver::new(&board, &keystore, self_id, offline_split);
    driver.cycle_sleep = std::time::Duration::from_secs(trustee_core::consts::DEFAULT_CYCLE_SLEEP_SECONDS);

    if opt.once {
        let summary = driver.run_cycle();
        tracing::info!(?summary, "ran a single cycle");
        return Ok(());
    }

    driver.run_forever();
}

/// A single-instance guard: a loopback TCP port the process binds for its own
/// lifetime. `singletonPort == 0` disables the guard.
fn take_singleton_guard(config: &TrusteeConfig) -> Result<Option<TcpListener>, Box<dyn std::error::Error>> {
    let port = config.singleton_port()?;
    if port == 0 {
        return Ok(None);
    }
    let listener = TcpListener::bind(("127.0.0.1", port)).map_err(|e| {
        format!("could not bind the single-instance guard on port {port} (another trustee-loop already running?): {e}")
    })?;
    Ok(Some(listener))
}
