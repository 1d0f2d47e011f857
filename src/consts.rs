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

// Shared protocol and process constants

/// Minimum number of trustees a Config may list.
pub const MINIMUM_NUMBER_OF_TRUSTEES: usize = 2;

/// Default sleep between driver cycles.
pub const DEFAULT_CYCLE_SLEEP_SECONDS: u64 = 5;

/// Default loopback port for the single-instance guard.
pub const DEFAULT_SINGLETON_PORT: u16 = 9999;

/// Default bounded number of retry attempts for a lost board push race.
pub const DEFAULT_BOARD_PUSH_RETRIES: u8 = 5;

/// AES key size in bytes for the trustee master key.
pub const AES_KEY_LEN_BYTES: usize = 16;

/// AES-CBC IV size in bytes.
pub const AES_IV_LEN_BYTES: usize = 16;

/// Env var / config key names
pub const CONFIG_KEY_DATA_STORE_PATH: &str = "dataStorePath";
pub const CONFIG_KEY_REPO_BASE_URI: &str = "repoBaseUri";
pub const CONFIG_KEY_PUBLIC_KEY: &str = "publicKey";
pub const CONFIG_KEY_PRIVATE_KEY: &str = "privateKey";
pub const CONFIG_KEY_AES_KEY: &str = "aesKey";
pub const CONFIG_KEY_PEERS: &str = "peers";
pub const CONFIG_KEY_OFFLINE_SPLIT: &str = "offlineSplit";
pub const CONFIG_KEY_GIT_NO_COMPRESSION: &str = "gitNoCompression";
pub const CONFIG_KEY_GIT_REMOVE_LOCK: &str = "gitRemoveLock";
pub const CONFIG_KEY_SINGLETON_PORT: &str = "singletonPort";

/// Env var naming the path of the flat key/value configuration file whose location
/// is given by an environment or process property.
pub const ENV_TRUSTEE_CONFIG_PATH: &str = "TRUSTEE_CONFIG_PATH";

/// Env var controlling the `tracing` log filter.
pub const ENV_RUST_LOG: &str = "RUST_LOG";

pub const DEFAULT_RUST_LOG: &str = "info";
