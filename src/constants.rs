/// Smallest radix a share value may be encoded in.
pub const MIN_BASE: u32 = 2;

/// Largest radix a share value may be encoded in (`0-9` then `a-z`).
pub const MAX_BASE: u32 = 36;

/// Name of the threshold record in a share file.
pub const KEYS_RECORD: &str = "keys";

/// Directory holding `conf.toml` when no `--config` is given.
pub const DEFAULT_CONFIG_DIR: &str = ".shardsolve";

/// Prefix for environment overrides, eg. `SHARDSOLVE_RADIX=16`.
pub const ENV_PREFIX: &str = "SHARDSOLVE";

/// Share files solved when neither the CLI nor the config names any.
pub const DEFAULT_INPUTS: [&str; 2] = ["shares1.json", "shares2.json"];

/// Radix the secret is displayed in by default.
pub const DEFAULT_RADIX: u32 = 10;
