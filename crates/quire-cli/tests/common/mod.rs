#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use std::path::Path;
use std::time::Duration;

#[allow(dead_code)]
pub const CMD_TIMEOUT: Duration = Duration::from_secs(15);

/// Create a `quire` command isolated from the user's config and cache.
pub fn quire_cmd(data_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("quire"));
    cmd.timeout(CMD_TIMEOUT);
    cmd.env("QUIRE_DATA_DIR", data_dir);
    cmd.env("QUIRE_CONFIG_DIR", data_dir.join("config"));
    cmd.env_remove("QUIRE_HEAD_URL");
    cmd.env_remove("QUIRE_OUTPUT_FORMAT");
    cmd.env("NO_COLOR", "1");
    cmd
}
