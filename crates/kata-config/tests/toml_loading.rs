//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for sandboxed cwd and env var manipulation.

use figment::Jail;
use kata_config::{LOCAL_CONFIG_FILE, SyncConfig};
use pretty_assertions::assert_eq;

/// Point the user-global config dir into the jail so a developer's own
/// config cannot leak into the assertions.
fn isolate_global_config(jail: &mut Jail) {
    let dir = jail.directory().join("xdg");
    jail.set_env("XDG_CONFIG_HOME", dir.display());
}

#[test]
fn loads_all_sections_from_local_toml() {
    Jail::expect_with(|jail| {
        isolate_global_config(jail);
        jail.create_file(
            LOCAL_CONFIG_FILE,
            r#"
[account]
username = "me@example.com"
password = "toml-secret"

[api]
base_url = "https://catalog.example.com"
user = "warrior"
timeout_secs = 5
all_pages = true

[repo]
local_path = "/srv/katas"
remote_id = "me/katas"
branch = "trunk"
remote = "upstream"

[browser]
webdriver_url = "http://127.0.0.1:4444"
headless = true
wait_timeout_secs = 7
require_login = true

[browser.selectors]
code = "pre.code"

[git]
timeout_secs = 15
"#,
        )?;

        let config = SyncConfig::load().expect("config loads");

        assert_eq!(config.account.username, "me@example.com");
        assert_eq!(config.account.password, "toml-secret");
        assert_eq!(config.api.base_url, "https://catalog.example.com");
        assert_eq!(config.api_user(), "warrior");
        assert_eq!(config.api.timeout_secs, 5);
        assert!(config.api.all_pages);
        assert_eq!(config.repo.local_path.to_str(), Some("/srv/katas"));
        assert_eq!(config.repo.remote_id, "me/katas");
        assert_eq!(config.repo.branch, "trunk");
        assert_eq!(config.repo.remote, "upstream");
        assert_eq!(config.browser.webdriver_url, "http://127.0.0.1:4444");
        assert!(config.browser.headless);
        assert_eq!(config.browser.wait_timeout_secs, 7);
        assert!(config.browser.require_login);
        assert_eq!(config.browser.selectors.code, "pre.code");
        assert_eq!(
            config.browser.selectors.toggle,
            "sl-details#kata-details-description span[slot='summary']"
        );
        assert_eq!(config.git.timeout_secs, 15);
        assert!(config.validate_for_sync().is_ok());
        Ok(())
    });
}

#[test]
fn partial_toml_keeps_defaults() {
    Jail::expect_with(|jail| {
        isolate_global_config(jail);
        jail.create_file(
            LOCAL_CONFIG_FILE,
            r#"
[repo]
local_path = "./katas"
"#,
        )?;

        let config = SyncConfig::load().expect("config loads");
        assert_eq!(config.repo.local_path.to_str(), Some("./katas"));
        assert_eq!(config.repo.branch, "main");
        assert_eq!(config.repo.remote, "origin");
        assert_eq!(config.browser.wait_timeout_secs, 20);
        assert_eq!(config.git.timeout_secs, 120);
        assert_eq!(config.api.base_url, "https://www.codewars.com");
        Ok(())
    });
}

#[test]
fn global_config_is_overridden_by_local() {
    Jail::expect_with(|jail| {
        isolate_global_config(jail);
        jail.create_dir("xdg/kata-sync")?;
        jail.create_file(
            "xdg/kata-sync/config.toml",
            r#"
[repo]
local_path = "/global/katas"
branch = "global-branch"
"#,
        )?;
        jail.create_file(
            LOCAL_CONFIG_FILE,
            r#"
[repo]
branch = "local-branch"
"#,
        )?;

        let config = SyncConfig::load().expect("config loads");
        assert_eq!(config.repo.local_path.to_str(), Some("/global/katas"));
        assert_eq!(config.repo.branch, "local-branch");
        Ok(())
    });
}

#[test]
fn no_files_yields_defaults() {
    Jail::expect_with(|jail| {
        isolate_global_config(jail);
        let config = SyncConfig::load().expect("config loads");
        assert!(!config.account.is_configured());
        assert!(!config.repo.is_configured());
        Ok(())
    });
}

#[test]
fn malformed_toml_is_an_error() {
    Jail::expect_with(|jail| {
        isolate_global_config(jail);
        jail.create_file(
            LOCAL_CONFIG_FILE,
            r#"
[git]
timeout_secs = "soon"
"#,
        )?;

        assert!(SyncConfig::load().is_err());
        Ok(())
    });
}
