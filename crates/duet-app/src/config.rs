//! Startup configuration: environment variable, then `settings` row, then
//! built-in default.

use std::path::PathBuf;

use duet_proc::ShellConfig;
use duet_session::ControllerConfig;
use duet_store::settings;
use rusqlite::Connection;

/// Settings key for the shell program used for commands.
pub const SETTING_SHELL_PROGRAM: &str = "shell_program";

/// Settings key for the flag that makes the shell run a command string.
pub const SETTING_SHELL_FLAG: &str = "shell_flag";

/// Settings key for the assistant CLI binary.
pub const SETTING_ASSISTANT_PROGRAM: &str = "assistant_program";

/// Settings key for the assistant output markup: a JSON array of
/// `[pattern, replacement]` pairs, applied in order.
pub const SETTING_MARKUP_RULES: &str = "markup_rules";

/// Default assistant CLI binary if not configured.
pub const DEFAULT_ASSISTANT_PROGRAM: &str = "gemini";

pub const DEFAULT_LOG_FILTER: &str = "warn";

pub const ENV_HOME: &str = "DUET_HOME";
pub const ENV_SHELL: &str = "DUET_SHELL";
pub const ENV_ASSISTANT: &str = "DUET_ASSISTANT";
pub const ENV_LOG: &str = "DUET_LOG";

/// Looks up one environment variable. Empty values count as unset.
pub trait Env {
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment.
pub struct ProcessEnv;

impl Env for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.trim().is_empty())
    }
}

/// Directory holding the database and the log file: `$DUET_HOME`, else
/// `$HOME/.duet`.
pub fn data_dir(env: &impl Env) -> Option<PathBuf> {
    env.var(ENV_HOME)
        .map(PathBuf::from)
        .or_else(|| env.var("HOME").map(|home| PathBuf::from(home).join(".duet")))
}

pub fn log_filter(env: &impl Env) -> String {
    env.var(ENV_LOG)
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

/// Write built-in defaults for every setting that has no row yet.
pub fn seed_defaults(conn: &Connection) -> rusqlite::Result<()> {
    let shell = ShellConfig::default();
    let defaults = [
        (SETTING_SHELL_PROGRAM, shell.program.as_str()),
        (SETTING_SHELL_FLAG, shell.flag.as_str()),
        (SETTING_ASSISTANT_PROGRAM, DEFAULT_ASSISTANT_PROGRAM),
    ];

    for (key, value) in defaults {
        if settings::seed(conn, key, value)? {
            log::info!("seeded setting {key} = {value:?}");
        }
    }
    Ok(())
}

/// Resolve the controller configuration.
pub fn controller_config(env: &impl Env, conn: &Connection) -> rusqlite::Result<ControllerConfig> {
    let fallback = ShellConfig::default();

    let program = resolve(env, ENV_SHELL, conn, SETTING_SHELL_PROGRAM)?
        .unwrap_or(fallback.program);
    let flag = settings::get(conn, SETTING_SHELL_FLAG)?
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(fallback.flag);
    let assistant_program = resolve(env, ENV_ASSISTANT, conn, SETTING_ASSISTANT_PROGRAM)?
        .unwrap_or_else(|| DEFAULT_ASSISTANT_PROGRAM.to_string());

    Ok(ControllerConfig {
        shell: ShellConfig::new(program, flag),
        assistant_program,
    })
}

/// Custom markup rules, if the setting holds any. A value that does not
/// parse is logged and ignored.
pub fn markup_rules(conn: &Connection) -> rusqlite::Result<Option<Vec<(String, String)>>> {
    let Some(raw) = settings::get(conn, SETTING_MARKUP_RULES)?.filter(|v| !v.trim().is_empty())
    else {
        return Ok(None);
    };
    match serde_json::from_str::<Vec<(String, String)>>(&raw) {
        Ok(rules) => Ok(Some(rules)),
        Err(e) => {
            log::warn!("ignoring setting {SETTING_MARKUP_RULES}: {e}");
            Ok(None)
        }
    }
}

fn resolve(
    env: &impl Env,
    env_key: &str,
    conn: &Connection,
    setting: &str,
) -> rusqlite::Result<Option<String>> {
    if let Some(value) = env.var(env_key) {
        return Ok(Some(value));
    }
    Ok(settings::get(conn, setting)?.filter(|v| !v.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapEnv(HashMap<&'static str, &'static str>);

    impl MapEnv {
        fn new(vars: &[(&'static str, &'static str)]) -> Self {
            Self(vars.iter().copied().collect())
        }
    }

    impl Env for MapEnv {
        fn var(&self, key: &str) -> Option<String> {
            self.0
                .get(key)
                .filter(|v| !v.trim().is_empty())
                .map(|v| v.to_string())
        }
    }

    #[test]
    fn test_data_dir_prefers_duet_home() {
        let env = MapEnv::new(&[("DUET_HOME", "/data/duet"), ("HOME", "/home/me")]);
        assert_eq!(data_dir(&env), Some(PathBuf::from("/data/duet")));
    }

    #[test]
    fn test_data_dir_falls_back_to_home() {
        let env = MapEnv::new(&[("HOME", "/home/me")]);
        assert_eq!(data_dir(&env), Some(PathBuf::from("/home/me/.duet")));
        assert_eq!(data_dir(&MapEnv::new(&[])), None);
    }

    #[test]
    fn test_log_filter_default() {
        assert_eq!(log_filter(&MapEnv::new(&[])), "warn");
        assert_eq!(log_filter(&MapEnv::new(&[("DUET_LOG", "duet=debug")])), "duet=debug");
    }

    #[test]
    fn test_defaults_without_settings() {
        let conn = duet_store::open_in_memory().unwrap();
        let config = controller_config(&MapEnv::new(&[]), &conn).unwrap();
        assert_eq!(config.shell, ShellConfig::default());
        assert_eq!(config.assistant_program, "gemini");
    }

    #[test]
    fn test_settings_override_defaults() {
        let conn = duet_store::open_in_memory().unwrap();
        settings::set(&conn, SETTING_SHELL_PROGRAM, "bash").unwrap();
        settings::set(&conn, SETTING_SHELL_FLAG, "-lc").unwrap();
        settings::set(&conn, SETTING_ASSISTANT_PROGRAM, "claude").unwrap();

        let config = controller_config(&MapEnv::new(&[]), &conn).unwrap();
        assert_eq!(config.shell, ShellConfig::new("bash", "-lc"));
        assert_eq!(config.assistant_program, "claude");
    }

    #[test]
    fn test_env_overrides_settings() {
        let conn = duet_store::open_in_memory().unwrap();
        settings::set(&conn, SETTING_ASSISTANT_PROGRAM, "claude").unwrap();
        let env = MapEnv::new(&[("DUET_ASSISTANT", "/opt/gemini"), ("DUET_SHELL", "zsh")]);

        let config = controller_config(&env, &conn).unwrap();
        assert_eq!(config.assistant_program, "/opt/gemini");
        assert_eq!(config.shell.program, "zsh");
    }

    #[test]
    fn test_empty_values_are_unset() {
        let conn = duet_store::open_in_memory().unwrap();
        settings::set(&conn, SETTING_ASSISTANT_PROGRAM, "  ").unwrap();
        let env = MapEnv::new(&[("DUET_SHELL", "")]);

        let config = controller_config(&env, &conn).unwrap();
        assert_eq!(config.assistant_program, "gemini");
        assert_eq!(config.shell, ShellConfig::default());
    }

    #[test]
    fn test_markup_rules_parsed_in_order() {
        let conn = duet_store::open_in_memory().unwrap();
        settings::set(&conn, SETTING_MARKUP_RULES, r#"[["__(.+?)__", "<$1>"], ["~", "-"]]"#)
            .unwrap();

        let rules = markup_rules(&conn).unwrap().unwrap();
        assert_eq!(
            rules,
            [
                ("__(.+?)__".to_string(), "<$1>".to_string()),
                ("~".to_string(), "-".to_string()),
            ]
        );
    }

    #[test]
    fn test_markup_rules_missing_or_malformed() {
        let conn = duet_store::open_in_memory().unwrap();
        assert_eq!(markup_rules(&conn).unwrap(), None);

        settings::set(&conn, SETTING_MARKUP_RULES, "{\"bold\": 1}").unwrap();
        assert_eq!(markup_rules(&conn).unwrap(), None);
    }

    #[test]
    fn test_seed_defaults_keeps_user_values() {
        let conn = duet_store::open_in_memory().unwrap();
        settings::set(&conn, SETTING_ASSISTANT_PROGRAM, "claude").unwrap();
        seed_defaults(&conn).unwrap();
        seed_defaults(&conn).unwrap();

        assert_eq!(
            settings::get(&conn, SETTING_ASSISTANT_PROGRAM).unwrap().as_deref(),
            Some("claude")
        );
        assert_eq!(
            settings::get(&conn, SETTING_SHELL_PROGRAM).unwrap(),
            Some(ShellConfig::default().program)
        );
    }
}
