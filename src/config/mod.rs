use std::{
    collections::HashMap,
    env,
    fs,
    path::PathBuf,
};

use directories::BaseDirs;

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    pub config_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        Self::load_from(default_config_path())
    }

    /// Defaults, then the rc file at `config_path`, then the environment.
    pub fn load_from(config_path: PathBuf) -> Self {
        let mut map = default_map();

        if let Ok(text) = fs::read_to_string(&config_path) {
            map.extend(parse_rc(&text));
        }

        // Overlay environment variables (take precedence)
        for (k, v) in env::vars() {
            if is_config_key(&k) {
                map.insert(k, v);
            }
        }

        Self { inner: map, config_path }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        // ENV first
        if let Ok(v) = env::var(key) {
            return Some(v);
        }
        self.inner.get(key).cloned()
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key)
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false)
    }

    pub fn get_path(&self, key: &str) -> Option<PathBuf> {
        self.get(key).filter(|v| !v.is_empty()).map(PathBuf::from)
    }

    pub fn history_path(&self) -> PathBuf {
        self.get_path("CODEPAD_HISTORY_PATH")
            .unwrap_or_else(|| codepad_dir().join("history"))
    }

    pub fn preview_dir(&self) -> PathBuf {
        self.get_path("CODEPAD_PREVIEW_DIR")
            .unwrap_or_else(|| env::temp_dir().join("codepad"))
    }
}

/// `KEY=VALUE` lines; blank lines and `#` comments are skipped.
pub fn parse_rc(text: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((k, v)) = line.split_once('=') {
            map.insert(k.trim().to_string(), v.trim().to_string());
        }
    }
    map
}

fn is_config_key(k: &str) -> bool {
    k.starts_with("CODEPAD_")
}

fn codepad_dir() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("codepad")
}

fn default_config_path() -> PathBuf {
    codepad_dir().join(".codepadrc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();

    m.insert("CODEPAD_NODE".into(), "node".into());
    m.insert("CODEPAD_TIMEOUT".into(), "0".into());
    m.insert("CODEPAD_COLOR".into(), "true".into());
    m.insert("CODEPAD_LOG_LEVEL".into(), "codepad=warn".into());
    m.insert("CODEPAD_LOG_JSON".into(), "false".into());
    m.insert(
        "CODEPAD_HISTORY_PATH".into(),
        codepad_dir().join("history").to_string_lossy().into_owned(),
    );
    m.insert(
        "CODEPAD_PREVIEW_DIR".into(),
        env::temp_dir().join("codepad").to_string_lossy().into_owned(),
    );

    m
}
