use std::path::PathBuf;
use std::time::Duration;

use mc_deepl::{DeepLConfig, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS};

pub const CREDENTIAL_ENV: &str = "DEEPL_API_KEY";
pub const DEFAULT_CATALOG_ROOT: &str = ".";
const EDITOR_PREFS_FILE: &str = "editor_prefs.v1";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditorPrefs {
    pub endpoint: String,
    pub timeout_secs: u64,
    pub supported_locales: Vec<String>,
    pub catalog_root: String,
    pub credential: String,
}

impl Default for EditorPrefs {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            supported_locales: Vec::new(),
            catalog_root: DEFAULT_CATALOG_ROOT.to_string(),
            credential: String::new(),
        }
    }
}

impl EditorPrefs {
    pub fn deepl_config(&self) -> DeepLConfig {
        DeepLConfig {
            endpoint: self.endpoint.clone(),
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
        }
    }

    /// `DEEPL_API_KEY` wins over the stored credential.
    pub fn resolve_credential(&self) -> String {
        match std::env::var(CREDENTIAL_ENV) {
            Ok(key) if !key.trim().is_empty() => key.trim().to_string(),
            _ => self.credential.clone(),
        }
    }
}

pub fn editor_prefs_path() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(dir).join("msgcat").join(EDITOR_PREFS_FILE));
    }
    if let Ok(home) = std::env::var("HOME") {
        return Some(
            PathBuf::from(home)
                .join(".config")
                .join("msgcat")
                .join(EDITOR_PREFS_FILE),
        );
    }
    #[cfg(target_os = "windows")]
    {
        if let Ok(appdata) = std::env::var("APPDATA") {
            return Some(PathBuf::from(appdata).join("msgcat").join(EDITOR_PREFS_FILE));
        }
    }
    None
}

pub fn load_editor_prefs() -> Result<EditorPrefs, String> {
    let Some(path) = editor_prefs_path() else {
        return Ok(EditorPrefs::default());
    };
    if !path.exists() {
        return Ok(EditorPrefs::default());
    }
    let content =
        std::fs::read_to_string(&path).map_err(|err| format!("read {}: {err}", path.display()))?;
    parse_editor_prefs(&content)
}

pub fn save_editor_prefs(prefs: &EditorPrefs) -> Result<(), String> {
    let Some(path) = editor_prefs_path() else {
        return Err("cannot resolve a config directory for editor prefs".to_string());
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|err| format!("create {}: {err}", parent.display()))?;
    }
    std::fs::write(&path, serialize_editor_prefs(prefs))
        .map_err(|err| format!("write {}: {err}", path.display()))
}

pub fn serialize_editor_prefs(prefs: &EditorPrefs) -> String {
    let mut lines = Vec::new();
    lines.push("version=1".to_string());
    lines.push(format!("endpoint={}", escape_pref_value(&prefs.endpoint)));
    lines.push(format!("timeout_secs={}", prefs.timeout_secs));
    lines.push(format!(
        "supported_locales={}",
        escape_pref_value(&prefs.supported_locales.join(","))
    ));
    lines.push(format!(
        "catalog_root={}",
        escape_pref_value(&prefs.catalog_root)
    ));
    if !prefs.credential.is_empty() {
        lines.push(format!("credential={}", escape_pref_value(&prefs.credential)));
    }
    lines.join("\n")
}

pub fn parse_editor_prefs(content: &str) -> Result<EditorPrefs, String> {
    let mut out = EditorPrefs::default();
    let mut version = None::<u32>;
    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err("malformed editor prefs line".to_string());
        };
        match key {
            "version" => {
                let v = value
                    .parse::<u32>()
                    .map_err(|_| "invalid editor prefs version".to_string())?;
                version = Some(v);
            }
            "endpoint" => out.endpoint = unescape_pref_value(value)?,
            "timeout_secs" => {
                out.timeout_secs = value
                    .parse::<u64>()
                    .map_err(|_| format!("invalid timeout_secs: {value}"))?;
            }
            "supported_locales" => out.supported_locales = split_locales(&unescape_pref_value(value)?),
            "catalog_root" => out.catalog_root = unescape_pref_value(value)?,
            "credential" => out.credential = unescape_pref_value(value)?,
            _ => {}
        }
    }
    match version {
        Some(1) => Ok(out),
        Some(v) => Err(format!("unsupported editor prefs version: {v}")),
        None => Err("editor prefs version missing".to_string()),
    }
}

/// Splits `en_US, de_DE,,fr` into trimmed, non-empty codes.
pub fn split_locales(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect()
}

fn escape_pref_value(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '%' => out.push_str("%25"),
            '=' => out.push_str("%3D"),
            '\n' => out.push_str("%0A"),
            '\r' => out.push_str("%0D"),
            _ => out.push(ch),
        }
    }
    out
}

fn unescape_pref_value(input: &str) -> Result<String, String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0usize;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if i + 2 >= bytes.len() {
                return Err("invalid escape in editor prefs".to_string());
            }
            let hi = (bytes[i + 1] as char)
                .to_digit(16)
                .ok_or_else(|| "invalid escape in editor prefs".to_string())?;
            let lo = (bytes[i + 2] as char)
                .to_digit(16)
                .ok_or_else(|| "invalid escape in editor prefs".to_string())?;
            out.push((hi * 16 + lo) as u8);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).map_err(|_| "editor prefs value is not utf-8".to_string())
}
