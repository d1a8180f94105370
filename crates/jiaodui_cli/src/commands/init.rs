//! Init command implementation

use std::path::PathBuf;

use miette::{IntoDiagnostic, Result};
use tracing::info;

use jiaodui_core::CONFIG_FILES;

const DEFAULT_CONFIG: &str = r#"{
  // Per-rule switches: true / false, or a severity override
  // ("off", "info", "warning", "error", "critical").
  "rules": {},

  // Enabled rule categories.
  "categories": ["A", "B", "C", "D", "E", "F"],

  // Rules below this confidence are not loaded.
  "min_confidence": 0.0,

  "limits": {
    "sentence_max_chars": 120,
    "title_min_chars": 5,
    "title_max_chars": 64,
    "featured_min_ratio": 1.2,
    "image_min_width": 600
  },

  // Extra corpus tables, relative to this file.
  "corpus": [],

  "timings": false
}
"#;

pub fn run_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILES[0]);

    loop {
        let mut options = std::fs::OpenOptions::new();
        options.write(true).create_new(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.custom_flags(libc::O_NOFOLLOW);
        }

        match options.open(&config_path) {
            Ok(mut file) => {
                use std::io::Write;
                file.write_all(DEFAULT_CONFIG.as_bytes()).into_diagnostic()?;
                info!("Created {}", config_path.display());
                return Ok(());
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                if !force {
                    return Err(miette::miette!(
                        "Config file already exists. Use --force to overwrite."
                    ));
                }

                match std::fs::remove_file(&config_path) {
                    Ok(()) => {}
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e).into_diagnostic(),
                }
            }
            Err(e) => return Err(e).into_diagnostic(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiaodui_core::EngineConfig;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config_matches_engine_defaults() {
        let config = EngineConfig::from_json(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, EngineConfig::new());
    }
}
