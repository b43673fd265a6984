use std::path::{Path, PathBuf};

use clap::ValueEnum;
use pagetext_core::PdfBackend;
use pagetext_core::config_file::ConfigFile;
use pagetext_mupdf::MupdfBackend;
use pagetext_pdf_extract::PdfExtractBackend;

/// Source file used when none is given on the command line.
pub const DEFAULT_SOURCE: &str = "Work Sample Request from Health Note.pdf";

/// Available text extraction backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// MuPDF (default)
    #[default]
    Mupdf,
    /// Pure-Rust pdf-extract
    PdfExtract,
}

impl BackendKind {
    /// Parse a backend name from the environment or a config file.
    pub fn parse_name(name: &str) -> anyhow::Result<Self> {
        <Self as ValueEnum>::from_str(name.trim(), true).map_err(|_| {
            let valid: Vec<String> = Self::value_variants()
                .iter()
                .filter_map(|v| v.to_possible_value())
                .map(|v| v.get_name().to_string())
                .collect();
            anyhow::anyhow!(
                "unknown backend {:?} (expected one of: {})",
                name,
                valid.join(", ")
            )
        })
    }

    pub fn build(self) -> Box<dyn PdfBackend> {
        match self {
            BackendKind::Mupdf => Box::new(MupdfBackend::new()),
            BackendKind::PdfExtract => Box::new(PdfExtractBackend::new()),
        }
    }
}

/// Values taken from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct FlagOverrides {
    pub backend: Option<BackendKind>,
    pub no_color: bool,
    pub quiet: bool,
}

/// Values taken from environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub backend: Option<String>,
    pub no_color: bool,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            backend: std::env::var("PAGETEXT_BACKEND")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            no_color: std::env::var_os("NO_COLOR").is_some(),
        }
    }
}

/// Fully resolved run settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub backend: BackendKind,
    pub color: bool,
    pub quiet: bool,
}

/// Resolve settings: CLI flags > env vars > config file > defaults.
pub fn resolve(
    flags: &FlagOverrides,
    env: &EnvOverrides,
    config: &ConfigFile,
) -> anyhow::Result<Settings> {
    let backend = match flags.backend {
        Some(kind) => kind,
        None => match env.backend.as_deref().or(config.backend()) {
            Some(name) => BackendKind::parse_name(name)?,
            None => BackendKind::default(),
        },
    };

    let color = !flags.no_color && !env.no_color && config.color().unwrap_or(true);
    let quiet = flags.quiet || config.quiet().unwrap_or(false);

    Ok(Settings {
        backend,
        color,
        quiet,
    })
}

/// Destination next to `source` with a `.txt` extension.
///
/// Never returns `source` itself, so a `.txt` input is not overwritten.
pub fn default_dest(source: &Path) -> PathBuf {
    let dest = source.with_extension("txt");
    if dest == source {
        let mut name = source.as_os_str().to_owned();
        name.push(".txt");
        PathBuf::from(name)
    } else {
        dest
    }
}

#[cfg(test)]
mod tests {
    use pagetext_core::config_file::{DisplayConfig, ExtractionConfig};

    use super::*;

    fn config_with_backend(name: &str) -> ConfigFile {
        ConfigFile {
            extraction: Some(ExtractionConfig {
                backend: Some(name.to_string()),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_without_overrides() {
        let settings = resolve(
            &FlagOverrides::default(),
            &EnvOverrides::default(),
            &ConfigFile::default(),
        )
        .unwrap();
        assert_eq!(
            settings,
            Settings {
                backend: BackendKind::Mupdf,
                color: true,
                quiet: false,
            }
        );
    }

    #[test]
    fn flag_beats_env_beats_config() {
        let config = config_with_backend("mupdf");
        let env = EnvOverrides {
            backend: Some("pdf-extract".into()),
            no_color: false,
        };

        let from_env = resolve(&FlagOverrides::default(), &env, &config).unwrap();
        assert_eq!(from_env.backend, BackendKind::PdfExtract);

        let flags = FlagOverrides {
            backend: Some(BackendKind::Mupdf),
            ..Default::default()
        };
        let from_flag = resolve(&flags, &env, &config).unwrap();
        assert_eq!(from_flag.backend, BackendKind::Mupdf);

        let from_config = resolve(
            &FlagOverrides::default(),
            &EnvOverrides::default(),
            &config_with_backend("PDF-Extract"),
        )
        .unwrap();
        assert_eq!(from_config.backend, BackendKind::PdfExtract);
    }

    #[test]
    fn unknown_backend_lists_valid_names() {
        let err = resolve(
            &FlagOverrides::default(),
            &EnvOverrides::default(),
            &config_with_backend("poppler"),
        )
        .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("poppler"));
        assert!(message.contains("mupdf, pdf-extract"));
    }

    #[test]
    fn any_color_opt_out_disables_color() {
        let config = ConfigFile {
            display: Some(DisplayConfig {
                color: Some(false),
                quiet: Some(true),
            }),
            ..Default::default()
        };
        let settings =
            resolve(&FlagOverrides::default(), &EnvOverrides::default(), &config).unwrap();
        assert!(!settings.color);
        assert!(settings.quiet);

        let env = EnvOverrides {
            backend: None,
            no_color: true,
        };
        let settings = resolve(&FlagOverrides::default(), &env, &ConfigFile::default()).unwrap();
        assert!(!settings.color);
    }

    #[test]
    fn default_dest_replaces_extension() {
        assert_eq!(
            default_dest(Path::new(DEFAULT_SOURCE)),
            PathBuf::from("Work Sample Request from Health Note.txt")
        );
        assert_eq!(
            default_dest(Path::new("dir/report")),
            PathBuf::from("dir/report.txt")
        );
    }

    #[test]
    fn default_dest_never_overwrites_txt_source() {
        assert_eq!(
            default_dest(Path::new("notes.txt")),
            PathBuf::from("notes.txt.txt")
        );
    }
}
