//! `margin render` command implementation.

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use margin_config::{CliSettings, Config, SidenoteNumbering};
use margin_renderer::sidenote::{Numbering, SidenoteClasses, SidenoteProcessorConfig};
use margin_renderer::{MathWrapper, PageRenderer, PageRendererConfig};

use crate::error::CliError;
use crate::output::Output;

/// Sidenote numbering accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum NumberingArg {
    /// Inline sidenotes first, then block sidenotes.
    TwoPass,
    /// Strict document order.
    DocumentOrder,
}

impl From<NumberingArg> for SidenoteNumbering {
    fn from(arg: NumberingArg) -> Self {
        match arg {
            NumberingArg::TwoPass => Self::TwoPass,
            NumberingArg::DocumentOrder => Self::DocumentOrder,
        }
    }
}

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown files to render.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Directory for rendered HTML (overrides config). Without one, a single
    /// file is written to stdout.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover margin.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable inline math wrapping (default: enabled).
    #[arg(long)]
    math: Option<bool>,

    /// Disable inline math wrapping.
    #[arg(long, conflicts_with = "math")]
    no_math: bool,

    /// Sidenote numbering order (overrides config).
    #[arg(long, value_enum)]
    numbering: Option<NumberingArg>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or a file cannot be read or
    /// written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            output_dir: self.output_dir.clone(),
            math_enabled: self.resolve_math_enabled(),
            numbering: self.numbering.map(SidenoteNumbering::from),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let output_dir = config.output.dir.clone();
        if output_dir.is_none() && self.files.len() > 1 {
            return Err(CliError::Validation(
                "rendering several files requires --output-dir or [output] dir in margin.toml"
                    .to_owned(),
            ));
        }

        let targets: Vec<Option<PathBuf>> = match &output_dir {
            Some(dir) => output_paths(dir, &self.files)?
                .into_iter()
                .map(Some)
                .collect(),
            None => vec![None; self.files.len()],
        };
        let renderer = PageRenderer::new(page_config(&config));

        for (file, target) in self.files.iter().zip(targets) {
            let result = renderer.render_file(file)?;
            for warning in &result.warnings {
                output.warning(&format!("{}: warning: {warning}", file.display()));
            }

            match target {
                Some(target) => {
                    if let Some(dir) = target.parent() {
                        std::fs::create_dir_all(dir)?;
                    }
                    std::fs::write(&target, &result.html)?;
                    output.success(&format!(
                        "Rendered {} -> {}",
                        file.display(),
                        target.display()
                    ));
                }
                None => {
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(result.html.as_bytes())?;
                    stdout.flush()?;
                }
            }
        }

        tracing::info!(files = self.files.len(), "Render finished");
        Ok(())
    }

    /// Resolve `math_enabled` from --math/--no-math flags.
    fn resolve_math_enabled(&self) -> Option<bool> {
        self.no_math.then_some(false).or(self.math)
    }
}

/// Build the page renderer configuration from loaded settings.
fn page_config(config: &Config) -> PageRendererConfig {
    let numbering = match config.sidenotes.numbering {
        SidenoteNumbering::TwoPass => Numbering::TwoPass,
        SidenoteNumbering::DocumentOrder => Numbering::DocumentOrder,
    };
    let classes = SidenoteClasses {
        inline: config.sidenotes.inline_class.clone(),
        block: config.sidenotes.block_class.clone(),
    };

    PageRendererConfig {
        gfm: config.markdown.gfm,
        heading_ids: config.markdown.heading_ids,
        links_new_tab: config.markdown.links_new_tab,
        sidenotes: SidenoteProcessorConfig::new()
            .with_numbering(numbering)
            .with_classes(classes),
        math: config
            .math
            .enabled
            .then(|| MathWrapper::new().with_skip_code(config.math.skip_code)),
    }
}

/// Output paths for every source, rejecting sources that would overwrite
/// each other.
fn output_paths(dir: &Path, sources: &[PathBuf]) -> Result<Vec<PathBuf>, CliError> {
    let mut seen = HashSet::with_capacity(sources.len());
    let mut targets = Vec::with_capacity(sources.len());
    for source in sources {
        let target = output_path(dir, source)?;
        if !seen.insert(target.clone()) {
            return Err(CliError::Validation(format!(
                "{} would overwrite {}, rendered from an earlier file with the same name",
                source.display(),
                target.display()
            )));
        }
        targets.push(target);
    }
    Ok(targets)
}

/// `DIR/<stem>.html` for a markdown source.
fn output_path(dir: &Path, source: &Path) -> Result<PathBuf, CliError> {
    let stem = source.file_stem().ok_or_else(|| {
        CliError::Validation(format!("{} has no file name", source.display()))
    })?;
    let mut name = stem.to_os_string();
    name.push(".html");
    Ok(dir.join(name))
}
