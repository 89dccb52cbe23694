mod logger;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pdf_booklet::constants::{DEFAULT_RASTER_DPI, pt_to_mm};
use pdf_booklet::{BookletOptions, BookletStatistics, ProgressSink, RenderMode, SourceFile};
use std::path::PathBuf;

use crate::logger::StderrLogger;

#[derive(Parser)]
#[command(name = "booklet", about = "Turn PDFs into printable saddle-stitched booklets")]
struct Cli {
    /// More log output (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create booklet PDF(s) from one or more input PDFs
    Create {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Output PDF; split booklets get a `_part_N` suffix
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the effective options to this JSON file
        #[arg(long)]
        save_config: Option<PathBuf>,

        /// Directory containing the pdfium library
        #[cfg(feature = "pdfium")]
        #[arg(long)]
        pdfium_lib: Option<PathBuf>,
    },

    /// Print booklet statistics without writing anything
    Stats {
        #[command(flatten)]
        selection: SelectionArgs,
    },
}

#[derive(Args)]
struct SelectionArgs {
    /// Input PDF files, merged in the given order
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Pages of the merged document, e.g. "1-10, 15"
    #[arg(long)]
    range: Option<String>,

    /// Reading direction
    #[arg(long, value_enum)]
    direction: Option<DirectionArg>,

    /// Output paper size
    #[arg(long, value_enum)]
    paper: Option<PaperArg>,

    /// Custom paper width in millimetres
    #[arg(long, requires = "paper_height_mm", conflicts_with = "paper")]
    paper_width_mm: Option<f32>,

    /// Custom paper height in millimetres
    #[arg(long, requires = "paper_width_mm", conflicts_with = "paper")]
    paper_height_mm: Option<f32>,

    /// Output orientation
    #[arg(long, value_enum)]
    orientation: Option<OrientationArg>,

    /// Split into booklets of this many sheets each
    #[arg(long)]
    sheets_per_booklet: Option<usize>,

    /// Stamp page numbers below each page
    #[arg(long)]
    page_numbers: bool,

    /// Which number to stamp
    #[arg(long, value_enum)]
    number_style: Option<NumberStyleArg>,

    /// Password; once for all inputs, or once per input in order
    #[arg(long)]
    password: Vec<String>,

    /// Rasterize pages instead of embedding them
    #[arg(long)]
    raster: bool,

    /// Rasterization resolution; implies --raster
    #[arg(long)]
    raster_dpi: Option<u32>,

    /// Load options from a JSON file; flags override it
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum DirectionArg {
    Ltr,
    Rtl,
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    Auto,
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

#[derive(Clone, Copy, ValueEnum)]
enum NumberStyleArg {
    Merged,
    Source,
}

impl From<DirectionArg> for pdf_booklet::Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Ltr => Self::Ltr,
            DirectionArg::Rtl => Self::Rtl,
        }
    }
}

impl From<PaperArg> for pdf_booklet::PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::Auto => Self::Auto,
            PaperArg::A3 => Self::A3,
            PaperArg::A4 => Self::A4,
            PaperArg::A5 => Self::A5,
            PaperArg::Letter => Self::Letter,
            PaperArg::Legal => Self::Legal,
            PaperArg::Tabloid => Self::Tabloid,
        }
    }
}

impl From<OrientationArg> for pdf_booklet::Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Portrait => Self::Portrait,
            OrientationArg::Landscape => Self::Landscape,
        }
    }
}

impl From<NumberStyleArg> for pdf_booklet::NumberStyle {
    fn from(arg: NumberStyleArg) -> Self {
        match arg {
            NumberStyleArg::Merged => Self::Merged,
            NumberStyleArg::Source => Self::Source,
        }
    }
}

impl SelectionArgs {
    /// Sources and options, starting from `--config` when given
    async fn resolve(&self) -> Result<(Vec<SourceFile>, BookletOptions)> {
        let mut options = match &self.config {
            Some(path) => BookletOptions::load(path)
                .await
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => BookletOptions::default(),
        };

        if let Some(range) = &self.range {
            options.page_range = range.clone();
        }
        if let Some(direction) = self.direction {
            options.direction = direction.into();
        }
        if let Some(paper) = self.paper {
            options.paper_size = paper.into();
        }
        if let (Some(width_mm), Some(height_mm)) = (self.paper_width_mm, self.paper_height_mm) {
            options.paper_size = pdf_booklet::PaperSize::Custom {
                width_mm,
                height_mm,
            };
        }
        if let Some(orientation) = self.orientation {
            options.orientation = orientation.into();
        }
        if let Some(sheets) = self.sheets_per_booklet {
            options.split_booklet = true;
            options.sheets_per_booklet = sheets;
        }
        if self.page_numbers {
            options.add_page_numbers = true;
        }
        if let Some(style) = self.number_style {
            options.number_style = style.into();
        }
        if self.raster || self.raster_dpi.is_some() {
            let dpi = self.raster_dpi.unwrap_or(DEFAULT_RASTER_DPI);
            options.render_mode = RenderMode::Raster { dpi };
        }

        let mut sources: Vec<SourceFile> = self.inputs.iter().cloned().map(SourceFile::new).collect();
        match self.password.len() {
            0 => {}
            1 => options.password = self.password.first().cloned(),
            n if n == sources.len() => {
                for (source, password) in sources.iter_mut().zip(&self.password) {
                    source.password = Some(password.clone());
                }
            }
            n => bail!(
                "Got {} passwords for {} inputs; give one shared password or one per input",
                n,
                sources.len()
            ),
        }

        Ok((sources, options))
    }
}

/// Prints progress to stderr
struct TerminalProgress {
    quiet: bool,
}

impl ProgressSink for TerminalProgress {
    fn progress(&self, percent: u8) {
        log::debug!("Progress: {}%", percent);
    }

    fn status(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}", message);
        }
    }
}

fn print_statistics(stats: &BookletStatistics, options: &BookletOptions) {
    let (width_pt, height_pt) = options.output_size_pt();
    println!("Booklet Statistics:");
    println!("  Source pages: {}", stats.source_pages);
    println!("  Selected pages: {}", stats.selected_pages);
    println!("  Booklets: {}", stats.booklets);
    if stats.booklets > 1 {
        let sizes: Vec<String> = stats.pages_per_booklet.iter().map(usize::to_string).collect();
        println!("  Pages per booklet: {}", sizes.join(", "));
    }
    println!("  Output sheets: {}", stats.output_sheets);
    println!("  Output pages: {}", stats.output_pages);
    println!("  Blank pages added: {}", stats.blank_pages_added);
    println!(
        "  Sheet size: {:.0} x {:.0} mm",
        pt_to_mm(width_pt),
        pt_to_mm(height_pt)
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    StderrLogger::new(StderrLogger::level_for(cli.verbose, cli.quiet))
        .init()
        .context("Failed to install logger")?;

    match cli.command {
        Commands::Create {
            selection,
            output,
            save_config,
            #[cfg(feature = "pdfium")]
            pdfium_lib,
        } => {
            let (sources, mut options) = selection.resolve().await?;
            if let Some(output) = output {
                options.output_path = output;
            }
            options.validate()?;

            if let Some(path) = &save_config {
                options
                    .save(path)
                    .await
                    .with_context(|| format!("Failed to save config {}", path.display()))?;
                log::info!("Saved options to {}", path.display());
            }

            let progress = TerminalProgress { quiet: cli.quiet };

            #[cfg(feature = "pdfium")]
            let written = match pdfium_lib {
                Some(dir) => {
                    let rasterizer = std::sync::Arc::new(
                        pdf_booklet::PdfiumRasterizer::with_library_dir(dir),
                    );
                    pdf_booklet::create_booklet_with(&sources, &options, rasterizer, &progress)
                        .await?
                }
                None => pdf_booklet::create_booklet(&sources, &options, &progress).await?,
            };
            #[cfg(not(feature = "pdfium"))]
            let written = pdf_booklet::create_booklet(&sources, &options, &progress).await?;

            for path in &written {
                println!("Booklet → {}", path.display());
            }
        }

        Commands::Stats { selection } => {
            let (sources, options) = selection.resolve().await?;
            let stats = pdf_booklet::booklet_statistics(&sources, &options).await?;
            print_statistics(&stats, &options);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse_selection(args: &[&str]) -> SelectionArgs {
        let cli = Cli::try_parse_from(args.iter().copied()).unwrap();
        match cli.command {
            Commands::Stats { selection } => selection,
            Commands::Create { selection, .. } => selection,
        }
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[tokio::test]
    async fn test_flags_override_defaults() {
        let selection = parse_selection(&[
            "booklet",
            "stats",
            "a.pdf",
            "--range",
            "1-4",
            "--direction",
            "rtl",
            "--paper",
            "a3",
            "--orientation",
            "portrait",
            "--sheets-per-booklet",
            "3",
            "--page-numbers",
            "--number-style",
            "source",
            "--raster-dpi",
            "150",
        ]);
        let (sources, options) = selection.resolve().await.unwrap();

        assert_eq!(sources, vec![SourceFile::new("a.pdf")]);
        assert_eq!(options.page_range, "1-4");
        assert_eq!(options.direction, pdf_booklet::Direction::Rtl);
        assert_eq!(options.paper_size, pdf_booklet::PaperSize::A3);
        assert_eq!(options.chunk_sheets(), Some(3));
        assert!(options.add_page_numbers);
        assert_eq!(options.number_style, pdf_booklet::NumberStyle::Source);
        assert_eq!(options.render_mode, RenderMode::Raster { dpi: 150 });
    }

    #[tokio::test]
    async fn test_raster_uses_default_dpi() {
        let selection = parse_selection(&["booklet", "create", "a.pdf", "--raster"]);
        let (_, options) = selection.resolve().await.unwrap();
        assert_eq!(
            options.render_mode,
            RenderMode::Raster {
                dpi: DEFAULT_RASTER_DPI
            }
        );
    }

    #[tokio::test]
    async fn test_custom_paper() {
        let selection = parse_selection(&[
            "booklet",
            "stats",
            "a.pdf",
            "--paper-width-mm",
            "100",
            "--paper-height-mm",
            "200",
        ]);
        let (_, options) = selection.resolve().await.unwrap();
        assert_eq!(
            options.paper_size,
            pdf_booklet::PaperSize::Custom {
                width_mm: 100.0,
                height_mm: 200.0
            }
        );
    }

    #[tokio::test]
    async fn test_single_password_is_shared() {
        let selection =
            parse_selection(&["booklet", "stats", "a.pdf", "b.pdf", "--password", "x"]);
        let (sources, options) = selection.resolve().await.unwrap();
        assert_eq!(options.password.as_deref(), Some("x"));
        assert!(sources.iter().all(|s| s.password.is_none()));
    }

    #[tokio::test]
    async fn test_passwords_match_inputs() {
        let selection = parse_selection(&[
            "booklet", "stats", "a.pdf", "b.pdf", "--password", "x", "--password", "y",
        ]);
        let (sources, options) = selection.resolve().await.unwrap();
        assert!(options.password.is_none());
        assert_eq!(sources[0].password.as_deref(), Some("x"));
        assert_eq!(sources[1].password.as_deref(), Some("y"));
    }

    #[tokio::test]
    async fn test_password_count_mismatch() {
        let selection = parse_selection(&[
            "booklet", "stats", "a.pdf", "b.pdf", "c.pdf", "--password", "x", "--password", "y",
        ]);
        assert!(selection.resolve().await.is_err());
    }
}
