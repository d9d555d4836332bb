use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use async_trait::async_trait;
use clap::{Args, Parser, Subcommand};

use svged::{
    Command, Document, DocumentId, EditorHost, Optimizer, Settings, SvgedError, XmlEngine,
    dispatch, resolve_layers,
};

#[derive(Parser)]
#[command(name = "svged")]
#[command(about = "Minify or prettify SVG files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Minify SVG files in place
    Minify(IoArgs),
    /// Prettify SVG files in place
    Prettify(IoArgs),
}

#[derive(Args)]
struct IoArgs {
    /// Input files, rewritten in place (use - for stdin -> stdout)
    #[arg(default_value = "-")]
    files: Vec<PathBuf>,

    /// Indentation width when prettifying
    #[arg(short, long)]
    indent: Option<u8>,

    /// Write long closing tags instead of <elem/>
    #[arg(long)]
    no_short_tags: bool,

    /// Project config file (defaults to svgo.toml in the current directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print size comparison per file
    #[arg(short, long)]
    stats: bool,
}

impl IoArgs {
    fn settings(&self) -> Settings {
        Settings {
            indent: self.indent,
            use_short_tags: if self.no_short_tags { Some(false) } else { None },
            ..Settings::default()
        }
    }
}

/// An [`EditorHost`] over plain files, so the CLI runs the exact pipeline
/// an editor embedding would: every file argument is an open document and
/// writes go straight back to disk.
struct FileHost {
    documents: Vec<Document>,
    settings: Settings,
    config_path: Option<PathBuf>,
    stats: bool,
}

impl FileHost {
    fn new(files: &[PathBuf], args: &IoArgs) -> FileHost {
        let documents = files
            .iter()
            .map(|path| {
                let name = path.to_string_lossy().into_owned();
                Document {
                    id: DocumentId(name.clone()),
                    // files get the generic markup tag an editor would assign
                    language_id: "xml".to_string(),
                    file_name: name,
                }
            })
            .collect();
        FileHost {
            documents,
            settings: args.settings(),
            config_path: args.config.clone(),
            stats: args.stats,
        }
    }

    /// Files that were passed but never matched the selector.
    fn skipped(&self) -> Vec<String> {
        self.documents
            .iter()
            .filter(|doc| !svged::is_svg_document(doc))
            .map(|doc| doc.file_name.clone())
            .collect()
    }
}

#[async_trait(?Send)]
impl EditorHost for FileHost {
    fn active_document(&self) -> Option<Document> {
        self.documents.first().cloned()
    }

    fn open_documents(&self) -> Vec<Document> {
        self.documents.clone()
    }

    fn document_text(&self, id: &DocumentId) -> Result<String, SvgedError> {
        Ok(fs::read_to_string(id.as_str())?)
    }

    fn workspace_root(&self) -> Option<PathBuf> {
        std::env::current_dir().ok()
    }

    fn configuration(&self) -> Settings {
        self.settings.clone()
    }

    fn project_config_path(&self) -> Option<PathBuf> {
        match &self.config_path {
            Some(path) => Some(path.clone()),
            None => self
                .workspace_root()
                .map(|root| root.join(svged::PROJECT_CONFIG_FILE)),
        }
    }

    async fn show_document(&self, _id: &DocumentId) -> Result<(), SvgedError> {
        Ok(())
    }

    async fn set_text(&self, id: &DocumentId, text: &str) -> Result<(), SvgedError> {
        if self.stats {
            let before = fs::metadata(id.as_str()).map(|m| m.len()).unwrap_or(0);
            eprintln!("{}: {} -> {} bytes", id.as_str(), before, text.len());
        }
        fs::write(id.as_str(), text)?;
        Ok(())
    }

    fn notify(&self, message: &str) {
        log::info!("{message}");
    }
}

fn run_stdin(args: &IoArgs, pretty: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;

    let project_file = args
        .config
        .clone()
        .or_else(|| Some(PathBuf::from(svged::PROJECT_CONFIG_FILE)));
    let options = resolve_layers(&args.settings(), project_file.as_deref(), pretty);
    let output = XmlEngine.optimize(&input, &options)?;

    io::stdout().write_all(output.as_bytes())?;
    if args.stats {
        eprintln!("stdin: {} -> {} bytes", input.len(), output.len());
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let (args, command) = match &cli.command {
        CliCommand::Minify(args) => (args, Command::MinifyAll),
        CliCommand::Prettify(args) => (args, Command::PrettifyAll),
    };

    let stdin_mode = args.files.iter().any(|f| f.as_os_str() == "-");
    if stdin_mode {
        if args.files.len() > 1 {
            return Err("cannot mix - with file arguments".into());
        }
        return run_stdin(args, command == Command::PrettifyAll);
    }

    let host = FileHost::new(&args.files, args);
    dispatch(&host, &XmlEngine, command).await?;

    for name in host.skipped() {
        eprintln!("skipped {name}: not an .svg file");
    }
    Ok(())
}
