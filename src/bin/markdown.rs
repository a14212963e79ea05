use clap::Parser;

use web_pad::app::{Cli, MarkdownDocumentKind, run};

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(MarkdownDocumentKind, cli) {
        tracing::error!("{}", e);
        eprintln!("WebPadMarkdown: {}", e);
        std::process::exit(1);
    }
}
