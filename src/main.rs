use clap::Parser;

use web_pad::app::{Cli, CodeDocumentKind, run};

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(CodeDocumentKind, cli) {
        tracing::error!("{}", e);
        eprintln!("WebPad: {}", e);
        std::process::exit(1);
    }
}
