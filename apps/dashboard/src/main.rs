mod config;
mod render;
mod session;

use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use client_core::{ApiClient, ListController};
use shared::{
    domain::{Bus, Garage},
    protocol::PageRequest,
};
use tokio::io::{stdin, BufReader};
use tracing::info;

use crate::{
    render::Tabular,
    session::{run_page, PageMode},
};

/// Terminal dashboard for the garage and bus tracking API.
#[derive(Parser, Debug)]
#[command(name = "dashboard")]
struct Cli {
    /// Base URL of the API, e.g. http://127.0.0.1:8080/api
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Page size sent with list and search requests (1-20).
    #[arg(long, global = true)]
    page_size: Option<u32>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List or search garages.
    Garages(PageArgs),
    /// List or search buses.
    Buses(PageArgs),
    /// Ask the server to reload a dataset and show the result.
    Refresh {
        #[arg(value_enum)]
        kind: KindArg,
    },
}

#[derive(Args, Debug)]
struct PageArgs {
    #[arg(long)]
    search: Option<String>,
    /// Read search terms from stdin, one per line.
    #[arg(short, long)]
    interactive: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    Garages,
    Buses,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = config::load_settings();
    if let Some(url) = cli.api_url {
        settings.api_base_url = url;
    }
    if let Some(size) = cli.page_size {
        settings.page_size = size;
    }

    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.as_str())
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = cli.command else {
        render::render_home(&mut std::io::stdout())?;
        return Ok(());
    };

    let base_url = config::normalize_api_base_url(&settings.api_base_url)?;
    let page = PageRequest::new(0, config::clamp_page_size(settings.page_size));
    info!(%base_url, size = page.size, "dashboard starting");
    let api = Arc::new(ApiClient::new(base_url)?);

    match command {
        Command::Garages(args) => run::<Garage>(api, page, page_mode(&args), args.interactive).await,
        Command::Buses(args) => run::<Bus>(api, page, page_mode(&args), args.interactive).await,
        Command::Refresh { kind: KindArg::Garages } => {
            run::<Garage>(api, page, PageMode::Refresh, false).await
        }
        Command::Refresh { kind: KindArg::Buses } => {
            run::<Bus>(api, page, PageMode::Refresh, false).await
        }
    }
}

fn page_mode(args: &PageArgs) -> PageMode {
    match &args.search {
        Some(term) => PageMode::Search(term.clone()),
        None => PageMode::List,
    }
}

async fn run<E: Tabular>(
    api: Arc<ApiClient>,
    page: PageRequest,
    mode: PageMode,
    interactive: bool,
) -> Result<()> {
    let controller = ListController::<E>::with_page(api, page);
    let input = interactive.then(|| BufReader::new(stdin()));
    run_page(&controller, mode, input, &mut std::io::stdout()).await
}
