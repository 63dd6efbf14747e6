//! Drives one page: the first dispatch, then optional line-by-line search input.

use std::io::Write;

use anyhow::Context;
use client_core::{ListController, ViewEvent};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    sync::broadcast::{self, error::RecvError},
    task::JoinHandle,
};
use tracing::debug;

use crate::render::{loading_message, render_view, Tabular};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageMode {
    List,
    Search(String),
    Refresh,
}

#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Quit,
    Refresh,
    Search(&'a str),
}

impl<'a> Input<'a> {
    fn parse(line: &'a str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        match line.trim() {
            ":quit" | ":q" => Self::Quit,
            ":refresh" => Self::Refresh,
            _ => Self::Search(line),
        }
    }
}

pub async fn run_page<E, R, W>(
    controller: &ListController<E>,
    mode: PageMode,
    input: Option<R>,
    out: &mut W,
) -> anyhow::Result<()>
where
    E: Tabular,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let indicator = spawn_loading_indicator(controller.subscribe());
    let result = drive(controller, mode, input, out).await;
    indicator.abort();
    result
}

async fn drive<E, R, W>(
    controller: &ListController<E>,
    mode: PageMode,
    input: Option<R>,
    out: &mut W,
) -> anyhow::Result<()>
where
    E: Tabular,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    match &mode {
        PageMode::List => controller.load_all().await,
        PageMode::Search(term) => controller.search(term).await,
        PageMode::Refresh => controller.refresh().await,
    };
    render_current(controller, out).await?;

    let Some(input) = input else {
        return Ok(());
    };

    writeln!(
        out,
        "Search {} (empty line lists all, :refresh reloads, :quit exits)",
        E::KIND.plural()
    )?;
    out.flush()?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.context("failed to read input")? {
        let command = Input::parse(&line);
        debug!(kind = %E::KIND, ?command, "input");
        match command {
            Input::Quit => break,
            Input::Refresh => controller.refresh().await,
            Input::Search(term) => controller.search(term).await,
        };
        writeln!(out)?;
        render_current(controller, out).await?;
        out.flush()?;
    }
    Ok(())
}

async fn render_current<E: Tabular, W: Write>(
    controller: &ListController<E>,
    out: &mut W,
) -> anyhow::Result<()> {
    let state = controller.snapshot().await;
    render_view(&state.view(), out).context("failed to write view")
}

fn spawn_loading_indicator(mut events: broadcast::Receiver<ViewEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(ViewEvent::Started { kind, .. }) => eprintln!("{}", loading_message(kind)),
                Ok(_) | Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => break,
            }
        }
    })
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
