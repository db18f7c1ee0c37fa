//! Command drivers: catalog generation and headless sessions

use crate::cli::CliCommand;
use anyhow::{anyhow, bail, Context, Result};
use app_core::{
    AppConfig, FileFetcher, History, InputEvent, MemoryHistory, Navigator, RecordingRenderer,
    Route, Session, SwipeDirection, ViewState,
};
use std::path::{Path, PathBuf};

type HeadlessSession = Session<RecordingRenderer, MemoryHistory>;

pub async fn run(command: CliCommand, config: &AppConfig) -> Result<()> {
    match command {
        CliCommand::Generate {
            source,
            out,
            pages,
            no_pages,
        } => generate(config, source, out, pages, no_pages),
        CliCommand::Resolve {
            url,
            catalog,
            redirect,
        } => resolve(config, &url, catalog.as_deref(), redirect).await,
        CliCommand::Replay {
            script,
            catalog,
            url,
        } => replay(config, &script, catalog.as_deref(), url).await,
    }
}

fn generate(
    config: &AppConfig,
    source: Option<PathBuf>,
    out: Option<PathBuf>,
    pages: Option<PathBuf>,
    no_pages: bool,
) -> Result<()> {
    let mut generator = config.generator.clone();
    if let Some(source) = source {
        generator.source_dir = source;
    }
    if let Some(out) = out {
        generator.output = out;
    }
    if let Some(pages) = pages {
        generator.pages_dir = pages;
    }

    let scan = generator.scan_options();
    let images = app_fs::scan_images(&scan)
        .with_context(|| format!("scanning {}", scan.root.display()))?;
    let catalog = app_fs::build_catalog(&images, &scan, &generator.category_names());

    app_fs::write_catalog(&generator.output, &catalog)
        .with_context(|| format!("writing {}", generator.output.display()))?;

    let total: usize = catalog.iter().map(|c| c.images.len()).sum();
    println!(
        "Wrote {} images in {} categories to {}",
        total,
        catalog.len(),
        generator.output.display()
    );
    for category in &catalog {
        println!("  {}: {} images", category.display_name, category.images.len());
    }

    if !no_pages {
        let options = generator.page_options(&config.general.site_title, Path::new("."));
        let count = app_fs::write_share_pages(&generator.pages_dir, &catalog, &options)
            .with_context(|| format!("writing share pages to {}", generator.pages_dir.display()))?;
        println!("Wrote {} share pages to {}", count, generator.pages_dir.display());
    }
    Ok(())
}

async fn resolve(
    config: &AppConfig,
    url: &str,
    catalog: Option<&Path>,
    redirect: Option<String>,
) -> Result<()> {
    let session = start_session(config, url, catalog, redirect).await?;
    let nav = ready(&session)?;

    println!("{}", describe(nav));
    println!("{}", nav.current_url());
    Ok(())
}

async fn replay(
    config: &AppConfig,
    script: &Path,
    catalog: Option<&Path>,
    url: Option<String>,
) -> Result<()> {
    let text = std::fs::read_to_string(script)
        .with_context(|| format!("reading {}", script.display()))?;
    let steps = parse_script(&text, config.navigation.swipe_threshold_px)?;

    let start = url.unwrap_or_else(|| config.routing.codec().format(&Route::Home));
    let mut session = start_session(config, &start, catalog, None).await?;
    ready(&session)?;

    for line in run_steps(&mut session, &steps) {
        println!("{}", line);
    }
    Ok(())
}

/// Boot a session at `url` against a catalog file
async fn start_session(
    config: &AppConfig,
    url: &str,
    catalog: Option<&Path>,
    redirect: Option<String>,
) -> Result<HeadlessSession> {
    let (fetcher, catalog_url) = match catalog {
        Some(path) => {
            let name = path
                .file_name()
                .ok_or_else(|| anyhow!("not a catalog file: {}", path.display()))?;
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            (FileFetcher::new(dir), name.to_string_lossy().into_owned())
        }
        None => (FileFetcher::new("."), config.general.catalog_url.clone()),
    };

    let session = Session::new(config, RecordingRenderer::new(), MemoryHistory::new(url))
        .with_redirect(redirect)
        .load(&fetcher, &catalog_url)
        .await;
    Ok(session)
}

fn ready(session: &HeadlessSession) -> Result<&Navigator<RecordingRenderer, MemoryHistory>> {
    if let Some(error) = session.error() {
        bail!("{}", error.user_message());
    }
    session
        .navigator()
        .ok_or_else(|| anyhow!("session is still loading"))
}

/// One line of a replay script
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptStep {
    Events(Vec<InputEvent>),
    Back,
    Forward,
}

/// Parse a replay script; blank lines and `#` comments are skipped
pub fn parse_script(text: &str, swipe_threshold: f32) -> Result<Vec<(String, ScriptStep)>> {
    let mut steps = Vec::new();

    for (number, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let step = parse_step(line, swipe_threshold)
            .with_context(|| format!("line {}: {}", number + 1, line))?;
        steps.push((line.to_string(), step));
    }
    Ok(steps)
}

fn parse_step(line: &str, swipe_threshold: f32) -> Result<ScriptStep> {
    let (word, arg) = match line.split_once(char::is_whitespace) {
        Some((word, arg)) => (word, Some(arg.trim())),
        None => (line, None),
    };
    let required = || arg.filter(|a| !a.is_empty()).ok_or_else(|| anyhow!("{} needs an argument", word));
    let index = || -> Result<usize> {
        let value = required()?;
        value.parse().map_err(|_| anyhow!("invalid index: {}", value))
    };

    let event = match word {
        "click-category" => InputEvent::CategoryClicked {
            category_id: required()?.to_string(),
        },
        "click-image" => InputEvent::ImageClicked { index: index()? },
        "thumb" => InputEvent::ThumbnailClicked { index: index()? },
        "key" => InputEvent::Key {
            key: required()?.to_string(),
        },
        "swipe" => {
            let direction = match required()? {
                "left" => SwipeDirection::Left,
                "right" => SwipeDirection::Right,
                other => bail!("unknown swipe direction: {}", other),
            };
            return Ok(ScriptStep::Events(swipe_events(direction, swipe_threshold)));
        }
        "close" => InputEvent::CloseRequested,
        "overlay" => InputEvent::LightboxClicked { on_content: false },
        "next" => InputEvent::NextClicked,
        "prev" => InputEvent::PrevClicked,
        "home" => InputEvent::HomeRequested,
        "back" => return Ok(ScriptStep::Back),
        "forward" => return Ok(ScriptStep::Forward),
        other => bail!("unknown step: {}", other),
    };
    Ok(ScriptStep::Events(vec![event]))
}

/// Touch pair travelling just past the threshold
fn swipe_events(direction: SwipeDirection, threshold: f32) -> Vec<InputEvent> {
    let start = 1000.0;
    let travel = threshold + 1.0;
    let end = match direction {
        SwipeDirection::Left => start - travel,
        SwipeDirection::Right => start + travel,
    };
    vec![InputEvent::TouchStart { x: start }, InputEvent::TouchEnd { x: end }]
}

/// Apply the steps, returning one report line per step
fn run_steps(session: &mut HeadlessSession, steps: &[(String, ScriptStep)]) -> Vec<String> {
    let mut report = Vec::with_capacity(steps.len());

    for (n, (line, step)) in steps.iter().enumerate() {
        let events = match step {
            ScriptStep::Events(events) => events.clone(),
            ScriptStep::Back => session
                .history_mut()
                .back()
                .map(|url| vec![InputEvent::PopState { url }])
                .unwrap_or_default(),
            ScriptStep::Forward => session
                .history_mut()
                .forward()
                .map(|url| vec![InputEvent::PopState { url }])
                .unwrap_or_default(),
        };

        for event in events {
            if let Err(e) = session.handle(event) {
                tracing::warn!("Step {} ({}) failed: {}", n + 1, line, e);
            }
        }

        let history = session.history();
        let view = session.navigator().map(describe).unwrap_or_default();
        report.push(format!(
            "{:>3}  {:<24} {:<28} {}  [{}/{}]",
            n + 1,
            line,
            view,
            history.current_url(),
            history.depth(),
            history.len()
        ));
    }
    report
}

/// Short description of the current view
fn describe(nav: &Navigator<RecordingRenderer, MemoryHistory>) -> String {
    match nav.state() {
        ViewState::CategoryList => format!("categories ({})", nav.cards().len()),
        ViewState::Gallery { selection } => format!(
            "gallery {} ({} images)",
            selection.category_id().unwrap_or("*"),
            selection.len()
        ),
        ViewState::Lightbox { selection, index } => {
            let name = selection.get(*index).map(|i| i.name.as_str()).unwrap_or("?");
            format!(
                "lightbox {}/{} [{}/{}]",
                selection.category_id().unwrap_or("*"),
                name,
                index + 1,
                selection.len()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use app_core::ViewKind;

    const CATALOG: &str = r#"[
        {"category": "vyakti", "displayName": "Personalities", "images": [
            {"path": "phalakimages/vyakti/a.jpg", "name": "a", "filename": "a.jpg"},
            {"path": "phalakimages/vyakti/b.jpg", "name": "b", "filename": "b.jpg"}
        ]}
    ]"#;

    #[test]
    fn test_parse_script() {
        let steps = parse_script(
            "# open a category\nclick-category vyakti\n\nclick-image 1\nswipe left\nback\n",
            50.0,
        )
        .unwrap();

        assert_eq!(steps.len(), 4);
        assert_eq!(
            steps[0].1,
            ScriptStep::Events(vec![InputEvent::CategoryClicked { category_id: "vyakti".into() }])
        );
        assert_eq!(
            steps[2].1,
            ScriptStep::Events(vec![
                InputEvent::TouchStart { x: 1000.0 },
                InputEvent::TouchEnd { x: 949.0 },
            ])
        );
        assert_eq!(steps[3].1, ScriptStep::Back);
    }

    #[test]
    fn test_parse_script_errors() {
        assert!(parse_script("click-image x", 50.0).is_err());
        assert!(parse_script("click-category", 50.0).is_err());
        assert!(parse_script("swipe up", 50.0).is_err());
        assert!(parse_script("teleport", 50.0).is_err());
    }

    #[tokio::test]
    async fn test_replay_against_catalog_file() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = dir.path().join("images.json");
        std::fs::write(&catalog, CATALOG).unwrap();

        let config = AppConfig::default();
        let mut session = start_session(&config, "/phalakpages/", Some(&catalog), None)
            .await
            .unwrap();
        let steps = parse_script("click-category vyakti\nclick-image 1\nnext\nclose\nback", 50.0).unwrap();
        let report = run_steps(&mut session, &steps);

        assert_eq!(report.len(), 5);
        assert!(report[1].contains("lightbox vyakti/b [2/2]"));
        assert!(report[2].contains("/phalakpages/image/vyakti/a"));

        let nav = session.navigator().unwrap();
        assert_eq!(nav.view_kind(), ViewKind::Lightbox);
        assert_eq!(nav.active_index(), Some(0));
    }

    #[tokio::test]
    async fn test_missing_catalog_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::default();
        let session = start_session(&config, "/phalakpages/", Some(&dir.path().join("none.json")), None)
            .await
            .unwrap();

        assert!(ready(&session).is_err());
    }
}
