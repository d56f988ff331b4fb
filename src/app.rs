//! Run modes - interactive gallery and one-shot rendering
//!
//! The gallery loop is the only code that touches gallery state or the
//! screen. Keyboard input and terminal signals each run on their own thread
//! and reach it as [`AppEvent`]s over one channel, so redraws never overlap.

use crate::cli::{Mode, RenderItem};
use crate::event::{AppEvent, InputDriver};
use crate::gallery::{Flow, Gallery, GalleryConfig};
use crate::render::Renderer;
use crate::source::ImageSource;
use crate::terminal::{SignalListener, TerminalSession, Viewport};
use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;
use std::sync::mpsc::{self, Receiver};
use std::thread;

pub fn run(mode: Mode) -> Result<ExitCode> {
    match mode {
        Mode::Gallery { dir } => run_gallery(dir.as_deref()),
        Mode::Render(items) => run_render(&items),
    }
}

/// Browse the images in `dir` (or the current directory) until quit
///
/// Setup failures (unreadable directory, no images, no terminal size) are
/// reported before the terminal is touched. Anything failing after that
/// still leaves through [`TerminalSession::leave`].
pub fn run_gallery(dir: Option<&Path>) -> Result<ExitCode> {
    let mut gallery = open_gallery(dir)?;
    Viewport::query()?;

    let session = TerminalSession::enter()?;
    let outcome = run_session(&mut gallery);
    session.leave();
    outcome
}

fn open_gallery(dir: Option<&Path>) -> crate::error::Result<Gallery> {
    Gallery::load(dir.unwrap_or(Path::new(".")), GalleryConfig::default())
}

fn run_session(gallery: &mut Gallery) -> Result<ExitCode> {
    let (tx, rx) = mpsc::channel();
    let _signals =
        SignalListener::spawn(tx.clone()).context("could not listen for terminal signals")?;
    thread::Builder::new()
        .name("sketch-input".to_string())
        .spawn(move || InputDriver::new(io::stdin().lock()).pump(tx))
        .context("could not start input reader")?;

    let mut screen = Renderer::stdout();
    event_loop(gallery, rx, &mut screen, Viewport::query)
}

/// Draw the gallery, then apply events and redraw until quit or input ends
///
/// Resize events redraw from the held image without touching the disk.
/// `viewport` is asked for the current size before every frame.
pub fn event_loop<W, V>(
    gallery: &mut Gallery,
    events: Receiver<AppEvent>,
    screen: &mut Renderer<W>,
    mut viewport: V,
) -> Result<ExitCode>
where
    W: Write,
    V: FnMut() -> crate::error::Result<Viewport>,
{
    gallery.redraw(screen, viewport()?)?;

    for event in events {
        match event {
            AppEvent::Key(command) => {
                if gallery.handle(command)? == Flow::Quit {
                    break;
                }
            }
            AppEvent::Resize => log::debug!("terminal resized"),
            AppEvent::InputClosed => {
                log::debug!("input closed, leaving gallery");
                break;
            }
            AppEvent::Terminate(signal) => {
                return Ok(ExitCode::from(128u8.wrapping_add(signal as u8)));
            }
        }
        gallery.redraw(screen, viewport()?)?;
    }

    Ok(ExitCode::SUCCESS)
}

/// Render each image in order at the scale set by the flags before it
///
/// A file that fails to open or decode is reported and skipped; the exit
/// code is 1 if any did.
pub fn run_render(items: &[RenderItem]) -> Result<ExitCode> {
    if items.iter().any(|item| matches!(item, RenderItem::Image(_))) {
        Viewport::query()?;
    }

    let mut screen = Renderer::stdout();
    let all_ok = render_items(items, &mut screen, Viewport::query, &mut io::stderr())?;

    Ok(if all_ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Draw `items` to `screen`, reporting unreadable files to `errors`
///
/// Each drawn image is followed by a blank line when more than one image is
/// listed. Returns false if any image failed to load.
pub fn render_items<W, V, E>(
    items: &[RenderItem],
    screen: &mut Renderer<W>,
    mut viewport: V,
    errors: &mut E,
) -> Result<bool>
where
    W: Write,
    V: FnMut() -> crate::error::Result<Viewport>,
    E: Write,
{
    let image_count = items
        .iter()
        .filter(|item| matches!(item, RenderItem::Image(_)))
        .count();
    let mut source = ImageSource::new(1.0);
    let mut failures = 0;

    for item in items {
        let path = match item {
            RenderItem::Scale(scale) => {
                source.set_scale(*scale);
                continue;
            }
            RenderItem::Image(path) => path,
        };

        if let Err(err) = source.load(path) {
            let cause = std::error::Error::source(&err)
                .map(|s| s.to_string())
                .unwrap_or_else(|| err.to_string());
            writeln!(errors, "error opening image: {}: {}", path.display(), cause)?;
            failures += 1;
            continue;
        }

        source.render_to(screen.writer(), viewport()?)?;
        if image_count > 1 {
            screen.write_text("\n")?;
        }
        screen.flush()?;
    }

    if failures > 0 {
        log::debug!("{} of {} images failed", failures, image_count);
    }
    Ok(failures == 0)
}
