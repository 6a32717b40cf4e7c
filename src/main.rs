use anyhow::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use drilldown_map::app::{App, View};
use drilldown_map::news::{self, NewsRequest, NewsUpdate};
use drilldown_map::{data, ui};
use ratatui::DefaultTerminal;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

fn main() -> Result<()> {
    // Environment first: .env for the news API key, optional data dir override
    let _ = dotenvy::dotenv();
    let data_dir = std::env::var("DRILLDOWN_DATA_DIR").unwrap_or_else(|_| "data".to_string());
    let api_key = std::env::var("GNEWS_API_KEY").ok();

    // Load assets before touching the terminal so load warnings stay readable
    let assets = data::load_all(Path::new(&data_dir));

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    // Enable mouse capture
    execute!(std::io::stdout(), EnableMouseCapture)?;

    // Run the app
    let result = run(&mut terminal, assets, api_key);

    // Disable mouse capture and restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// News channel endpoints held by the event loop; absent when no API key is
/// configured, in which case no requests are ever issued.
struct NewsChannel {
    requests: Sender<NewsRequest>,
    updates: Receiver<NewsUpdate>,
}

fn run(
    terminal: &mut DefaultTerminal,
    assets: data::LoadedAssets,
    api_key: Option<String>,
) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(size.width, size.height, assets);

    let channel = match api_key {
        Some(key) => {
            let (req_tx, req_rx) = mpsc::channel();
            let (update_tx, update_rx) = mpsc::channel();
            news::spawn_worker(key, req_rx, update_tx);
            Some(NewsChannel {
                requests: req_tx,
                updates: update_rx,
            })
        }
        None => {
            app.news.status = "Set GNEWS_API_KEY to enable live headlines.".to_string();
            None
        }
    };

    // The initial national view gets its projection in App::new; issue its fetch
    if let Some(view) = app.startup_fetch() {
        dispatch_fetch(&channel, &mut app, view);
    }

    // Main loop
    loop {
        // Apply completed fetches; stale tags are discarded inside apply_news
        if let Some(channel) = &channel {
            while let Ok(update) = channel.updates.try_recv() {
                app.apply_news(update);
            }
        }

        // Draw
        terminal.draw(|frame| ui::render(frame, &app))?;

        // Handle events with ~60fps target
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events (not release)
                    if key.kind == KeyEventKind::Press {
                        match key.code {
                            KeyCode::Char('q') | KeyCode::Esc => app.quit(),
                            _ => {}
                        }
                    }
                }
                Event::Mouse(mouse) => {
                    handle_mouse(&mut app, mouse, &channel);
                }
                Event::Resize(width, height) => {
                    app.resize(width, height);
                }
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Track hover position; a left click drives the view transition
fn handle_mouse(app: &mut App, mouse: MouseEvent, channel: &Option<NewsChannel>) {
    app.set_mouse_pos(mouse.column, mouse.row);

    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
        if let Some(view) = app.pointer_down(mouse.column as f64, mouse.row as f64) {
            dispatch_fetch(channel, app, view);
        }
    }
}

fn dispatch_fetch(channel: &Option<NewsChannel>, app: &mut App, view: View) {
    if let Some(channel) = channel {
        app.news.begin_fetch();
        let _ = channel.requests.send(NewsRequest { view });
    }
}
