// Native binary for Pinboard - Terminal UI mode

use anyhow::{bail, Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    io,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

use pinboard::{
    api::{CollectionApi, HttpCollectionClient, InMemoryCollection},
    app::App,
    camera::FileCamera,
    config::{load, Config},
    device::{DeviceMetrics, DeviceMetricsSource},
    router::Route,
    screens::{Action, ActiveScreen, Services},
    snapshot,
    types::{AppEvent, BoardKind},
    ui,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (safe to ignore if not found)
    let _ = dotenvy::dotenv();

    let cfg = load().context("Failed to load configuration")?;

    // stderr shares the terminal with the UI, so stay quiet unless RUST_LOG asks
    let default_level = if cfg.snapshot { "warn" } else { "off" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
    cfg.print_summary();

    let api = build_api(&cfg)?;

    if cfg.snapshot {
        return run_snapshot(api.as_ref()).await;
    }

    // terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let (cols, rows) = terminal::size()?;
    let device = DeviceMetricsSource::new(DeviceMetrics::from_cells(cols, rows));

    // app + channels
    let (tx, rx) = unbounded_channel::<AppEvent>();
    let camera = Arc::new(FileCamera::new(cfg.capture_path.clone()));
    let services = Services::new(api, camera, device, cfg.screen_settings(), &tx);
    let mut app = App::new(services, tx, cfg.start_route.clone(), cfg.render_fps);

    // main loop
    let result = run_loop(&mut app, &mut terminal, rx).await;

    // cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    result
}

fn build_api(cfg: &Config) -> Result<Arc<dyn CollectionApi>> {
    if cfg.demo {
        return Ok(Arc::new(InMemoryCollection::demo()));
    }
    let client = HttpCollectionClient::new(cfg.http_settings())
        .context("Failed to build HTTP client")?;
    Ok(Arc::new(client))
}

async fn run_snapshot(api: &dyn CollectionApi) -> Result<()> {
    let device = match terminal::size() {
        Ok((cols, rows)) => DeviceMetrics::from_cells(cols, rows),
        Err(_) => DeviceMetrics::default(),
    };
    let snap = snapshot::fetch_snapshot(api, device.class()).await;
    println!("{}", snap.to_json().context("Failed to encode snapshot")?);
    if snap.all_failed() {
        bail!("every board failed to load");
    }
    Ok(())
}

async fn run_loop(
    app: &mut App,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut rx: UnboundedReceiver<AppEvent>,
) -> Result<()> {
    let mut last_frame = Instant::now();

    loop {
        // frame budget (coalesced renders)
        let frame_ms = 1000u32.saturating_div(app.fps()) as u64;
        let budget = Duration::from_millis(frame_ms.max(1));
        let wait = budget.saturating_sub(last_frame.elapsed());

        // input or async results
        if event::poll(wait)? {
            match event::read()? {
                Event::Key(k) => {
                    if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat {
                        if let Some(action) = map_key(app, k) {
                            app.handle_action(action);
                        }
                    }
                }
                Event::Resize(cols, rows) => {
                    app.device().update(DeviceMetrics::from_cells(cols, rows));
                }
                _ => {}
            }
        }
        while let Ok(ev) = rx.try_recv() {
            app.handle_event(ev);
        }

        if last_frame.elapsed() >= budget {
            terminal.draw(|f| ui::draw(f, app))?;
            last_frame = Instant::now();
        }
        if app.quit_flag() {
            break;
        }
    }
    Ok(())
}

fn map_key(app: &App, k: KeyEvent) -> Option<Action> {
    let confirming = matches!(app.screen(), ActiveScreen::Details(s) if s.confirm_remove_visible());
    let action = match k.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Esc if confirming => Action::Cancel,
        KeyCode::Esc | KeyCode::Backspace => Action::Back,
        KeyCode::Up | KeyCode::Char('k') => Action::Up,
        KeyCode::Down | KeyCode::Char('j') => Action::Down,
        KeyCode::Left | KeyCode::Char('h') => Action::Left,
        KeyCode::Right | KeyCode::Char('l') => Action::Right,
        KeyCode::Enter => Action::Open,
        KeyCode::Char('r') => Action::Retry,
        KeyCode::Char('d') => Action::Remove,
        KeyCode::Char('y') => Action::Confirm,
        KeyCode::Char('n') => Action::Cancel,
        KeyCode::Char('1') => Action::MoveTo(BoardKind::MyBoard),
        KeyCode::Char('2') => Action::MoveTo(BoardKind::Wishlist),
        KeyCode::Char('3') => Action::MoveTo(BoardKind::Trading),
        KeyCode::Char('c') => Action::Capture,
        KeyCode::Char('p') => Action::RequestPermission,
        KeyCode::Char('s') => Action::Go(Route::Scanning),
        KeyCode::Char('b') => Action::Go(Route::Boards),
        KeyCode::Char('m') => Action::Go(Route::Board(BoardKind::MyBoard)),
        _ => return None,
    };
    Some(action)
}
