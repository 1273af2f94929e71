use std::io;
use std::sync::Arc;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::*;

use sportx_terminal::api::{QqSportsApi, SportsApi};
use sportx_terminal::app::{App, input_for_key};
use sportx_terminal::config::{Config, Source};
use sportx_terminal::fake_feed::DemoApi;
use sportx_terminal::msg::Msg;
use sportx_terminal::runtime::Runtime;
use sportx_terminal::ui::ui;

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    let config = Config::from_env();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, config);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, config: Config) -> io::Result<()> {
    let api: Arc<dyn SportsApi> = match config.source {
        Source::Live => Arc::new(QqSportsApi::new(config.request_timeout)),
        Source::Demo => Arc::new(DemoApi::default()),
    };
    let (tx, rx) = mpsc::channel();
    let runtime = Runtime::new(api, config.fetch_parallelism, tx);

    let source = config.source;
    let mut app = App::new(config);
    app.push_log(format!("[INFO] Source: {source:?}"));

    let size = terminal.size()?;
    let mut running = runtime.execute_all(app.dispatch(Msg::Resize {
        width: size.width,
        height: size.height,
    }));
    let init = app.init();
    running &= runtime.execute_all(init);

    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    while running {
        while let Ok(msg) = rx.try_recv() {
            running &= runtime.execute_all(app.dispatch(msg));
        }

        terminal.draw(|f| ui(f, &app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            let msg = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input_for_key(key).map(Msg::Input)
                }
                Event::Resize(width, height) => Some(Msg::Resize { width, height }),
                _ => None,
            };
            if let Some(msg) = msg {
                running &= runtime.execute_all(app.dispatch(msg));
            }
        }

        if last_tick.elapsed() >= tick_rate {
            running &= runtime.execute_all(app.dispatch(Msg::Tick));
            last_tick = Instant::now();
        }

        if app.should_quit() {
            running = false;
        }
    }
    Ok(())
}
