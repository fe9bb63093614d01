mod app;
mod config;
mod engine;
mod error;
mod grid;
mod palette;
mod record;
mod render;
mod rng;
mod settings;
mod simulation;
mod ticker;
mod ui;

use app::App;
use clap::Parser;
use config::AppConfig;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use record::GifRecorder;
use render::{Renderer, SurfaceLayout, SurfaceRenderer};
use settings::SimulationSettings;
use simulation::ForestFire;
use std::cell::RefCell;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "forest-fire")]
#[command(about = "Forest fire cellular automaton in the terminal")]
struct Args {
    /// Trees in the x direction, border included (min 3)
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Trees in the y direction, border included (min 3)
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Percent chance (0-100) that a burning neighbour ignites a tree
    #[arg(short = 'b', long = "burn-chance", value_parser = clap::value_parser!(u8).range(0..=100))]
    burn_chance: Option<u8>,

    /// Milliseconds between ticks while playing
    #[arg(short = 'i', long)]
    interval: Option<u64>,

    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Load settings from this JSON file instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective settings to this JSON file
    #[arg(long = "save-config")]
    save_config: Option<PathBuf>,

    /// Run without the terminal UI and print a summary
    #[arg(long)]
    headless: bool,

    /// Number of ticks to run in headless mode (default: until burned out)
    #[arg(long)]
    ticks: Option<u64>,

    /// Write the final frame as PNG when the run ends
    #[arg(long = "export-png")]
    export_png: Option<PathBuf>,

    /// Record every frame into an animated GIF
    #[arg(long = "export-gif")]
    export_gif: Option<PathBuf>,

    /// Write log output to this file (interactive mode logs nowhere otherwise)
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

fn init_logging(args: &Args) -> io::Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(path) = &args.log_file {
        builder.target(env_logger::Target::Pipe(Box::new(File::create(path)?)));
    } else if args.headless {
        builder.target(env_logger::Target::Stderr);
    } else {
        // The TUI owns the terminal; stray log lines would corrupt it
        return Ok(());
    }
    builder.init();
    Ok(())
}

/// Config file settings with command-line overrides applied
fn resolve_settings(args: &Args) -> Result<SimulationSettings, Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::load_default().unwrap_or_else(|err| {
            log::warn!("Ignoring default config: {}", err);
            AppConfig::default()
        }),
    };

    let mut settings = config.settings;
    if let Some(width) = args.width {
        settings.width = width;
    }
    if let Some(height) = args.height {
        settings.height = height;
    }
    if let Some(burn_chance) = args.burn_chance {
        settings.burn_chance = burn_chance;
    }
    if let Some(interval) = args.interval {
        settings.interval_ms = interval;
    }
    if args.seed.is_some() {
        settings.seed = args.seed;
    }
    Ok(settings)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(&args)?;

    let settings = resolve_settings(&args)?;
    if let Some(path) = &args.save_config {
        AppConfig {
            settings: settings.clone(),
            ..AppConfig::default()
        }
        .save_to_file(path)?;
    }

    let mut simulation = ForestFire::from_settings(settings)?;

    let recorder = match &args.export_gif {
        Some(path) => {
            let settings = simulation.settings();
            let layout = SurfaceLayout::new(
                settings.surface_width,
                settings.surface_height,
                settings.width,
                settings.height,
            );
            let recorder = Rc::new(RefCell::new(GifRecorder::create(
                path,
                layout,
                settings.interval(),
            )?));
            simulation.attach_renderer(Box::new(Rc::clone(&recorder)));
            Some(recorder)
        }
        None => None,
    };

    let simulation = if args.headless {
        run_headless(simulation, args.ticks)
    } else {
        run_interactive(simulation)?
    };

    if let Some(recorder) = recorder {
        let frames = recorder.borrow_mut().finish()?;
        if args.headless {
            println!("Recorded {} frames", frames);
        }
    }
    if let Some(path) = &args.export_png {
        export_png(&simulation, path)?;
    }

    Ok(())
}

fn export_png(simulation: &ForestFire, path: &Path) -> Result<(), error::ExportError> {
    let settings = simulation.settings();
    let mut renderer = SurfaceRenderer::new(settings.surface_width, settings.surface_height);
    renderer.render(simulation.grid());
    renderer.save_png(path)
}

fn run_headless(mut simulation: ForestFire, ticks: Option<u64>) -> ForestFire {
    // Every tree burns at most once, so this always reaches burn-out
    let limit = ticks.unwrap_or(simulation.grid().interior_len() as u64 + 1);
    for _ in 0..limit {
        if ticks.is_none() && simulation.is_burned_out() {
            break;
        }
        simulation.step();
    }

    let grid = simulation.grid();
    let counts = simulation.counts();
    let (ix, iy) = grid.ignition();
    println!("Grid:      {}x{}", grid.width(), grid.height());
    println!("Ignition:  ({}, {})", ix, iy);
    println!("Ticks:     {}", simulation.tick());
    println!("Unburned:  {}", counts.unburned);
    println!("Burning:   {}", counts.burning);
    println!("Burnt:     {}", counts.burnt);
    println!("Burned:    {:.1}% of the forest", simulation.progress() * 100.0);
    simulation
}

fn run_interactive(simulation: ForestFire) -> Result<ForestFire, Box<dyn std::error::Error>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::with_simulation(simulation);

    // Run the app
    let res = run_app(&mut terminal, &mut app);

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(app.simulation)
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    // Target ~60fps for smooth animation
    const FRAME_DURATION: Duration = Duration::from_millis(16);

    loop {
        // Render current state
        terminal.draw(|frame| ui::render(frame, app))?;

        // Poll for events, waking early if a tick is due sooner
        let timeout = app
            .simulation
            .ticker()
            .time_until_next()
            .map_or(FRAME_DURATION, |due| due.min(FRAME_DURATION));
        if event::poll(timeout)? && handle_event(app, event::read()?) {
            return Ok(());
        }

        // Run simulation ticks that came due
        app.tick();
    }
}

/// Apply one terminal event to the app. Returns true when the user asked to quit.
fn handle_event(app: &mut App, event: Event) -> bool {
    let Event::Key(key) = event else {
        return false;
    };
    // Only process Press events
    if key.kind != KeyEventKind::Press {
        return false;
    }

    // Handle Ctrl+C
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => return true,
        KeyCode::Char(' ') => app.toggle_play(),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Char('.') => app.step(),
        KeyCode::Char('r') | KeyCode::Char('R') => app.reset(),
        KeyCode::Char('p') | KeyCode::Char('P') => app.export_frame(),
        KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => app.toggle_help(),
        KeyCode::Esc if app.show_help => app.toggle_help(),
        KeyCode::Char('j') | KeyCode::Char('J') | KeyCode::Down if app.show_help => {
            app.scroll_help_down(ui::HELP_CONTENT_LINES)
        }
        KeyCode::Char('k') | KeyCode::Char('K') | KeyCode::Up if app.show_help => {
            app.scroll_help_up()
        }
        _ => {}
    }
    false
}
