use crate::engine;
use crate::error::SimError;
use crate::grid::{Grid, GridCounts};
use crate::render::Renderer;
use crate::rng::{RandomSource, SimRng};
use crate::settings::SimulationSettings;
use crate::ticker::{IntervalTicker, Ticker};

/// Forest fire simulation controller.
///
/// Owns the grid, the random source and the play schedule. Every tick stages
/// all interior cells, commits, then notifies attached renderers, so renderers
/// never observe a half-applied tick.
pub struct ForestFire<R: RandomSource = SimRng, T: Ticker = IntervalTicker> {
    settings: SimulationSettings,
    grid: Grid,
    rng: R,
    ticker: T,
    renderers: Vec<Box<dyn Renderer>>,
    tick: u64,
    burned_out_logged: bool,
}

impl ForestFire<SimRng, IntervalTicker> {
    /// Controller with a seeded (or entropy-seeded) RNG and wall-clock ticker
    pub fn from_settings(settings: SimulationSettings) -> Result<Self, SimError> {
        let rng = SimRng::from_optional_seed(settings.seed);
        Self::new(settings, rng, IntervalTicker::new())
    }
}

impl<R: RandomSource, T: Ticker> ForestFire<R, T> {
    /// Validate settings and build the first grid. Starts paused.
    pub fn new(settings: SimulationSettings, rng: R, ticker: T) -> Result<Self, SimError> {
        settings.validate()?;
        let mut rng = rng;
        let grid = Self::fresh_grid(&settings, &mut rng)?;
        let mut sim = Self {
            settings,
            grid,
            rng,
            ticker,
            renderers: Vec::new(),
            tick: 0,
            burned_out_logged: false,
        };
        sim.ticker.stop();
        sim.log_reset();
        Ok(sim)
    }

    fn fresh_grid(settings: &SimulationSettings, rng: &mut R) -> Result<Grid, SimError> {
        let (width, height) = (settings.width, settings.height);
        if width < crate::grid::MIN_DIMENSION || height < crate::grid::MIN_DIMENSION {
            return Err(SimError::InvalidConfiguration { width, height });
        }
        let ignition_x = rng.random_int(1, width - 1);
        let ignition_y = rng.random_int(1, height - 1);
        Grid::initialize(width, height, ignition_x, ignition_y)
    }

    fn log_reset(&self) {
        let (x, y) = self.grid.ignition();
        log::info!(
            "Reset {}x{} forest, ignition at ({}, {}), burn chance {}%",
            self.grid.width(),
            self.grid.height(),
            x,
            y,
            self.settings.burn_chance
        );
    }

    /// Pause, rebuild the grid around a new ignition point and render it
    pub fn reset(&mut self) -> Result<(), SimError> {
        self.pause();
        self.grid = Self::fresh_grid(&self.settings, &mut self.rng)?;
        self.tick = 0;
        self.burned_out_logged = false;
        self.log_reset();
        self.notify_renderers();
        Ok(())
    }

    /// Run one full tick: stage every interior cell, commit, render
    pub fn step(&mut self) {
        engine::stage_next_states(&mut self.grid, self.settings.burn_chance, &mut self.rng);
        self.grid.commit();
        self.tick += 1;

        if !self.burned_out_logged && self.grid.is_burned_out() {
            self.burned_out_logged = true;
            let counts = self.grid.counts();
            log::info!(
                "Fire burned out after {} ticks ({} trees left standing)",
                self.tick,
                counts.unburned
            );
        }
        self.notify_renderers();
    }

    /// Start stepping on every ticker period
    pub fn play(&mut self) {
        if !self.ticker.is_running() {
            log::debug!("Playing at {:?} per tick", self.settings.interval());
            self.ticker.start(self.settings.interval());
        }
    }

    /// Stop scheduled stepping. Safe to call when already paused.
    pub fn pause(&mut self) {
        if self.ticker.is_running() {
            log::debug!("Paused at tick {}", self.tick);
        }
        self.ticker.stop();
    }

    pub fn toggle_play(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    pub fn is_playing(&self) -> bool {
        self.ticker.is_running()
    }

    /// Step once for every tick the scheduler reports as due.
    /// Called from the event loop; does nothing while paused.
    pub fn pump(&mut self) -> u32 {
        if !self.is_playing() {
            return 0;
        }
        let due = self.ticker.due_ticks();
        for _ in 0..due {
            self.step();
        }
        due
    }

    /// Register a renderer and draw the current grid to it
    pub fn attach_renderer(&mut self, mut renderer: Box<dyn Renderer>) {
        renderer.render(&self.grid);
        self.renderers.push(renderer);
    }

    fn notify_renderers(&mut self) {
        for renderer in &mut self.renderers {
            renderer.render(&self.grid);
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    /// Ticks committed since the last reset
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn counts(&self) -> GridCounts {
        self.grid.counts()
    }

    pub fn is_burned_out(&self) -> bool {
        self.grid.is_burned_out()
    }

    /// Fraction (0.0 to 1.0) of the interior forest that has burned or is burning
    pub fn progress(&self) -> f32 {
        let interior = self.grid.interior_len();
        let border = self.grid.width() * self.grid.height() - interior;
        let counts = self.grid.counts();
        (counts.burnt + counts.burning - border) as f32 / interior as f32
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    #[cfg(test)]
    pub fn ticker_mut(&mut self) -> &mut T {
        &mut self.ticker
    }
}
