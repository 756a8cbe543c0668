use std::{
    error::Error,
    io,
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use market_canvas::{
    Animation, Driver, EquityCurve, Pointer, PulsingBars, Recorder, ScrollLoop, SurfaceWidget,
    Viewport,
};

/// Device pixels per logical pixel; one device pixel is one braille dot.
const PIXEL_RATIO: f64 = 0.5;

struct App {
    drivers: Vec<Driver<Box<dyn Animation>>>,
    current: usize,
    started: Instant,
}

fn viewport(area: Rect) -> Viewport {
    let (width, height) = dots(area);
    Viewport::new(width / PIXEL_RATIO, height / PIXEL_RATIO, PIXEL_RATIO)
        .expect("terminal size is finite")
}

fn dots(area: Rect) -> (f64, f64) {
    (f64::from(area.width) * 2.0, f64::from(area.height) * 4.0)
}

impl App {
    fn new(area: Rect) -> Self {
        let viewport = viewport(area);
        let animations: Vec<Box<dyn Animation>> = vec![
            Box::new(ScrollLoop::ticker(viewport)),
            Box::new(ScrollLoop::background(viewport)),
            Box::new(PulsingBars::new(viewport)),
            Box::new(EquityCurve::new(160)),
        ];

        let mut drivers = animations.into_iter().map(Driver::new).collect::<Vec<_>>();
        drivers[0].start();

        Self {
            drivers,
            current: 0,
            started: Instant::now(),
        }
    }

    fn driver(&mut self) -> &mut Driver<Box<dyn Animation>> {
        &mut self.drivers[self.current]
    }

    fn next(&mut self) {
        self.driver().stop();
        self.current = (self.current + 1) % self.drivers.len();
        self.driver().start();
    }

    fn toggle(&mut self) {
        let driver = self.driver();
        if driver.is_running() {
            driver.stop();
        } else {
            driver.start();
        }
    }

    fn resize(&mut self, area: Rect) {
        let viewport = viewport(area);
        for driver in &mut self.drivers {
            driver.resize(viewport);
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    // setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // create app and run it
    let tick_rate = Duration::from_millis(16);
    let app = App::new(terminal.size()?);
    let res = run_app(&mut terminal, app, tick_rate);

    // restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    tick_rate: Duration,
) -> io::Result<()> {
    let mut last_tick = Instant::now();
    let mut recorder = Recorder::new(0.0, 0.0).with_pixel_ratio(PIXEL_RATIO);
    loop {
        let area = terminal.size()?;
        let (width, height) = dots(area);
        recorder.resize(width, height);
        recorder.take();

        let now = app.started.elapsed().as_secs_f64() * 1000.0;
        app.driver().frame(now, &mut recorder);
        terminal.draw(|f| f.render_widget(SurfaceWidget::new(&recorder), f.size()))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if crossterm::event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Tab => app.next(),
                    KeyCode::Char(' ') => app.toggle(),
                    _ => {}
                },
                Event::Mouse(mouse) if mouse.kind == MouseEventKind::Moved => {
                    let pointer = Pointer::from_pixels(
                        f64::from(mouse.column),
                        f64::from(mouse.row),
                        f64::from(area.width),
                        f64::from(area.height),
                    );
                    app.driver().pointer_moved(pointer);
                }
                Event::Resize(columns, rows) => app.resize(Rect::new(0, 0, columns, rows)),
                _ => {}
            }
        }
        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    }
}
