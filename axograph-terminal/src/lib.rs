/// Terminal host for the axonometric point graph
use axograph_core::{ApplicationState, Settings};
use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    terminal::{self},
};
use log::info;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod input;
pub mod renderer;

pub use input::PointerTracker;
pub use renderer::CellCanvas;

/// Main application struct for the terminal graph editor
pub struct TerminalApp {
    state: ApplicationState,
    canvas: CellCanvas,
    pointer: PointerTracker,
    running: bool,
    frame_time: Duration,
}

impl TerminalApp {
    pub fn new(settings: &Settings) -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        let state = ApplicationState::new(settings);
        let layout = state.layout();
        let canvas = CellCanvas::new(cols as usize, rows as usize, layout.width, layout.height);

        Ok(Self {
            state,
            canvas,
            pointer: PointerTracker::new(),
            running: true,
            frame_time: Duration::from_secs(1) / settings.frame_rate.max(1),
        })
    }

    pub fn state(&self) -> &ApplicationState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ApplicationState {
        &mut self.state
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;
        let (cols, rows) = self.canvas.size();
        info!("started on a {cols}x{rows} terminal");

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;
        info!("stopped");

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::ZERO)? {
                self.handle_event(event::read()?);
            }

            // Update
            let input = self.pointer.snapshot();
            self.state.update(input);

            // Render
            self.render()?;

            // Frame timing
            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_time {
                std::thread::sleep(self.frame_time - elapsed);
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) => match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.running = false;
                }
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    self.running = false;
                }
                _ => {}
            },
            Event::Mouse(mouse) => self.pointer.handle(&mouse, &self.canvas),
            Event::Resize(cols, rows) => self.canvas.resize(cols as usize, rows as usize),
            _ => {}
        }
    }

    fn render(&mut self) -> io::Result<()> {
        self.state.render(&mut self.canvas);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.canvas.draw(&mut stdout)?;
        stdout.flush()?;
        Ok(())
    }
}
