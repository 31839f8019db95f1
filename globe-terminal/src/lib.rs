/// Terminal-based ASCII preview of the globe
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use globe_core::config::CameraSettings;
use globe_core::{InteractionController, Mesh, ModelView, ViewerConfig};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Approximate pixel size of a terminal cell, so pointer sensitivity
/// matches the browser view
const CELL_WIDTH_PX: f32 = 8.0;
const CELL_HEIGHT_PX: f32 = 16.0;

/// Rotation applied per arrow key press (radians)
const KEY_ROTATE_STEP: f32 = 0.1;

/// Main application struct for terminal globe rendering
pub struct TerminalApp {
    mesh: Mesh,
    camera: CameraSettings,
    initial_transform: ModelView,
    transform: ModelView,
    controller: InteractionController,
    renderer: AsciiRenderer,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: &ViewerConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(config, width as usize, height as usize))
    }

    pub fn with_size(config: &ViewerConfig, width: usize, height: usize) -> Self {
        let sphere = &config.sphere;
        let transform = ModelView::at_distance(config.camera.distance);

        Self {
            mesh: Mesh::uv_sphere(sphere.radius, sphere.latitude_bands, sphere.longitude_bands),
            camera: config.camera.clone(),
            initial_transform: transform,
            transform,
            controller: InteractionController::new(config.interaction.clone()),
            renderer: AsciiRenderer::new(width, height),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn transform(&self) -> &ModelView {
        &self.transform
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            // Drain pending input before drawing
            while event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(event);
            }

            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    /// Apply one terminal event to the view
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => {
                log::debug!("terminal resized to {}x{}", width, height);
                self.renderer = AsciiRenderer::new(width as usize, height as usize);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, KeyEvent { code, kind, .. }: KeyEvent) {
        if kind == KeyEventKind::Release {
            return;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Left | KeyCode::Char('a') => {
                self.transform = self.transform.rotated_y(-KEY_ROTATE_STEP);
            }
            KeyCode::Right | KeyCode::Char('d') => {
                self.transform = self.transform.rotated_y(KEY_ROTATE_STEP);
            }
            KeyCode::Up | KeyCode::Char('w') => {
                self.transform = self.transform.rotated_x(KEY_ROTATE_STEP);
            }
            KeyCode::Down | KeyCode::Char('s') => {
                self.transform = self.transform.rotated_x(-KEY_ROTATE_STEP);
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.controller.wheel(-1.0, &mut self.transform);
            }
            KeyCode::Char('-') => {
                self.controller.wheel(1.0, &mut self.transform);
            }
            KeyCode::Char('r') => {
                self.transform = self.initial_transform;
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let x = mouse.column as f32 * CELL_WIDTH_PX;
        let y = mouse.row as f32 * CELL_HEIGHT_PX;

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.controller.pointer_down(x, y),
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                self.controller.pointer_move(x, y, &mut self.transform);
            }
            MouseEventKind::Up(MouseButton::Left) => self.controller.pointer_up(),
            // Scrolling down matches a positive browser wheel delta
            MouseEventKind::ScrollDown => {
                self.controller.wheel(1.0, &mut self.transform);
            }
            MouseEventKind::ScrollUp => {
                self.controller.wheel(-1.0, &mut self.transform);
            }
            _ => {}
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let projection = self.renderer.projection(&self.camera);

        // Clear renderer
        self.renderer.clear();

        // Render mesh
        self.renderer
            .render_mesh(&self.mesh, &self.transform, &projection);

        // Output to terminal
        let mut stdout = stdout();
        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Globe Terminal Renderer | FPS: {:.1} | Drag=Rotate Scroll/+-=Zoom Arrows=Nudge R=Reset Q=Quit",
                self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn app() -> TerminalApp {
        TerminalApp::with_size(&ViewerConfig::default(), 80, 24)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_drag_rotates() {
        let mut app = app();
        let start = *app.transform();

        app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, 10));
        app.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), 15, 10));

        // Five cells of eight pixels at the default sensitivity
        let expected = start.rotated_y(0.4);
        assert!((app.transform().matrix() - expected.matrix()).norm() < 1e-5);
    }

    #[test]
    fn test_hover_without_press_is_ignored() {
        let mut app = app();
        let start = *app.transform();

        app.handle_event(mouse(MouseEventKind::Moved, 30, 5));
        app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 30, 5));
        app.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), 30, 5));
        app.handle_event(mouse(MouseEventKind::Moved, 60, 20));

        assert_eq!(*app.transform(), start);
    }

    #[test]
    fn test_scroll_zooms() {
        let mut app = app();
        let start = *app.transform();

        app.handle_event(mouse(MouseEventKind::ScrollDown, 0, 0));
        assert_eq!(*app.transform(), start.scaled(1.1));

        app.handle_event(mouse(MouseEventKind::ScrollUp, 0, 0));
        assert_eq!(*app.transform(), start.scaled(1.1).scaled(0.9));
    }

    #[test]
    fn test_reset_restores_initial_view() {
        let mut app = app();
        let start = *app.transform();

        app.handle_event(key(KeyCode::Left));
        app.handle_event(key(KeyCode::Char('+')));
        assert_ne!(*app.transform(), start);

        app.handle_event(key(KeyCode::Char('r')));
        assert_eq!(*app.transform(), start);
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        app.handle_event(key(KeyCode::Char('q')));
        assert!(!app.is_running());
    }

    #[test]
    fn test_resize_replaces_renderer() {
        let mut app = app();
        app.handle_event(Event::Resize(120, 40));
        assert_eq!(app.renderer.width(), 120);
        assert_eq!(app.renderer.height(), 40);
    }
}
