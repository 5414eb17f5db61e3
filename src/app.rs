use std::cell::Cell;

use anyhow::{anyhow, Result};
use hourglass_sand::display::{DisplaySink, FrameBuffer, Region, Rgb, OPEN_COLOR};
use hourglass_sand::{Button, Config, GravityDirection, Mode, Session};
use sdl2::{
    event::Event, keyboard::Keycode, pixels::Color, rect::Rect, render::Canvas, video::Window,
    EventPump,
};

const BACKGROUND_COLOR: Color = Color::RGB(OPEN_COLOR[0], OPEN_COLOR[1], OPEN_COLOR[2]);

enum Input {
    Quit,
    Press(Button),
    Nothing,
}

/// Keyboard stands in for the tilt sensor: arrows for the four sides,
/// Q/E/Z/C for the diagonals, space to lay the hourglass flat. A, B, X and
/// Y are the device buttons.
fn handle_event(event: &Event, tilt: &Cell<GravityDirection>) -> Input {
    let keycode = match event {
        Event::Quit { .. }
        | Event::KeyDown {
            keycode: Some(Keycode::Escape),
            ..
        } => return Input::Quit,
        Event::KeyDown {
            keycode: Some(keycode),
            repeat: false,
            ..
        } => *keycode,
        _ => return Input::Nothing,
    };
    let direction = match keycode {
        Keycode::Up => GravityDirection::N,
        Keycode::Down => GravityDirection::S,
        Keycode::Left => GravityDirection::W,
        Keycode::Right => GravityDirection::E,
        Keycode::Q => GravityDirection::NW,
        Keycode::E => GravityDirection::NE,
        Keycode::Z => GravityDirection::SW,
        Keycode::C => GravityDirection::SE,
        Keycode::Space => GravityDirection::Flat,
        Keycode::A => return Input::Press(Button::A),
        Keycode::B => return Input::Press(Button::B),
        Keycode::X => return Input::Press(Button::X),
        Keycode::Y => return Input::Press(Button::Y),
        _ => return Input::Nothing,
    };
    tilt.set(direction);
    Input::Nothing
}

fn clear_canvas_with_color(canvas: &mut Canvas<Window>, color: Color) {
    canvas.set_draw_color(color);
    canvas.clear();
}

fn draw_frame(canvas: &mut Canvas<Window>, frame: &FrameBuffer, scale: u32) {
    clear_canvas_with_color(canvas, BACKGROUND_COLOR);
    let width = frame.width().max(1) as usize;
    for (id, &[r, g, b]) in frame.pixels().iter().enumerate() {
        if [r, g, b] == OPEN_COLOR {
            continue;
        }
        let (x, y) = ((id % width) as u32, (id / width) as u32);
        canvas.set_draw_color(Color::RGB(r, g, b));
        let _ = canvas.fill_rect(Rect::new((x * scale) as i32, (y * scale) as i32, scale, scale));
    }
    canvas.present();
}

/// Keeps a copy of the screen and repaints the window on every blit, so
/// partial row updates never show a stale back buffer.
struct WindowSink<'a> {
    canvas: &'a mut Canvas<Window>,
    frame: &'a mut FrameBuffer,
    scale: u32,
}

impl DisplaySink for WindowSink<'_> {
    fn blit(&mut self, pixels: &[Rgb], region: Region) {
        self.frame.blit(pixels, region);
        draw_frame(self.canvas, self.frame, self.scale);
    }
}

fn get_sdl_window(sdl_context: &sdl2::Sdl, title: &str, size: u32) -> Result<Window> {
    let video_subsystem = sdl_context.video().map_err(|e| anyhow!(e))?;
    let window = video_subsystem
        .window(title, size, size)
        .position_centered()
        .build()?;
    Ok(window)
}

pub struct App {
    running: bool,
    session: Session,
    canvas: Canvas<Window>,
    event_pump: EventPump,
    frame: FrameBuffer,
    scale: u32,
    tilt: Cell<GravityDirection>,
}

impl App {
    pub fn new(config: &Config) -> Result<Self> {
        let sdl_context = sdl2::init().map_err(|e| anyhow!(e))?;
        let window = get_sdl_window(&sdl_context, "hourglass", config.screen_size as u32 * config.scale)?;
        let silhouette = config.load_silhouette()?;
        let frame = FrameBuffer::new(silhouette.width(), silhouette.height());

        let mut app = App {
            running: true,
            session: Session::new(silhouette, config),
            event_pump: sdl_context.event_pump().map_err(|e| anyhow!(e))?,
            canvas: window.into_canvas().build()?,
            frame,
            scale: config.scale,
            tilt: Cell::new(GravityDirection::S),
        };

        app.render();

        Ok(app)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn input(&mut self) {
        for event in self.event_pump.poll_iter() {
            match handle_event(&event, &self.tilt) {
                Input::Quit => self.running = false,
                Input::Press(button) => self.session.press(button),
                Input::Nothing => {}
            }
        }
    }

    /// Advances the session one mode. During a run the window keeps
    /// polling input between passes; a button press cancels the run.
    pub fn update(&mut self) -> Result<()> {
        let App {
            running,
            session,
            canvas,
            event_pump,
            frame,
            scale,
            tilt,
        } = self;
        let tilt: &Cell<GravityDirection> = tilt;

        let mut source = || tilt.get();
        let mut sink = WindowSink {
            canvas,
            frame,
            scale: *scale,
        };
        let mut pressed = None;
        let result = session.step(&mut source, &mut sink, |_| {
            for event in event_pump.poll_iter() {
                match handle_event(&event, tilt) {
                    Input::Quit => {
                        *running = false;
                        return false;
                    }
                    Input::Press(button) => {
                        pressed = Some(button);
                        return false;
                    }
                    Input::Nothing => {}
                }
            }
            true
        });

        // A cancelled timer still lands on Finished; the press takes it back to the menu.
        if let (Some(button), Mode::Finished) = (pressed, session.mode()) {
            session.press(button);
        }
        result?;
        Ok(())
    }

    pub fn render(&mut self) {
        draw_frame(&mut self.canvas, &self.frame, self.scale);
    }
}
