use crate::config::{HostConfig, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::display::Display;
use crate::error::HostError;
use crate::frame::RenderBuffer;
use crate::input::{EventSource, InputEvent, PhysicalKey};
use log::{debug, info, trace};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, TextureCreator};
use sdl2::video::{Window, WindowContext};

/// native window backed by SDL2
///
/// Input comes straight off SDL's event queue, so every press, release and
/// close request arrives in the order it happened, including a tap that
/// starts and ends between two polls. Auto-repeat key downs are dropped.
pub struct SdlFrontend {
    sdl: Option<SdlResources>,
}

// fields drop top to bottom, the reverse of how they were acquired
struct SdlResources {
    texture_creator: TextureCreator<WindowContext>,
    canvas: Canvas<Window>,
    event_pump: sdl2::EventPump,
    _video: sdl2::VideoSubsystem,
    _sdl: sdl2::Sdl,
}

fn surface<E: ToString>(e: E) -> HostError {
    HostError::Surface(e.to_string())
}

fn closed() -> HostError {
    HostError::Surface(String::from("window already closed"))
}

impl SdlFrontend {
    pub fn new(config: &HostConfig) -> Result<Self, HostError> {
        let sdl = sdl2::init().map_err(surface)?;
        let video = sdl.video().map_err(surface)?;
        let window = video
            .window(
                config.title,
                config.window_width as u32,
                config.window_height as u32,
            )
            .position_centered()
            .resizable()
            .allow_highdpi()
            .build()
            .map_err(surface)?;
        let canvas = window.into_canvas().build().map_err(surface)?;
        let texture_creator = canvas.texture_creator();
        let event_pump = sdl.event_pump().map_err(surface)?;

        let mut frontend = SdlFrontend {
            sdl: Some(SdlResources {
                texture_creator,
                canvas,
                event_pump,
                _video: video,
                _sdl: sdl,
            }),
        };
        // fail here rather than on the first draw-graphics
        frontend.present(&RenderBuffer::new())?;
        info!(
            "opened {}x{} sdl window",
            config.window_width, config.window_height
        );
        Ok(frontend)
    }
}

impl Display for SdlFrontend {
    fn present(&mut self, frame: &RenderBuffer) -> Result<(), HostError> {
        let res = self.sdl.as_mut().ok_or_else(closed)?;
        let mut texture = res
            .texture_creator
            .create_texture_streaming(
                PixelFormatEnum::RGBA32,
                SCREEN_WIDTH as u32,
                SCREEN_HEIGHT as u32,
            )
            .map_err(surface)?;
        texture
            .with_lock(None, |pixels: &mut [u8], pitch: usize| {
                for (y, row) in frame.as_slice().chunks(SCREEN_WIDTH).enumerate() {
                    let dst = &mut pixels[y * pitch..y * pitch + SCREEN_WIDTH * 4];
                    for (out, &px) in dst.chunks_exact_mut(4).zip(row) {
                        out.copy_from_slice(&px.to_be_bytes());
                    }
                }
            })
            .map_err(surface)?;
        res.canvas.clear();
        res.canvas.copy(&texture, None, None).map_err(surface)?;
        res.canvas.present();
        Ok(())
    }

    fn teardown(&mut self) {
        if self.sdl.take().is_some() {
            debug!("sdl window closed");
        }
    }
}

impl EventSource for SdlFrontend {
    fn pending_events(&mut self) -> Result<Vec<InputEvent>, HostError> {
        let res = self.sdl.as_mut().ok_or_else(closed)?;
        let events: Vec<InputEvent> = res.event_pump.poll_iter().filter_map(translate).collect();
        if !events.is_empty() {
            trace!("{} input events", events.len());
        }
        Ok(events)
    }
}

impl Drop for SdlFrontend {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn translate(event: Event) -> Option<InputEvent> {
    match event {
        Event::Quit { .. } => Some(InputEvent::Close),
        Event::KeyDown {
            keycode: Some(k),
            repeat: false,
            ..
        } => physical_key(k).map(InputEvent::KeyDown),
        Event::KeyUp {
            keycode: Some(k), ..
        } => physical_key(k).map(InputEvent::KeyUp),
        _ => None,
    }
}

fn physical_key(key: Keycode) -> Option<PhysicalKey> {
    let c = match key {
        Keycode::Escape => return Some(PhysicalKey::Escape),
        Keycode::Space => ' ',
        Keycode::Num0 => '0',
        Keycode::Num1 => '1',
        Keycode::Num2 => '2',
        Keycode::Num3 => '3',
        Keycode::Num4 => '4',
        Keycode::Num5 => '5',
        Keycode::Num6 => '6',
        Keycode::Num7 => '7',
        Keycode::Num8 => '8',
        Keycode::Num9 => '9',
        Keycode::A => 'a',
        Keycode::B => 'b',
        Keycode::C => 'c',
        Keycode::D => 'd',
        Keycode::E => 'e',
        Keycode::F => 'f',
        Keycode::G => 'g',
        Keycode::H => 'h',
        Keycode::I => 'i',
        Keycode::J => 'j',
        Keycode::K => 'k',
        Keycode::L => 'l',
        Keycode::M => 'm',
        Keycode::N => 'n',
        Keycode::O => 'o',
        Keycode::P => 'p',
        Keycode::Q => 'q',
        Keycode::R => 'r',
        Keycode::S => 's',
        Keycode::T => 't',
        Keycode::U => 'u',
        Keycode::V => 'v',
        Keycode::W => 'w',
        Keycode::X => 'x',
        Keycode::Y => 'y',
        Keycode::Z => 'z',
        _ => return None,
    };
    Some(PhysicalKey::Char(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{poll, DummyInput, KeyMap, Keypad, QUIT_KEY};
    use crate::state::RunState;
    use sdl2::keyboard::Mod;

    fn down(k: Keycode, repeat: bool) -> Event {
        Event::KeyDown {
            timestamp: 0,
            window_id: 1,
            keycode: Some(k),
            scancode: None,
            keymod: Mod::NOMOD,
            repeat,
        }
    }

    fn up(k: Keycode) -> Event {
        Event::KeyUp {
            timestamp: 0,
            window_id: 1,
            keycode: Some(k),
            scancode: None,
            keymod: Mod::NOMOD,
            repeat: false,
        }
    }

    #[test]
    fn test_translate_keys() {
        let w = PhysicalKey::Char('w');
        assert_eq!(translate(down(Keycode::W, false)), Some(InputEvent::KeyDown(w)));
        assert_eq!(translate(up(Keycode::W)), Some(InputEvent::KeyUp(w)));
        assert_eq!(
            translate(down(Keycode::Escape, false)),
            Some(InputEvent::KeyDown(QUIT_KEY))
        );
        assert_eq!(translate(down(Keycode::F1, false)), None);
    }

    #[test]
    fn test_translate_quit() {
        assert_eq!(
            translate(Event::Quit { timestamp: 0 }),
            Some(InputEvent::Close)
        );
    }

    #[test]
    fn test_auto_repeat_dropped() {
        assert_eq!(translate(down(Keycode::W, true)), None);
    }

    #[test]
    fn test_tap_within_one_poll_keeps_order() -> Result<(), HostError> {
        let w = PhysicalKey::Char('w');
        let x = PhysicalKey::Char('x');
        let batch: Vec<InputEvent> = vec![
            down(Keycode::W, false),
            down(Keycode::W, true),
            up(Keycode::W),
            down(Keycode::X, false),
        ]
        .into_iter()
        .filter_map(translate)
        .collect();
        assert_eq!(
            batch,
            vec![
                InputEvent::KeyDown(w),
                InputEvent::KeyUp(w),
                InputEvent::KeyDown(x),
            ]
        );

        let keymap = KeyMap::conventional()?;
        let mut keypad = Keypad::new();
        let mut state = RunState::new();
        let mut src = DummyInput::new(&batch);
        poll(&mut src, &keymap, &mut keypad, &mut state)?;
        // w went down and back up, x is still held
        assert!(!keypad.is_pressed(5)?);
        assert!(keypad.is_pressed(0)?);
        Ok(())
    }

    #[test]
    fn test_every_keypad_key_is_reachable() {
        let keymap = KeyMap::conventional().unwrap();
        let reachable: Vec<PhysicalKey> = [
            Keycode::X, Keycode::Num1, Keycode::Num2, Keycode::Num3, Keycode::Q,
            Keycode::W, Keycode::E, Keycode::A, Keycode::S, Keycode::D, Keycode::Z,
            Keycode::C, Keycode::Num4, Keycode::R, Keycode::F, Keycode::V,
        ]
        .into_iter()
        .filter_map(physical_key)
        .collect();
        for i in 0..16 {
            assert_eq!(Some(reachable[i]), keymap.key_for(i));
        }
    }

    #[test]
    #[ignore]
    // NB. needs a display server
    fn test_open_and_close_window() -> Result<(), HostError> {
        let mut w = SdlFrontend::new(&HostConfig::default())?;
        w.present(&RenderBuffer::new())?;
        w.pending_events()?;
        w.teardown();
        w.teardown();
        assert!(w.present(&RenderBuffer::new()).is_err());
        Ok(())
    }
}
