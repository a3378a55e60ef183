use crossterm::event::{read, Event, KeyCode, KeyModifiers};
use crossterm::terminal;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use crate::clock::StopHandle;
use crate::error::KeypadError;

/// left-hand side of a qwerty keyboard laid over the COSMAC hex keypad:
///
/// ```text
///   1 2 3 4        1 2 3 C
///   q w e r   =>   4 5 6 D
///   a s d f        7 8 9 E
///   z x c v        A 0 B F
/// ```
const CHIP8_CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x00), // x
    ('1', 0x01), // 1
    ('2', 0x02), // 2
    ('3', 0x03), // 3
    ('q', 0x04), // q
    ('w', 0x05), // w
    ('e', 0x06), // e
    ('a', 0x07), // a
    ('s', 0x08), // s
    ('d', 0x09), // d
    ('z', 0x0a), // z
    ('c', 0x0b), // c
    ('4', 0x0c), // 4
    ('r', 0x0d), // r
    ('f', 0x0e), // f
    ('v', 0x0f), // v
];

/// Where the interpreter gets key presses from.
pub trait Keypad {
    /// the key currently pressed, in `0x0..=0xF`. `KeypadError::NoKey` means
    /// nothing (or nothing mappable) is pressed and `KeypadError::Quit` asks
    /// the machine to shut down
    fn get_key(&mut self) -> Result<u8, KeypadError>;
}

/// any `FnMut() -> Result<u8, KeypadError>` can act as a keypad
impl<F> Keypad for F
where
    F: FnMut() -> Result<u8, KeypadError>,
{
    fn get_key(&mut self) -> Result<u8, KeypadError> {
        self()
    }
}

/// stand-in for machines with no keyboard attached; refuses to be used
pub struct NullKeypad;

impl Keypad for NullKeypad {
    fn get_key(&mut self) -> Result<u8, KeypadError> {
        Err(KeypadError::Unavailable)
    }
}

/// dummy Keypad implementation for testing: hands out `keys` in order, then
/// reports quit
pub struct ScriptedKeypad {
    keys: VecDeque<Option<u8>>,
}

impl ScriptedKeypad {
    /// `None` entries report "no key pressed"
    pub fn new(keys: &[Option<u8>]) -> Self {
        ScriptedKeypad {
            keys: keys.iter().copied().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

impl Keypad for ScriptedKeypad {
    fn get_key(&mut self) -> Result<u8, KeypadError> {
        match self.keys.pop_front() {
            Some(Some(key)) => Ok(key),
            Some(None) => Err(KeypadError::NoKey),
            None => Err(KeypadError::Quit),
        }
    }
}

/// what the reader thread passes on
enum KeyMessage {
    Key(u8),
    Quit,
    Failed(io::Error),
}

/// Terminals only report presses, never releases, so a press is treated as
/// held for a short while.
const KEY_HOLD: Duration = Duration::from_millis(150);

/// Remembers the last key pressed until its hold runs out, so every key check
/// inside that window sees the same key.
struct KeyLatch {
    held: Option<(u8, Instant)>,
    hold: Duration,
}

impl KeyLatch {
    fn new(hold: Duration) -> Self {
        KeyLatch { held: None, hold }
    }

    fn press(&mut self, key: u8, at: Instant) {
        self.held = Some((key, at));
    }

    fn current(&mut self, now: Instant) -> Option<u8> {
        match self.held {
            Some((key, at)) if now.saturating_duration_since(at) < self.hold => Some(key),
            _ => {
                self.held = None;
                None
            }
        }
    }
}

/// Keypad reading the terminal in raw mode. A background thread turns
/// crossterm events into hex keys; Esc or Ctrl-C asks the run loop to stop.
pub struct TermKeypad {
    events: Receiver<KeyMessage>,
    latch: KeyLatch,
}

impl TermKeypad {
    pub fn new(stop: StopHandle) -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        let (tx, rx) = mpsc::channel();
        let keymap = HashMap::from(CHIP8_CONVENTIONAL_KEYMAP);
        thread::Builder::new()
            .name("keypad".into())
            .spawn(move || read_terminal(tx, keymap, stop))?;
        Ok(TermKeypad {
            events: rx,
            latch: KeyLatch::new(KEY_HOLD),
        })
    }
}

/// runs until quit, a read error, or the keypad is dropped
fn read_terminal(tx: Sender<KeyMessage>, keymap: HashMap<char, u8>, stop: StopHandle) {
    loop {
        let message = match read() {
            Ok(Event::Key(evt)) => match evt.code {
                KeyCode::Esc => KeyMessage::Quit,
                KeyCode::Char('c') if evt.modifiers.contains(KeyModifiers::CONTROL) => {
                    KeyMessage::Quit
                }
                KeyCode::Char(key) => match keymap.get(&key.to_ascii_lowercase()) {
                    Some(mapped_key) => KeyMessage::Key(*mapped_key),
                    None => continue,
                },
                _ => continue,
            },
            Ok(_) => continue,
            Err(e) => KeyMessage::Failed(e),
        };

        let last = !matches!(message, KeyMessage::Key(_));
        if let KeyMessage::Quit = message {
            stop.stop();
        }
        if tx.send(message).is_err() || last {
            return;
        }
    }
}

impl Drop for TermKeypad {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl Keypad for TermKeypad {
    fn get_key(&mut self) -> Result<u8, KeypadError> {
        // drain everything queued; the newest press wins
        loop {
            match self.events.try_recv() {
                Ok(KeyMessage::Key(key)) => self.latch.press(key, Instant::now()),
                Ok(KeyMessage::Quit) => return Err(KeypadError::Quit),
                Ok(KeyMessage::Failed(e)) => return Err(KeypadError::Io(e)),
                Err(TryRecvError::Empty) => break,
                // the reader has gone, nothing more will ever arrive
                Err(TryRecvError::Disconnected) => return Err(KeypadError::Quit),
            }
        }
        self.latch.current(Instant::now()).ok_or(KeypadError::NoKey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keymap_covers_every_key() {
        let mut keys: Vec<u8> = CHIP8_CONVENTIONAL_KEYMAP.iter().map(|(_, k)| *k).collect();
        keys.sort_unstable();
        assert_eq!(keys, (0x0..=0xF).collect::<Vec<u8>>());
    }

    #[test]
    fn test_null_keypad_unusable() {
        assert!(matches!(
            NullKeypad.get_key(),
            Err(KeypadError::Unavailable)
        ));
    }

    #[test]
    fn test_scripted_keypad_in_order_then_quits() {
        let mut k = ScriptedKeypad::new(&[Some(0xA), None, Some(0x1)]);
        assert_eq!(k.get_key().ok(), Some(0xA));
        assert!(matches!(k.get_key(), Err(KeypadError::NoKey)));
        assert_eq!(k.get_key().ok(), Some(0x1));
        assert_eq!(k.remaining(), 0);
        assert!(matches!(k.get_key(), Err(KeypadError::Quit)));
    }

    #[test]
    fn test_latch_holds_key_for_several_checks() {
        let start = Instant::now();
        let mut latch = KeyLatch::new(Duration::from_millis(100));
        latch.press(0x6, start);
        // a check for some other key must not use the press up
        assert_eq!(latch.current(start), Some(0x6));
        assert_eq!(latch.current(start + Duration::from_millis(50)), Some(0x6));
    }

    #[test]
    fn test_latch_releases_after_hold() {
        let start = Instant::now();
        let mut latch = KeyLatch::new(Duration::from_millis(100));
        assert_eq!(latch.current(start), None);
        latch.press(0x6, start);
        assert_eq!(latch.current(start + Duration::from_millis(100)), None);
        assert_eq!(latch.current(start), None);
    }

    #[test]
    fn test_latch_newest_press_wins() {
        let start = Instant::now();
        let mut latch = KeyLatch::new(Duration::from_millis(100));
        latch.press(0x6, start);
        latch.press(0xA, start + Duration::from_millis(10));
        assert_eq!(latch.current(start + Duration::from_millis(20)), Some(0xA));
    }

    #[test]
    fn test_closure_keypad() {
        let mut k = || -> Result<u8, KeypadError> { Ok(0x5) };
        assert_eq!(Keypad::get_key(&mut k).ok(), Some(0x5));
    }
}
