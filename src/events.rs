//! Input event values exchanged between the toolkit, the input method and the engine.
//!
//! Every event is an owned value: queued key-downs are moved in and out of
//! the sequencer queues, never shared.

use bitflags::bitflags;
use euclid::default::Point2D;

use crate::keyutils;

bitflags! {
    /// Keyboard modifiers carried by a key event.
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u32 {
        const SHIFT = 0b0001;
        const CONTROL = 0b0010;
        const ALT = 0b0100;
        const META = 0b1000;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventKind {
    KeyDown,
    KeyUp,
}

/// A keyboard event in the engine's model.
///
/// `key` is the toolkit key symbol (`"a"`, `"space"`, `"Return"`,
/// `"Shift_L"`), `windows_key_code` the virtual key code the engine keys its
/// editing commands on.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyboardEvent {
    pub kind: KeyEventKind,
    pub key: String,
    pub windows_key_code: u16,
    pub native_key_code: u32,
    pub modifiers: Modifiers,
    /// Seconds since the shell started.
    pub timestamp: f64,
    pub text: String,
    pub unmodified_text: String,
    /// Set when the input method consumed the event, or for synthesized keys.
    pub is_system_key: bool,
}

impl KeyboardEvent {
    pub fn key_down(key: impl Into<String>, windows_key_code: u16) -> Self {
        Self::new(KeyEventKind::KeyDown, key.into(), windows_key_code)
    }

    pub fn key_up(key: impl Into<String>, windows_key_code: u16) -> Self {
        Self::new(KeyEventKind::KeyUp, key.into(), windows_key_code)
    }

    fn new(kind: KeyEventKind, key: String, windows_key_code: u16) -> Self {
        Self {
            kind,
            key,
            windows_key_code,
            native_key_code: 0,
            modifiers: Modifiers::empty(),
            timestamp: 0.0,
            text: String::new(),
            unmodified_text: String::new(),
            is_system_key: false,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.unmodified_text = text.clone();
        self.text = text;
        self
    }

    pub fn with_timestamp(mut self, timestamp: f64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Key-down synthesized for a commit or preedit the input method produced
    /// outside of a hardware key filter call.
    pub fn synthetic_key_down(symbol: &str) -> Self {
        let text = if symbol == "space" { " " } else { symbol };
        let mut event =
            Self::key_down(symbol, keyutils::windows_key_code_for_symbol(symbol)).with_text(text);
        event.is_system_key = true;
        event
    }

    /// Key-up sent once the engine acknowledged the matching key-down.
    pub fn synthetic_key_up(windows_key_code: u16) -> Self {
        Self::key_up(String::new(), windows_key_code)
    }

    pub fn is_key_down(&self) -> bool {
        self.kind == KeyEventKind::KeyDown
    }
}

/// ARGB black, the color of the single underline of a preedit.
pub const UNDERLINE_BLACK: u32 = 0xFF00_0000;

/// Half-open range in UTF-16 code units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextRange {
    pub start: u32,
    pub end: u32,
}

impl TextRange {
    pub fn collapsed(position: u32) -> Self {
        Self {
            start: position,
            end: position,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositionUnderline {
    pub start_offset: u32,
    pub end_offset: u32,
    pub color: u32,
    pub thick: bool,
}

/// The in-progress composition of the input method.
///
/// Offsets in `underlines` and `selection` count UTF-16 code units.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompositionText {
    pub text: String,
    pub underlines: Vec<CompositionUnderline>,
    pub selection: TextRange,
}

impl CompositionText {
    /// Snapshot of a preedit string: one thin black underline over the whole
    /// text, caret collapsed at the end.
    pub fn from_preedit(preedit: &str) -> Self {
        let len = utf16_len(preedit);
        Self {
            text: preedit.to_string(),
            underlines: vec![CompositionUnderline {
                start_offset: 0,
                end_offset: len,
                color: UNDERLINE_BLACK,
                thick: false,
            }],
            selection: TextRange::collapsed(len),
        }
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.underlines.clear();
        self.selection = TextRange::default();
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

fn utf16_len(text: &str) -> u32 {
    u32::try_from(text.encode_utf16().count()).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    TapDown,
    Tap,
    DoubleTap,
    LongPress,
    ScrollBegin,
    ScrollUpdate,
    ScrollEnd,
    FlingStart,
    FlingCancel,
    PinchBegin,
    PinchUpdate,
    PinchEnd,
}

impl GestureKind {
    pub fn is_pinch(self) -> bool {
        matches!(
            self,
            GestureKind::PinchBegin | GestureKind::PinchUpdate | GestureKind::PinchEnd
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GestureEvent {
    pub kind: GestureKind,
    pub position: Point2D<f32>,
    /// Pinch scale delta; 1.0 for non-pinch gestures.
    pub scale: f32,
    pub timestamp: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Pressed,
    Moved,
    Released,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TouchPoint {
    pub id: u64,
    pub phase: TouchPhase,
    pub position: Point2D<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TouchEvent {
    pub points: Vec<TouchPoint>,
    pub timestamp: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    Down,
    Up,
    Move,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    None,
    Left,
    Middle,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub button: MouseButton,
    pub position: Point2D<f32>,
    pub modifiers: Modifiers,
}
