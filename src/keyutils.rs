//! Conversion des événements clavier Winit vers le modèle de la vue.
//!
//! Le moteur attend des symboles de touche façon toolkit (`"Return"`,
//! `"BackSpace"`, `"space"`, `"Shift_L"`) et un code de touche virtuel
//! Windows sur lequel il indexe ses commandes d'édition. Winit fournit ses
//! propres types dans `winit::keyboard` ; ce module fait la traduction.

use winit::event::{ElementState, Ime, KeyEvent};
use winit::keyboard::{
    Key as WinitKey, KeyCode, KeyLocation, ModifiersState, NamedKey, NativeKeyCode, PhysicalKey,
};

use crate::events::{KeyEventKind, KeyboardEvent, Modifiers};
use crate::imf::{ImfEvent, InputPanelState};

/// Convertit un `KeyEvent` Winit + état des modificateurs en `KeyboardEvent`.
pub fn keyboard_event_from_winit(
    key_event: &KeyEvent,
    state: ModifiersState,
    timestamp: f64,
) -> KeyboardEvent {
    let kind = key_state_from_winit(key_event.state);
    let key = key_symbol_from_winit(&key_event.logical_key, key_event.location);
    let code = windows_key_code_from_winit(&key_event.physical_key);

    let mut event = match kind {
        KeyEventKind::KeyDown => KeyboardEvent::key_down(key, code),
        KeyEventKind::KeyUp => KeyboardEvent::key_up(key, code),
    }
    .with_modifiers(modifiers_from_winit(state))
    .with_timestamp(timestamp);

    // Winit ne fournit le texte que sur l'appui.
    if let Some(text) = key_event.text.as_deref() {
        event = event.with_text(text);
    }
    event.native_key_code = native_key_code_from_winit(&key_event.physical_key);
    event
}

pub fn key_state_from_winit(state: ElementState) -> KeyEventKind {
    match state {
        ElementState::Pressed => KeyEventKind::KeyDown,
        ElementState::Released => KeyEventKind::KeyUp,
    }
}

/// Symbole de touche au format du toolkit.
pub fn key_symbol_from_winit(logical_key: &WinitKey, location: KeyLocation) -> String {
    let named_key = match logical_key {
        WinitKey::Named(named_key) => *named_key,
        WinitKey::Character(string) => {
            return if string.as_str() == " " {
                "space".to_string()
            } else {
                string.to_string()
            };
        }
        WinitKey::Unidentified(_) | WinitKey::Dead(_) => return String::new(),
    };

    let sided = |base: &str| match location {
        KeyLocation::Right => format!("{base}_R"),
        _ => format!("{base}_L"),
    };

    let symbol = match named_key {
        NamedKey::Space => "space",
        NamedKey::Enter => "Return",
        NamedKey::Backspace => "BackSpace",
        NamedKey::Tab => "Tab",
        NamedKey::Escape => "Escape",
        NamedKey::Delete => "Delete",
        NamedKey::Insert => "Insert",
        NamedKey::Home => "Home",
        NamedKey::End => "End",
        NamedKey::PageUp => "Prior",
        NamedKey::PageDown => "Next",
        NamedKey::ArrowLeft => "Left",
        NamedKey::ArrowUp => "Up",
        NamedKey::ArrowRight => "Right",
        NamedKey::ArrowDown => "Down",
        NamedKey::CapsLock => "Caps_Lock",
        NamedKey::Shift => return sided("Shift"),
        NamedKey::Control => return sided("Control"),
        NamedKey::Alt => return sided("Alt"),
        NamedKey::Super => return sided("Super"),
        NamedKey::F1 => "F1",
        NamedKey::F2 => "F2",
        NamedKey::F3 => "F3",
        NamedKey::F4 => "F4",
        NamedKey::F5 => "F5",
        NamedKey::F6 => "F6",
        NamedKey::F7 => "F7",
        NamedKey::F8 => "F8",
        NamedKey::F9 => "F9",
        NamedKey::F10 => "F10",
        NamedKey::F11 => "F11",
        NamedKey::F12 => "F12",
        other => return format!("{other:?}"),
    };
    symbol.to_string()
}

/// Code de touche virtuel Windows à partir de la touche physique.
pub fn windows_key_code_from_winit(physical_key: &PhysicalKey) -> u16 {
    let key_code = match physical_key {
        PhysicalKey::Code(key_code) => *key_code,
        PhysicalKey::Unidentified(_) => return 0,
    };

    match key_code {
        KeyCode::KeyA => 0x41,
        KeyCode::KeyB => 0x42,
        KeyCode::KeyC => 0x43,
        KeyCode::KeyD => 0x44,
        KeyCode::KeyE => 0x45,
        KeyCode::KeyF => 0x46,
        KeyCode::KeyG => 0x47,
        KeyCode::KeyH => 0x48,
        KeyCode::KeyI => 0x49,
        KeyCode::KeyJ => 0x4A,
        KeyCode::KeyK => 0x4B,
        KeyCode::KeyL => 0x4C,
        KeyCode::KeyM => 0x4D,
        KeyCode::KeyN => 0x4E,
        KeyCode::KeyO => 0x4F,
        KeyCode::KeyP => 0x50,
        KeyCode::KeyQ => 0x51,
        KeyCode::KeyR => 0x52,
        KeyCode::KeyS => 0x53,
        KeyCode::KeyT => 0x54,
        KeyCode::KeyU => 0x55,
        KeyCode::KeyV => 0x56,
        KeyCode::KeyW => 0x57,
        KeyCode::KeyX => 0x58,
        KeyCode::KeyY => 0x59,
        KeyCode::KeyZ => 0x5A,
        KeyCode::Digit0 => 0x30,
        KeyCode::Digit1 => 0x31,
        KeyCode::Digit2 => 0x32,
        KeyCode::Digit3 => 0x33,
        KeyCode::Digit4 => 0x34,
        KeyCode::Digit5 => 0x35,
        KeyCode::Digit6 => 0x36,
        KeyCode::Digit7 => 0x37,
        KeyCode::Digit8 => 0x38,
        KeyCode::Digit9 => 0x39,
        KeyCode::F1 => 0x70,
        KeyCode::F2 => 0x71,
        KeyCode::F3 => 0x72,
        KeyCode::F4 => 0x73,
        KeyCode::F5 => 0x74,
        KeyCode::F6 => 0x75,
        KeyCode::F7 => 0x76,
        KeyCode::F8 => 0x77,
        KeyCode::F9 => 0x78,
        KeyCode::F10 => 0x79,
        KeyCode::F11 => 0x7A,
        KeyCode::F12 => 0x7B,
        KeyCode::Enter | KeyCode::NumpadEnter => 0x0D,
        KeyCode::Backspace => 0x08,
        KeyCode::Tab => 0x09,
        KeyCode::Escape => 0x1B,
        KeyCode::Space => 0x20,
        KeyCode::PageUp => 0x21,
        KeyCode::PageDown => 0x22,
        KeyCode::End => 0x23,
        KeyCode::Home => 0x24,
        KeyCode::ArrowLeft => 0x25,
        KeyCode::ArrowUp => 0x26,
        KeyCode::ArrowRight => 0x27,
        KeyCode::ArrowDown => 0x28,
        KeyCode::Insert => 0x2D,
        KeyCode::Delete => 0x2E,
        KeyCode::ShiftLeft | KeyCode::ShiftRight => 0x10,
        KeyCode::ControlLeft | KeyCode::ControlRight => 0x11,
        KeyCode::AltLeft | KeyCode::AltRight => 0x12,
        KeyCode::SuperLeft => 0x5B,
        KeyCode::SuperRight => 0x5C,
        KeyCode::CapsLock => 0x14,
        KeyCode::Numpad0 => 0x60,
        KeyCode::Numpad1 => 0x61,
        KeyCode::Numpad2 => 0x62,
        KeyCode::Numpad3 => 0x63,
        KeyCode::Numpad4 => 0x64,
        KeyCode::Numpad5 => 0x65,
        KeyCode::Numpad6 => 0x66,
        KeyCode::Numpad7 => 0x67,
        KeyCode::Numpad8 => 0x68,
        KeyCode::Numpad9 => 0x69,
        KeyCode::NumpadMultiply => 0x6A,
        KeyCode::NumpadAdd => 0x6B,
        KeyCode::NumpadSubtract => 0x6D,
        KeyCode::NumpadDecimal => 0x6E,
        KeyCode::NumpadDivide => 0x6F,
        KeyCode::Semicolon => 0xBA,
        KeyCode::Equal => 0xBB,
        KeyCode::Comma => 0xBC,
        KeyCode::Minus => 0xBD,
        KeyCode::Period => 0xBE,
        KeyCode::Slash => 0xBF,
        KeyCode::Backquote => 0xC0,
        KeyCode::BracketLeft => 0xDB,
        KeyCode::Backslash => 0xDC,
        KeyCode::BracketRight => 0xDD,
        KeyCode::Quote => 0xDE,
        _ => 0,
    }
}

/// Code de touche virtuel Windows pour un symbole du toolkit.
///
/// Sert aux touches synthétisées pour un texte produit par la méthode de
/// saisie. Les symboles inconnus donnent 0.
pub fn windows_key_code_for_symbol(symbol: &str) -> u16 {
    let code = match symbol {
        "space" => 0x20,
        "Return" | "KP_Enter" => 0x0D,
        "BackSpace" => 0x08,
        "Tab" => 0x09,
        "Escape" => 0x1B,
        "Prior" => 0x21,
        "Next" => 0x22,
        "End" => 0x23,
        "Home" => 0x24,
        "Left" => 0x25,
        "Up" => 0x26,
        "Right" => 0x27,
        "Down" => 0x28,
        "Insert" => 0x2D,
        "Delete" => 0x2E,
        "Shift_L" | "Shift_R" => 0x10,
        "Control_L" | "Control_R" => 0x11,
        "Alt_L" | "Alt_R" => 0x12,
        "Super_L" => 0x5B,
        "Super_R" => 0x5C,
        "Caps_Lock" => 0x14,
        _ => 0,
    };
    if code != 0 {
        return code;
    }

    if let Some(n) = symbol.strip_prefix('F').and_then(|n| n.parse::<u16>().ok())
        && (1..=12).contains(&n)
    {
        return 0x6F + n;
    }

    let mut chars = symbol.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => windows_key_code_for_char(c),
        _ => 0,
    }
}

fn windows_key_code_for_char(c: char) -> u16 {
    match c {
        'a'..='z' | 'A'..='Z' => c.to_ascii_uppercase() as u16,
        '0'..='9' => c as u16,
        ' ' => 0x20,
        ';' | ':' => 0xBA,
        '=' | '+' => 0xBB,
        ',' | '<' => 0xBC,
        '-' | '_' => 0xBD,
        '.' | '>' => 0xBE,
        '/' | '?' => 0xBF,
        '`' | '~' => 0xC0,
        '[' | '{' => 0xDB,
        '\\' | '|' => 0xDC,
        ']' | '}' => 0xDD,
        '\'' | '"' => 0xDE,
        _ => 0,
    }
}

fn native_key_code_from_winit(physical_key: &PhysicalKey) -> u32 {
    match physical_key {
        PhysicalKey::Unidentified(NativeKeyCode::Xkb(code)) => *code,
        PhysicalKey::Unidentified(NativeKeyCode::Android(code)) => *code,
        PhysicalKey::Unidentified(NativeKeyCode::Windows(code)) => u32::from(*code),
        PhysicalKey::Unidentified(NativeKeyCode::MacOS(code)) => u32::from(*code),
        _ => 0,
    }
}

pub fn modifiers_from_winit(mods: ModifiersState) -> Modifiers {
    let mut modifiers = Modifiers::empty();
    modifiers.set(Modifiers::CONTROL, mods.control_key());
    modifiers.set(Modifiers::SHIFT, mods.shift_key());
    modifiers.set(Modifiers::ALT, mods.alt_key());
    modifiers.set(Modifiers::META, mods.super_key());
    modifiers
}

/// Traduit un événement IME Winit en rappel de méthode de saisie.
///
/// Winit ne distingue pas panneau et candidats : l'activation de l'IME est
/// traitée comme l'ouverture du panneau de saisie.
pub fn ime_event_from_winit(ime: &Ime) -> ImfEvent {
    match ime {
        Ime::Enabled => ImfEvent::InputPanelState(InputPanelState::Shown),
        Ime::Disabled => ImfEvent::InputPanelState(InputPanelState::Hidden),
        Ime::Preedit(text, _cursor) => ImfEvent::PreeditChanged(text.clone()),
        Ime::Commit(text) => ImfEvent::Commit(text.clone()),
    }
}
