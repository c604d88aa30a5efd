//! Méthode de saisie native fournie par Winit.
//!
//! Winit n'expose pas de filtre de touches : les événements `Ime` arrivent
//! séparément sur la boucle et sont poussés vers la vue par le shell. Le
//! contexte ci-dessous pilote donc seulement l'autorisation IME de la
//! fenêtre, son usage (mot de passe ou non) et la zone du curseur.

use std::rc::Rc;

use euclid::default::Rect;
use tracing::debug;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::window::{ImePurpose, Window};

use crate::events::KeyboardEvent;
use crate::imf::{FilterResult, InputMethodContext, InputMethodFramework, InputPanelState};
use crate::panel::{AutocapitalType, ImfInputMode, PanelLayout, ReturnKeyType};

/// Fabrique de contextes liés à une fenêtre Winit.
pub struct WinitInputMethod {
    window: Rc<Window>,
}

impl WinitInputMethod {
    pub fn new(window: Rc<Window>) -> Self {
        Self { window }
    }
}

impl InputMethodFramework for WinitInputMethod {
    fn create_context(&self) -> Option<Box<dyn InputMethodContext>> {
        Some(Box::new(WinitImeContext {
            window: self.window.clone(),
            panel_state: InputPanelState::Hidden,
            return_key: ReturnKeyType::Default,
        }))
    }
}

struct WinitImeContext {
    window: Rc<Window>,
    panel_state: InputPanelState,
    return_key: ReturnKeyType,
}

impl WinitImeContext {
    fn set_allowed(&mut self, allowed: bool) {
        self.window.set_ime_allowed(allowed);
        self.panel_state = if allowed {
            InputPanelState::Shown
        } else {
            InputPanelState::Hidden
        };
    }
}

impl InputMethodContext for WinitImeContext {
    fn filter_key_down(&mut self, _event: &KeyboardEvent) -> FilterResult {
        FilterResult::passthrough()
    }

    fn filter_key_up(&mut self, _event: &KeyboardEvent) -> FilterResult {
        FilterResult::passthrough()
    }

    /// Winit n'a pas de reset : on coupe puis rétablit l'IME, ce qui
    /// abandonne la composition en cours.
    fn reset(&mut self) {
        if self.panel_state == InputPanelState::Shown {
            self.window.set_ime_allowed(false);
            self.window.set_ime_allowed(true);
        }
    }

    fn focus_in(&mut self) {}

    fn focus_out(&mut self) {}

    fn show_input_panel(&mut self) {
        self.set_allowed(true);
    }

    fn hide_input_panel(&mut self) {
        self.set_allowed(false);
    }

    fn input_panel_state(&self) -> InputPanelState {
        self.panel_state
    }

    fn set_input_panel_enabled(&mut self, _enabled: bool) {}

    fn set_use_preedit(&mut self, use_preedit: bool) {
        debug!(use_preedit, "Inline preedit");
    }

    fn set_input_panel_layout(&mut self, layout: PanelLayout) {
        let purpose = match layout {
            PanelLayout::Password => ImePurpose::Password,
            _ => ImePurpose::Normal,
        };
        self.window.set_ime_purpose(purpose);
    }

    fn set_input_mode(&mut self, mode: ImfInputMode) {
        debug!(?mode, "Input mode hint not supported by winit");
    }

    fn set_return_key_type(&mut self, return_key: ReturnKeyType) {
        self.return_key = return_key;
    }

    fn return_key_type(&self) -> ReturnKeyType {
        self.return_key
    }

    fn set_autocapital_type(&mut self, _autocapital: AutocapitalType) {}

    fn set_prediction_allowed(&mut self, _allowed: bool) {}

    fn set_cursor_location(&mut self, rect: Rect<i32>) {
        self.window.set_ime_cursor_area(
            PhysicalPosition::new(rect.origin.x, rect.origin.y),
            PhysicalSize::new(rect.size.width.max(0) as u32, rect.size.height.max(0) as u32),
        );
    }
}
