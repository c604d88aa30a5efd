//! Native input-method framework boundary.
//!
//! A platform backend implements [`InputMethodFramework`] to hand out
//! contexts, and [`InputMethodContext`] for the per-widget connection.
//! Framework callbacks are delivered as [`ImfEvent`] values: those raised
//! synchronously while a key is being filtered come back in the
//! [`FilterResult`], the rest are pushed by the platform through
//! [`crate::view::RenderWidgetView::handle_imf_event`].

use euclid::default::Rect;

use crate::events::KeyboardEvent;
use crate::panel::{AutocapitalType, ImfInputMode, PanelLayout, ReturnKeyType};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputPanelState {
    Shown,
    #[default]
    Hidden,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CandidatePanelState {
    Shown,
    #[default]
    Hidden,
}

/// Callback raised by the native framework.
#[derive(Debug, Clone, PartialEq)]
pub enum ImfEvent {
    PreeditChanged(String),
    Commit(String),
    DeleteSurrounding { offset: i32, count: u32 },
    InputPanelState(InputPanelState),
    InputPanelGeometry(Rect<i32>),
    CandidatePanelState(CandidatePanelState),
    CandidatePanelGeometry(Rect<i32>),
    LanguageChanged,
}

/// Outcome of handing a raw key to the framework.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterResult {
    /// The framework consumed the key.
    pub filtered: bool,
    /// Callbacks raised during the filter call, in order.
    pub events: Vec<ImfEvent>,
}

impl FilterResult {
    pub fn passthrough() -> Self {
        Self::default()
    }

    pub fn consumed(events: Vec<ImfEvent>) -> Self {
        Self {
            filtered: true,
            events,
        }
    }
}

/// One connection to the native input method, bound to one drawing surface.
pub trait InputMethodContext {
    fn filter_key_down(&mut self, event: &KeyboardEvent) -> FilterResult;
    fn filter_key_up(&mut self, event: &KeyboardEvent) -> FilterResult;

    /// Discards any in-flight composition.
    fn reset(&mut self);
    fn focus_in(&mut self);
    fn focus_out(&mut self);

    fn show_input_panel(&mut self);
    fn hide_input_panel(&mut self);
    fn input_panel_state(&self) -> InputPanelState;
    fn set_input_panel_enabled(&mut self, enabled: bool);

    /// Whether preedit text is rendered inline by the client.
    fn set_use_preedit(&mut self, use_preedit: bool);
    fn set_input_panel_layout(&mut self, layout: PanelLayout);
    fn set_input_mode(&mut self, mode: ImfInputMode);
    fn set_return_key_type(&mut self, return_key: ReturnKeyType);
    fn return_key_type(&self) -> ReturnKeyType;
    fn set_autocapital_type(&mut self, autocapital: AutocapitalType);
    fn set_prediction_allowed(&mut self, allowed: bool);
    fn set_cursor_location(&mut self, rect: Rect<i32>);
}

/// Factory for contexts. `None` means no default input method is installed.
pub trait InputMethodFramework {
    fn create_context(&self) -> Option<Box<dyn InputMethodContext>>;
}

/// Framework for platforms without any input method.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInputMethod;

impl InputMethodFramework for NoInputMethod {
    fn create_context(&self) -> Option<Box<dyn InputMethodContext>> {
        None
    }
}
