//! Signals surfaced to the hosting widget layer.

use euclid::default::Rect;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewSignal {
    ImeInputPanelShown,
    ImeInputPanelHidden,
    ImeCandidatePanelShown,
    ImeCandidatePanelHidden,
    /// The on-screen keyboard moved or resized.
    ImeInputMethodChanged(Rect<i32>),
    /// A pinch gesture ended.
    ZoomFinished,
}

impl ViewSignal {
    /// Smart-callback name the widget layer emits for this signal.
    pub fn name(&self) -> &'static str {
        match self {
            ViewSignal::ImeInputPanelShown => "editorclient,ime,opened",
            ViewSignal::ImeInputPanelHidden => "editorclient,ime,closed",
            ViewSignal::ImeCandidatePanelShown => "editorclient,candidate,opened",
            ViewSignal::ImeCandidatePanelHidden => "editorclient,candidate,closed",
            ViewSignal::ImeInputMethodChanged(_) => "inputmethod,changed",
            ViewSignal::ZoomFinished => "zoom,finished",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_names() {
        assert_eq!(ViewSignal::ImeInputPanelShown.name(), "editorclient,ime,opened");
        assert_eq!(
            ViewSignal::ImeCandidatePanelHidden.name(),
            "editorclient,candidate,closed"
        );
        assert_eq!(
            ViewSignal::ImeInputMethodChanged(Rect::zero()).name(),
            "inputmethod,changed"
        );
    }
}
