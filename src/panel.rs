//! Mapping from the focused element's input type to the on-screen keyboard setup.

use tracing::debug;

/// Input type of the focused editable element, as reported by the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum InputType {
    /// Nothing editable is focused.
    #[default]
    None,
    Text,
    Password,
    Search,
    Email,
    Number,
    Telephone,
    Url,
    Month,
    TextArea,
    Date,
    DateTime,
    DateTimeLocal,
    Time,
    Week,
    ContentEditable,
    DateTimeField,
}

impl InputType {
    /// Parses the `type` attribute of an `<input>`. Unknown types behave as text.
    pub fn from_attribute(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "text" => InputType::Text,
            "password" => InputType::Password,
            "search" => InputType::Search,
            "email" => InputType::Email,
            "number" => InputType::Number,
            "tel" => InputType::Telephone,
            "url" => InputType::Url,
            "month" => InputType::Month,
            "textarea" => InputType::TextArea,
            "date" => InputType::Date,
            "datetime" => InputType::DateTime,
            "datetime-local" => InputType::DateTimeLocal,
            "time" => InputType::Time,
            "week" => InputType::Week,
            "contenteditable" => InputType::ContentEditable,
            "none" => InputType::None,
            other => {
                debug!(input_type = other, "Unmapped input type, using text layout");
                InputType::Text
            }
        }
    }
}

/// Input mode hint (`inputmode` attribute).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextInputMode {
    #[default]
    Default,
    Verbatim,
    Latin,
    Numeric,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PanelLayout {
    #[default]
    Normal,
    Password,
    Email,
    Number,
    PhoneNumber,
    Url,
    Month,
}

/// Label of the on-screen keyboard's return key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReturnKeyType {
    #[default]
    Default,
    Done,
    Go,
    Search,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AutocapitalType {
    #[default]
    None,
    Sentence,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImfInputMode {
    #[default]
    Alpha,
    Numeric,
}

/// Everything the input panel is configured with before it is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelConfig {
    pub layout: PanelLayout,
    pub return_key: ReturnKeyType,
    pub autocapital: AutocapitalType,
    pub prediction_allowed: bool,
    pub input_mode: ImfInputMode,
}

/// Panel setup for `input_type`; `None` when no input is expected.
pub fn panel_config(
    input_type: InputType,
    input_mode: TextInputMode,
    is_in_form_tag: bool,
) -> Option<PanelConfig> {
    let mut return_key = if is_in_form_tag {
        ReturnKeyType::Go
    } else {
        ReturnKeyType::Default
    };
    let mut autocapital = AutocapitalType::None;
    let mut prediction_allowed = true;

    let layout = match input_type {
        InputType::None => return None,
        InputType::Text => {
            if !is_in_form_tag {
                return_key = ReturnKeyType::Done;
            }
            PanelLayout::Normal
        }
        InputType::Password => {
            prediction_allowed = false;
            PanelLayout::Password
        }
        InputType::Search => {
            return_key = ReturnKeyType::Search;
            PanelLayout::Normal
        }
        InputType::Email => PanelLayout::Email,
        InputType::Number => {
            if !is_in_form_tag {
                return_key = ReturnKeyType::Done;
            }
            PanelLayout::Number
        }
        InputType::Telephone => PanelLayout::PhoneNumber,
        InputType::Url => PanelLayout::Url,
        InputType::Month => PanelLayout::Month,
        InputType::TextArea => {
            autocapital = AutocapitalType::Sentence;
            PanelLayout::Normal
        }
        // No dedicated panel for these.
        InputType::Date
        | InputType::DateTime
        | InputType::DateTimeLocal
        | InputType::Time
        | InputType::Week
        | InputType::ContentEditable
        | InputType::DateTimeField => PanelLayout::Normal,
    };

    // Numeric really selects the numeric mode; it does not fall through to alpha.
    let input_mode = match input_mode {
        TextInputMode::Numeric => ImfInputMode::Numeric,
        _ => ImfInputMode::Alpha,
    };

    Some(PanelConfig {
        layout,
        return_key,
        autocapital,
        prediction_allowed,
        input_mode,
    })
}

/// Return key for a live form-membership change.
pub fn return_key_for_form_state(input_type: InputType, is_in_form_tag: bool) -> ReturnKeyType {
    if is_in_form_tag {
        return ReturnKeyType::Go;
    }
    match input_type {
        InputType::Text | InputType::Number => ReturnKeyType::Done,
        _ => ReturnKeyType::Default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(input_type: InputType, in_form: bool) -> PanelConfig {
        panel_config(input_type, TextInputMode::Default, in_form).unwrap()
    }

    #[test]
    fn test_none_has_no_panel() {
        assert!(panel_config(InputType::None, TextInputMode::Default, false).is_none());
    }

    #[test]
    fn test_text_outside_form_is_done() {
        let c = config(InputType::Text, false);
        assert_eq!(c.layout, PanelLayout::Normal);
        assert_eq!(c.return_key, ReturnKeyType::Done);
        assert!(c.prediction_allowed);
    }

    #[test]
    fn test_text_inside_form_is_go() {
        assert_eq!(config(InputType::Text, true).return_key, ReturnKeyType::Go);
    }

    #[test]
    fn test_password_disables_prediction() {
        for in_form in [false, true] {
            let c = config(InputType::Password, in_form);
            assert_eq!(c.layout, PanelLayout::Password);
            assert!(!c.prediction_allowed);
        }
    }

    #[test]
    fn test_search_always_search() {
        assert_eq!(config(InputType::Search, false).return_key, ReturnKeyType::Search);
        assert_eq!(config(InputType::Search, true).return_key, ReturnKeyType::Search);
    }

    #[test]
    fn test_layout_table() {
        let pairs = [
            (InputType::Email, PanelLayout::Email),
            (InputType::Number, PanelLayout::Number),
            (InputType::Telephone, PanelLayout::PhoneNumber),
            (InputType::Url, PanelLayout::Url),
            (InputType::Month, PanelLayout::Month),
            (InputType::TextArea, PanelLayout::Normal),
            (InputType::Date, PanelLayout::Normal),
            (InputType::Week, PanelLayout::Normal),
            (InputType::ContentEditable, PanelLayout::Normal),
        ];
        for (input_type, layout) in pairs {
            assert_eq!(config(input_type, false).layout, layout);
        }
    }

    #[test]
    fn test_textarea_capitalizes_sentences() {
        let c = config(InputType::TextArea, false);
        assert_eq!(c.autocapital, AutocapitalType::Sentence);
        assert_eq!(c.return_key, ReturnKeyType::Default);
    }

    #[test]
    fn test_mapping_is_deterministic() {
        for in_form in [false, true] {
            let a = config(InputType::Number, in_form);
            let b = config(InputType::Number, in_form);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_numeric_input_mode() {
        let c = panel_config(InputType::Text, TextInputMode::Numeric, false).unwrap();
        assert_eq!(c.input_mode, ImfInputMode::Numeric);
        let c = panel_config(InputType::Text, TextInputMode::Latin, false).unwrap();
        assert_eq!(c.input_mode, ImfInputMode::Alpha);
    }

    #[test]
    fn test_from_attribute() {
        assert_eq!(InputType::from_attribute("password"), InputType::Password);
        assert_eq!(InputType::from_attribute("TEL"), InputType::Telephone);
        assert_eq!(InputType::from_attribute("datetime-local"), InputType::DateTimeLocal);
        assert_eq!(InputType::from_attribute(""), InputType::Text);
    }

    #[test]
    fn test_unknown_attribute_falls_back_to_text() {
        assert_eq!(InputType::from_attribute("color"), InputType::Text);
        assert_eq!(config(InputType::from_attribute("range"), false).layout, PanelLayout::Normal);
    }

    #[test]
    fn test_return_key_for_form_state() {
        assert_eq!(return_key_for_form_state(InputType::Email, true), ReturnKeyType::Go);
        assert_eq!(return_key_for_form_state(InputType::Text, false), ReturnKeyType::Done);
        assert_eq!(return_key_for_form_state(InputType::Number, false), ReturnKeyType::Done);
        assert_eq!(return_key_for_form_state(InputType::Url, false), ReturnKeyType::Default);
    }
}
