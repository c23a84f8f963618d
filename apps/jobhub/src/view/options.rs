/// One `<option>` of a select control.
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn new(value: &str, label: &str, selected: bool) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
            selected,
        }
    }
}

/// The known values, plus `current` appended when none of them matches it,
/// so the control always shows the value actually in effect.
pub fn with_current(known: &[&str], current: &str) -> Vec<SelectOption> {
    let mut options: Vec<SelectOption> = known
        .iter()
        .map(|v| SelectOption::new(v, v, v.eq_ignore_ascii_case(current)))
        .collect();
    if !current.is_empty() && !options.iter().any(|o| o.selected) {
        options.push(SelectOption::new(current, current, true));
    }
    options
}
