use std::cell::RefCell;
use std::rc::Rc;

use fltk::{
    button::{Button, CheckButton},
    dialog,
    frame::Frame,
    input::Input,
    prelude::*,
    window::Window,
};

use super::run_dialog;
use crate::app::controllers::EditorWidget;

#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    pub pattern: String,
    pub match_case: bool,
    pub regex: bool,
    pub wrap_around: bool,
}

/// Show the Find dialog. The editor selects each match as it is found.
/// Returns the options last used so the next invocation can start from them.
pub fn show_find_dialog(widget: &EditorWidget, previous: &FindOptions) -> FindOptions {
    let mut dialog_win = Window::default()
        .with_size(400, 170)
        .with_label("Find")
        .center_screen();

    Frame::default().with_pos(20, 20).with_size(80, 30).with_label("Find what:");
    let mut find_input = Input::default().with_pos(110, 20).with_size(270, 30);
    find_input.set_value(&previous.pattern);

    let mut case_check = CheckButton::default()
        .with_pos(110, 55).with_size(130, 25).with_label("Match case");
    case_check.set_checked(previous.match_case);
    let mut regex_check = CheckButton::default()
        .with_pos(250, 55).with_size(130, 25).with_label("Regex");
    regex_check.set_checked(previous.regex);
    let mut wrap_check = CheckButton::default()
        .with_pos(110, 85).with_size(130, 25).with_label("Wrap around");
    wrap_check.set_checked(previous.wrap_around);

    let mut find_btn = Button::default()
        .with_pos(190, 125).with_size(90, 30).with_label("Find Next");
    let mut close_btn = Button::default()
        .with_pos(290, 125).with_size(90, 30).with_label("Close");

    dialog_win.end();
    dialog_win.make_resizable(false);
    dialog_win.show();

    let options = Rc::new(RefCell::new(previous.clone()));

    let opts = options.clone();
    let widget = widget.clone();
    let (find_input1, case1, regex1, wrap1) =
        (find_input.clone(), case_check.clone(), regex_check.clone(), wrap_check.clone());
    find_btn.set_callback(move |_| {
        let query = find_input1.value();
        if query.is_empty() {
            dialog::message_default("Please enter text to find");
            return;
        }

        let current = FindOptions {
            pattern: query,
            match_case: case1.is_checked(),
            regex: regex1.is_checked(),
            wrap_around: wrap1.is_checked(),
        };
        match widget.search(&current.pattern, !current.match_case, current.regex, current.wrap_around) {
            Ok(true) => {}
            Ok(false) => dialog::message_default("No more matches"),
            Err(e) => {
                tracing::warn!("search failed: {}", e);
                dialog::alert_default(&format!("Search failed: {}", e));
            }
        }
        *opts.borrow_mut() = current;
    });

    let mut dw = dialog_win.clone();
    close_btn.set_callback(move |_| dw.hide());

    run_dialog(&dialog_win);

    let result = options.borrow().clone();
    result
}
