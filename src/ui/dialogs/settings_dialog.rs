use std::cell::RefCell;
use std::rc::Rc;

use fltk::{
    button::{Button, CheckButton},
    enums::Align,
    frame::Frame,
    menu::Choice,
    misc::Spinner,
    prelude::*,
    window::Window,
};

use super::run_dialog;
use crate::app::controllers::SettingsSession;
use crate::app::domain::settings::{EditorSettings, MAX_FONT_SIZE, MIN_FONT_SIZE, THEMES};
use crate::app::infrastructure::error::Result;
use crate::app::infrastructure::preferences::Preferences;

fn theme_index(theme: &str) -> i32 {
    THEMES
        .iter()
        .position(|(id, _)| *id == theme)
        .map(|i| i as i32)
        .unwrap_or(0)
}

fn report(result: Result<()>) {
    if let Err(e) = result {
        tracing::warn!("could not apply setting: {}", e);
    }
}

/// Show the settings dialog. Changes show in the editor right away; OK
/// persists them, Cancel or closing the window restores the previous ones.
/// Returns the settings in effect afterwards, and any failure to persist
/// or restore them.
pub fn show_settings_dialog(
    session: SettingsSession,
    prefs: &mut Preferences,
) -> (EditorSettings, Result<()>) {
    let initial = session.working().clone();
    let session = Rc::new(RefCell::new(Some(session)));
    let accepted = Rc::new(RefCell::new(false));

    let mut dialog = Window::default()
        .with_size(340, 230)
        .with_label("Settings")
        .center_screen();
    dialog.make_modal(true);

    Frame::default().with_pos(15, 15).with_size(310, 25).with_label("Theme:").with_align(Align::Left | Align::Inside);
    let mut theme_choice = Choice::default().with_pos(30, 40).with_size(280, 25);
    for (_, name) in THEMES {
        theme_choice.add_choice(name);
    }
    theme_choice.set_value(theme_index(&initial.theme));

    Frame::default().with_pos(15, 75).with_size(310, 25).with_label("Font Size:").with_align(Align::Left | Align::Inside);
    let mut size_spinner = Spinner::default().with_pos(30, 100).with_size(80, 25);
    size_spinner.set_range(MIN_FONT_SIZE as f64, MAX_FONT_SIZE as f64);
    size_spinner.set_step(1.0);
    size_spinner.set_value(initial.font_size() as f64);

    let mut check_line_numbers = CheckButton::default().with_pos(30, 140).with_size(280, 25).with_label("Show Line Numbers");
    check_line_numbers.set_checked(initial.show_line_numbers);

    let mut reset_btn = Button::default().with_pos(15, 185).with_size(90, 30).with_label("Defaults");
    let mut ok_btn = Button::default().with_pos(140, 185).with_size(85, 30).with_label("OK");
    let mut cancel_btn = Button::default().with_pos(235, 185).with_size(90, 30).with_label("Cancel");

    dialog.end();

    let s = session.clone();
    theme_choice.set_callback(move |c| {
        let Some((id, _)) = THEMES.get(c.value().max(0) as usize) else {
            return;
        };
        if let Some(session) = s.borrow_mut().as_mut() {
            report(session.set_theme(id));
        }
    });

    let s = session.clone();
    size_spinner.set_callback(move |sp| {
        if let Some(session) = s.borrow_mut().as_mut() {
            report(session.set_font_size(sp.value() as i64));
        }
    });

    let s = session.clone();
    check_line_numbers.set_callback(move |cb| {
        if let Some(session) = s.borrow_mut().as_mut() {
            report(session.set_show_line_numbers(cb.is_checked()));
        }
    });

    let s = session.clone();
    let (mut tc, mut sp, mut ln) = (theme_choice.clone(), size_spinner.clone(), check_line_numbers.clone());
    reset_btn.set_callback(move |_| {
        if let Some(session) = s.borrow_mut().as_mut() {
            report(session.reset());
            let working = session.working();
            tc.set_value(theme_index(&working.theme));
            sp.set_value(working.font_size() as f64);
            ln.set_checked(working.show_line_numbers);
        }
    });

    let acc = accepted.clone();
    let mut d = dialog.clone();
    ok_btn.set_callback(move |_| {
        *acc.borrow_mut() = true;
        d.hide();
    });

    let mut d = dialog.clone();
    cancel_btn.set_callback(move |_| d.hide());

    dialog.show();
    run_dialog(&dialog);

    let Some(session) = session.borrow_mut().take() else {
        return (initial, Ok(()));
    };
    if *accepted.borrow() {
        session.commit(prefs)
    } else {
        session.discard()
    }
}
