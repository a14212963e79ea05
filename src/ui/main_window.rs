use fltk::{
    enums::{Align, Color, FrameType},
    frame::Frame,
    group::Flex,
    menu::MenuBar,
    prelude::*,
    window::Window,
};

pub const STATUS_HEIGHT: i32 = 24;

pub struct MainWidgets {
    pub wind: Window,
    pub flex: Flex,
    pub menu: MenuBar,
    /// Placeholder the embedded editor is laid over.
    pub pane: Frame,
    /// Hidden until there is something to report, e.g. a failed editor load.
    pub status: Frame,
}

pub fn build_main_window(app_name: &str) -> MainWidgets {
    let mut wind = Window::new(100, 100, 800, 600, None);
    wind.set_label(&format!("Untitled - {}", app_name));
    wind.set_xclass(app_name);

    let mut flex = Flex::new(0, 0, 800, 600, None);
    flex.set_type(fltk::group::FlexType::Column);

    let menu = MenuBar::new(0, 0, 0, 30, "");
    flex.fixed(&menu, 30);

    let mut status = Frame::default().with_size(0, 0);
    status.set_frame(FrameType::FlatBox);
    status.set_color(Color::from_rgb(255, 228, 225));
    status.set_label_color(Color::Black);
    status.set_label_size(13);
    status.set_align(Align::Left | Align::Inside);
    status.hide();
    flex.fixed(&status, 0);

    let mut pane = Frame::default();
    pane.set_frame(FrameType::FlatBox);
    pane.set_color(Color::White);

    flex.end();
    flex.layout();
    wind.end();
    wind.resizable(&flex);

    MainWidgets {
        wind,
        flex,
        menu,
        pane,
        status,
    }
}

/// Show `message` in the status strip above the editor.
pub fn show_status(widgets: &mut MainWidgets, message: &str) {
    widgets.status.set_label(&format!("  {}", message));
    widgets.status.show();
    widgets.flex.fixed(&widgets.status, STATUS_HEIGHT);
    widgets.flex.layout();
    widgets.wind.redraw();
}
