//! Modal alerts shown for clock failures and the About box

use gtk4::prelude::*;
use gtk4::AlertDialog;
use led_clock_core::AboutInfo;
use log::error;

fn parent_window(widget: &impl IsA<gtk4::Widget>) -> Option<gtk4::Window> {
    widget
        .root()
        .and_then(|root| root.downcast::<gtk4::Window>().ok())
}

/// Log an operation failure and show it to the user
pub fn show_error(widget: &impl IsA<gtk4::Widget>, action: &str, err: &dyn std::fmt::Display) {
    error!("Error {}: {}", action, err);

    let dialog = AlertDialog::builder()
        .message("Error")
        .detail(format!("Error {}: {}", action, err))
        .modal(true)
        .buttons(vec!["OK"])
        .build();
    dialog.show(parent_window(widget).as_ref());
}

pub fn show_about(widget: &impl IsA<gtk4::Widget>, about: &AboutInfo) {
    let dialog = AlertDialog::builder()
        .message("About")
        .detail(about.to_message())
        .modal(true)
        .buttons(vec!["OK"])
        .build();
    dialog.show(parent_window(widget).as_ref());
}
