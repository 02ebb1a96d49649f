#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

fn main() {
    lumo_desktop_lib::run_capture();
}
