fn main() {
    // Declaring the app command makes it deny-by-default, granted per capability.
    tauri_build::try_build(
        tauri_build::Attributes::new()
            .app_manifest(tauri_build::AppManifest::new().commands(&["shell_ipc_send"])),
    )
    .expect("failed to run tauri-build");
}
