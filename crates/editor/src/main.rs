use std::io::{BufRead, Write};
use std::path::Path;

use scene_editor_lib::command::{execute_json, execute_json_batch, CommandResponse};
use scene_editor_lib::state::{EditorCore, EditorSettings};
use scene_editor_lib::viewport::CameraLens;

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scene_editor=info,scene_editor_lib=info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let settings = EditorSettings::load();
    if args.iter().any(|a| a == "--init-settings") {
        match settings.save() {
            Ok(path) => tracing::info!("Settings written to {}", path.display()),
            Err(e) => tracing::error!("{e}"),
        }
    }
    let mut core = EditorCore::new(settings, Box::new(CameraLens::front(10.0)));

    if let Some(path) = arg_value(&args, "--project") {
        if let Err(e) = core.load_project_from(Path::new(&path)) {
            tracing::error!("Failed to load project: {e}");
        }
    } else if args.iter().any(|a| a == "--restore-autosave") {
        match core.restore_autosave() {
            Ok(true) => tracing::info!("Restored autosave"),
            Ok(false) => tracing::info!("No autosave to restore"),
            Err(e) => tracing::error!("Failed to restore autosave: {e}"),
        }
    }

    match arg_value(&args, "--script") {
        Some(path) => run_script(&mut core, &path),
        None => run_stdin(&mut core),
    }
}

fn arg_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

/// Execute a JSON array of commands from a file and print all responses
fn run_script(core: &mut EditorCore, path: &str) {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to read script {path}: {e}");
            std::process::exit(1);
        }
    };
    match execute_json_batch(core, &json) {
        Ok(responses) => {
            tracing::info!("Executed {} commands from {path}", responses.len());
            match serde_json::to_string_pretty(&responses) {
                Ok(out) => println!("{out}"),
                Err(e) => tracing::error!("Failed to serialize responses: {e}"),
            }
        }
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    }
}

/// One JSON command per line, one JSON response per line
fn run_stdin(core: &mut EditorCore) {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("Failed to read stdin: {e}");
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let response = execute_json(core, line).unwrap_or_else(|e| CommandResponse {
            success: false,
            error: Some(e),
            data: None,
        });
        match serde_json::to_string(&response) {
            Ok(out) => {
                if writeln!(stdout, "{out}").is_err() {
                    break;
                }
            }
            Err(e) => tracing::error!("Failed to serialize response: {e}"),
        }
    }
    if core.is_dirty() {
        if let Err(e) = core.autosave() {
            tracing::warn!("Autosave failed: {e}");
        }
    }
}
