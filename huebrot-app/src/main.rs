mod animation;
mod app;
mod app_dir;
mod interaction;
mod preferences;
mod session;

use std::process::ExitCode;

use huebrot_render::RenderError;
use tracing::error;

fn main() -> ExitCode {
    match app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let err = RenderError::BackendUnavailable(e.to_string());
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
