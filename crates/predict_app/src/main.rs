use predict_logging::predict_error;

mod platform;

fn main() -> anyhow::Result<()> {
    platform::run_app().inspect_err(|err| predict_error!("fatal: {err:#}"))
}
